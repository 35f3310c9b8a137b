// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use rstest::rstest;

use super::keymap::{command_for, Command, Direction};
use super::{demo_diagram, osc52_sequence, App, HostClipboard};
use crate::format::Codec;
use crate::model::{Diagram, LabelPosition};
use crate::session::{
    Controller, Location, MemoryLocation, Notice, SessionConfig, SystemClock, Tool,
};

fn app_with(diagram: Diagram) -> App {
    let controller = Controller::new(diagram, SessionConfig::default(), Codec, SystemClock);
    App::new(controller, MemoryLocation::new("https://example.test/"), HostClipboard::Disabled)
}

fn press(app: &mut App, code: KeyCode) {
    let key = KeyEvent::new(code, KeyModifiers::NONE);
    if let Some(command) = command_for(app.input_mode(), &key) {
        app.dispatch(command);
    }
}

fn alt(app: &mut App, kind: KeyEventKind) {
    let key = KeyEvent::new_with_kind(
        KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        KeyModifiers::ALT,
        kind,
    );
    if let Some(command) = command_for(app.input_mode(), &key) {
        app.dispatch(command);
    }
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[test]
fn osc52_wraps_base64_payload() {
    assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x1b\\");
}

#[test]
fn quit_on_empty_document_skips_prompt() {
    let mut app = app_with(Diagram::default());
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
    assert!(!app.leave_prompt);
}

#[rstest]
#[case::confirm(KeyCode::Char('y'), true)]
#[case::cancel(KeyCode::Char('n'), false)]
#[case::escape(KeyCode::Esc, false)]
fn quit_with_content_asks_first(#[case] answer: KeyCode, #[case] quits: bool) {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('q'));
    assert!(app.leave_prompt);
    assert!(!app.should_quit);

    press(&mut app, answer);
    assert!(!app.leave_prompt);
    assert_eq!(app.should_quit, quits);
}

#[test]
fn arrow_tool_walks_edges_and_clamps() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.controller.tool(), Tool::Arrow);

    for _ in 0..10 {
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.edge_cursor, 3);

    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.controller.selected_edge(), Some(2));
}

#[test]
fn pan_tool_scrolls_without_going_negative() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.scroll, (1, 1));
    assert_eq!(app.edge_cursor, 0);
}

#[test]
fn label_editing_commits_each_keystroke() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.label_editor.as_deref(), Some("f"));

    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "phi");
    assert_eq!(app.controller.diagram().edges()[0].value(), Some("phi"));

    press(&mut app, KeyCode::Enter);
    assert!(app.label_editor.is_none());
}

#[test]
fn clearing_a_label_removes_it() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('l'));
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.controller.diagram().edges()[0].value(), None);
}

#[test]
fn label_side_cycles_through_positions() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Enter);

    let side = |app: &App| app.controller.diagram().edges()[0].style().label_position;
    assert_eq!(side(&app), LabelPosition::Left);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(side(&app), LabelPosition::Right);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(side(&app), LabelPosition::Inside);
}

#[test]
fn label_commands_without_selection_only_toast() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('l'));
    assert!(app.label_editor.is_none());
    assert!(app.toast.is_some());
}

#[test]
fn disabled_clipboard_raises_manual_copy_notice() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('p'));

    assert!(matches!(app.controller.notice(), Some(Notice::ManualCopy { .. })));
    assert!(app.location.fragment().is_some());

    // Notices swallow everything except acknowledgement.
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Enter);
    assert!(app.controller.notice().is_none());
}

#[test]
fn broken_code_is_rejected_with_notice() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('e'));
    assert!(app.controller.code_popup().is_some());

    type_text(&mut app, "?!");
    press(&mut app, KeyCode::Esc);

    assert!(app.controller.code_popup().is_none());
    assert!(matches!(app.controller.notice(), Some(Notice::InvalidCode(_))));
    assert_eq!(**app.controller.diagram(), demo_diagram());
}

#[test]
fn removing_last_edge_keeps_cursor_in_range() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('t'));
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('x'));

    assert_eq!(app.controller.diagram().edges().len(), 3);
    assert_eq!(app.edge_cursor, 2);
}

#[rstest]
#[case::undo(KeyModifiers::CONTROL, KeyCode::Char('z'), Some(Command::Undo))]
#[case::redo(KeyModifiers::CONTROL | KeyModifiers::SHIFT, KeyCode::Char('z'), Some(Command::Redo))]
#[case::down(KeyModifiers::NONE, KeyCode::Char('j'), Some(Command::Move(Direction::Down)))]
fn canvas_keys(
    #[case] modifiers: KeyModifiers,
    #[case] code: KeyCode,
    #[case] expected: Option<Command>,
) {
    let app = app_with(Diagram::default());
    assert_eq!(command_for(app.input_mode(), &KeyEvent::new(code, modifiers)), expected);
}

#[test]
fn override_released_inside_code_popup_restores_tool() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.controller.tool(), Tool::Arrow);

    alt(&mut app, KeyEventKind::Press);
    assert_eq!(app.controller.tool(), Tool::Pan);

    let open = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::ALT);
    let command = command_for(app.input_mode(), &open).expect("open code popup");
    app.dispatch(command);
    assert!(app.controller.code_popup().is_some());

    alt(&mut app, KeyEventKind::Release);
    press(&mut app, KeyCode::Esc);
    assert!(app.controller.code_popup().is_none());
    assert_eq!(app.controller.tool(), Tool::Arrow);

    alt(&mut app, KeyEventKind::Press);
    assert_eq!(app.controller.tool(), Tool::Pan, "a later hold overrides again");
}

#[test]
fn override_released_under_notice_restores_tool() {
    let mut app = app_with(demo_diagram());
    alt(&mut app, KeyEventKind::Press);
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.controller.tool(), Tool::Arrow);

    // Release restores the tool from before the hold, even after a manual switch.
    press(&mut app, KeyCode::Char('p'));
    assert!(app.controller.notice().is_some());
    alt(&mut app, KeyEventKind::Release);
    assert!(app.controller.notice().is_some(), "release does not acknowledge");
    assert_eq!(app.controller.tool(), Tool::Pan);
}

#[test]
fn add_edge_draws_alongside_cursor_edge_and_selects_it() {
    let mut app = app_with(demo_diagram());
    press(&mut app, KeyCode::Char('t'));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('a'));

    let edges = app.controller.diagram().edges();
    assert_eq!(edges.len(), 5);
    assert_eq!(edges[4].from().as_str(), "b");
    assert_eq!(edges[4].to().as_str(), "d");
    assert_eq!(app.controller.selected_edge(), Some(4));
    assert_eq!(app.edge_cursor, 4);
}

#[test]
fn add_edge_without_two_nodes_only_toasts() {
    let mut app = app_with(Diagram::default());
    press(&mut app, KeyCode::Char('a'));
    assert!(app.controller.diagram().is_empty());
    assert!(app.toast.is_some());
}

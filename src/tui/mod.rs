// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a single editing session (ratatui + crossterm): a node grid, the edge list, a property
//! line for the selected edge, the code popup, and blocking notices.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::model::{Diagram, Edge, EdgePatch, LabelPosition, NodeId};
use crate::session::{
    Clipboard, ClipboardError, Controller, MemoryLocation, PermalinkCopy, PopupClose, Tool,
};

mod keymap;

use keymap::{command_for, Command, Direction as Move, InputMode};

const FOCUS_COLOR: Color = Color::LightGreen;
const PANEL_COLOR: Color = Color::DarkGray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const CELL_WIDTH: u16 = 12;
const CELL_HEIGHT: u16 = 3;
const TOAST_DURATION: Duration = Duration::from_secs(2);

/// The square diagram shown by `--demo`.
pub fn demo_diagram() -> Diagram {
    crate::model::fixtures::commutative_square()
}

/// Where the permalink goes when the user copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClipboard {
    /// Terminal clipboard via the OSC 52 escape sequence.
    Osc52,
    /// Always fall back to showing the link.
    Disabled,
}

impl Clipboard for HostClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self {
            Self::Osc52 => {
                let mut stdout = io::stdout();
                execute!(stdout, Print(osc52_sequence(text)))
                    .map_err(|err| ClipboardError::new(err.to_string()))
            }
            Self::Disabled => Err(ClipboardError::new("disabled")),
        }
    }
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Runs the interactive editor until the user quits and returns the final location, whose
/// fragment holds the last copied permalink.
pub fn run(
    controller: Controller,
    location: MemoryLocation,
    clipboard: HostClipboard,
) -> Result<MemoryLocation, Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(controller, location, clipboard);

    while !app.should_quit {
        app.controller.tick();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = command_for(app.input_mode(), &key) {
                    app.dispatch(command);
                }
            }
        }
    }

    Ok(app.location)
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    controller: Controller,
    location: MemoryLocation,
    clipboard: HostClipboard,
    edge_cursor: usize,
    scroll: (u16, u16),
    label_editor: Option<String>,
    leave_prompt: bool,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(controller: Controller, location: MemoryLocation, clipboard: HostClipboard) -> Self {
        Self {
            controller,
            location,
            clipboard,
            edge_cursor: 0,
            scroll: (0, 0),
            label_editor: None,
            leave_prompt: false,
            toast: None,
            should_quit: false,
        }
    }

    fn input_mode(&self) -> InputMode {
        if self.controller.notice().is_some() {
            InputMode::Notice
        } else if self.leave_prompt {
            InputMode::LeavePrompt
        } else if self.controller.code_popup().is_some() {
            InputMode::CodePopup
        } else if self.label_editor.is_some() {
            InputMode::LabelEdit
        } else {
            InputMode::Canvas
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    fn dispatch(&mut self, command: Command) {
        if let Command::OverrideUp(key) = command {
            self.controller.override_key_up(key);
            return;
        }

        match self.input_mode() {
            InputMode::Notice => {
                if command == Command::Acknowledge {
                    self.controller.acknowledge_notice();
                }
            }
            InputMode::LeavePrompt => {
                self.leave_prompt = false;
                if command == Command::ConfirmLeave {
                    self.should_quit = true;
                }
            }
            InputMode::CodePopup => self.handle_code_popup(command),
            InputMode::LabelEdit => self.handle_label_edit(command),
            InputMode::Canvas => self.handle_canvas(command),
        }
    }

    fn handle_code_popup(&mut self, command: Command) {
        if command == Command::Dismiss {
            match self.controller.close_code_popup() {
                PopupClose::Applied(_) => self.set_toast("Diagram code applied"),
                PopupClose::Unchanged | PopupClose::NotOpen | PopupClose::Rejected => {}
            }
            self.clamp_edge_cursor();
            return;
        }

        let Some(popup) = self.controller.code_popup_mut() else {
            return;
        };
        match command {
            Command::Insert(ch) => popup.text.push(ch),
            Command::Newline => popup.text.push('\n'),
            Command::Backspace => {
                popup.text.pop();
            }
            _ => {}
        }
    }

    fn handle_label_edit(&mut self, command: Command) {
        let Some(buffer) = self.label_editor.as_mut() else {
            return;
        };
        match command {
            Command::Insert(ch) => buffer.push(ch),
            Command::Backspace => {
                buffer.pop();
            }
            Command::Dismiss => {
                self.label_editor = None;
                return;
            }
            _ => return,
        }

        // Every keystroke is committed; the history collapses a typing burst into one step.
        let patch = EdgePatch::value(buffer.clone());
        if let Err(err) = self.controller.update_selected_edge(&patch) {
            self.label_editor = None;
            self.set_toast(format!("Label edit ended: {err}"));
        }
    }

    fn handle_canvas(&mut self, command: Command) {
        match command {
            Command::OverrideDown(key) => self.controller.override_key_down(key),
            Command::Dismiss => {
                self.controller.dismiss();
            }
            Command::Undo => {
                let message = if self.controller.undo() { "Undo" } else { "Nothing to undo" };
                self.set_toast(message);
                self.clamp_edge_cursor();
            }
            Command::Redo => {
                let message = if self.controller.redo() { "Redo" } else { "Nothing to redo" };
                self.set_toast(message);
                self.clamp_edge_cursor();
            }
            Command::OpenCode => self.controller.open_code_popup(),
            Command::CopyPermalink => {
                match self.controller.copy_permalink(&mut self.location, &mut self.clipboard) {
                    PermalinkCopy::Copied { .. } => self.set_toast("Link copied"),
                    PermalinkCopy::AlreadyConfirmed | PermalinkCopy::ManualCopy { .. } => {}
                }
            }
            Command::CycleTool => {
                let tool = self.controller.tool().next();
                self.controller.set_tool(tool);
            }
            Command::Move(direction) => self.move_in_canvas(direction),
            Command::ToggleSelect => {
                if !self.controller.diagram().edges().is_empty() {
                    self.controller.select_edge(self.edge_cursor);
                }
            }
            Command::AddEdge => self.add_edge(),
            Command::EditLabel => match self.controller.property_panel().edge {
                Some(edge) => self.label_editor = Some(edge.value().unwrap_or("").to_owned()),
                None => self.set_toast("No edge selected"),
            },
            Command::SwapLabelSide => {
                let Some(edge) = self.controller.property_panel().edge else {
                    self.set_toast("No edge selected");
                    return;
                };
                let next = match edge.style().label_position {
                    LabelPosition::Left => LabelPosition::Right,
                    LabelPosition::Right => LabelPosition::Inside,
                    LabelPosition::Inside => LabelPosition::Left,
                };
                if let Err(err) =
                    self.controller.update_selected_edge(&EdgePatch::label_position(next))
                {
                    self.set_toast(err.to_string());
                }
            }
            Command::RemoveEdge => match self.controller.remove_selected_edge() {
                Ok(_) => self.clamp_edge_cursor(),
                Err(err) => self.set_toast(err.to_string()),
            },
            Command::Quit => {
                if self.controller.needs_leave_confirmation() {
                    self.leave_prompt = true;
                } else {
                    self.should_quit = true;
                }
            }
            Command::OverrideUp(_)
            | Command::Insert(_)
            | Command::Newline
            | Command::Backspace
            | Command::Acknowledge
            | Command::ConfirmLeave => {}
        }
    }

    /// Draws a new edge alongside the one under the cursor, or between the first two nodes when
    /// there are no edges yet. The document change selects it.
    fn add_edge(&mut self) {
        let diagram = self.controller.diagram();
        let endpoints = match (diagram.edge(self.edge_cursor), diagram.nodes()) {
            (Some(edge), _) => Some((edge.from().clone(), edge.to().clone())),
            (None, [first, second, ..]) => Some((first.id().clone(), second.id().clone())),
            (None, _) => None,
        };
        let Some((from, to)) = endpoints else {
            self.set_toast("Need two nodes to draw an edge");
            return;
        };

        let next = diagram.with_edge(Edge::new(from, to));
        self.controller.apply_document_change(next);
        if let Some(index) = self.controller.selected_edge() {
            self.edge_cursor = index;
        }
    }

    /// The pan tool scrolls the grid; the arrow tool walks the edge list.
    fn move_in_canvas(&mut self, direction: Move) {
        match (self.controller.tool(), direction) {
            (Tool::Arrow, Move::Up) => {
                self.edge_cursor = self.edge_cursor.saturating_sub(1);
            }
            (Tool::Arrow, Move::Down) => {
                self.edge_cursor = self.edge_cursor.saturating_add(1);
                self.clamp_edge_cursor();
            }
            (Tool::Arrow, _) => {}
            (Tool::Pan, Move::Up) => self.scroll.1 = self.scroll.1.saturating_sub(1),
            (Tool::Pan, Move::Down) => {
                self.scroll.1 = self.scroll.1.saturating_add(1)
            }
            (Tool::Pan, Move::Left) => {
                self.scroll.0 = self.scroll.0.saturating_sub(1)
            }
            (Tool::Pan, Move::Right) => {
                self.scroll.0 = self.scroll.0.saturating_add(1)
            }
        }
    }

    fn clamp_edge_cursor(&mut self) {
        let count = self.controller.diagram().edges().len();
        self.edge_cursor = self.edge_cursor.min(count.saturating_sub(1));
    }
}

fn edge_line(diagram: &Diagram, edge: &Edge) -> String {
    let name = |id: &NodeId| {
        diagram
            .node(id)
            .map(|node| node.value())
            .filter(|value| !value.is_empty())
            .unwrap_or(id.as_str())
            .to_owned()
    };
    let label = edge.value().unwrap_or("");
    format!("{} --{label}--> {}", name(edge.from()), name(edge.to()))
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let panel_area = layout[1];
    let status_area = layout[2];

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_area);

    draw_grid(frame, app, panes[0]);
    draw_edges(frame, app, panes[1]);
    draw_property_panel(frame, app, panel_area);
    draw_status(frame, app, status_area);

    if let Some(popup) = app.controller.code_popup() {
        let popup_area = centered_rect(70, 70, main_area);
        frame.render_widget(Clear, popup_area);
        let text = Paragraph::new(format!("{}_", popup.text)).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FOCUS_COLOR))
                .title(" Diagram code (Esc/Tab to apply) "),
        );
        frame.render_widget(text, popup_area);
    }

    if app.leave_prompt {
        draw_modal(frame, main_area, " Leave? ", "Unsaved diagram will be lost. Leave? (y/N)");
    }

    if let Some(notice) = app.controller.notice() {
        draw_modal(frame, main_area, " Notice (Enter) ", &notice.to_string());
    }
}

fn draw_grid(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let input = app.controller.render_input();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PANEL_COLOR))
        .title(format!(" Diagram [{}] ", input.tool.label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = input.selected_edge.and_then(|index| input.diagram.edge(index));
    let (scroll_x, scroll_y) = app.scroll;

    for node in input.diagram.nodes() {
        let position = node.position();
        let (Ok(col), Ok(row)) = (u16::try_from(position.x), u16::try_from(position.y)) else {
            continue;
        };
        let (Some(col), Some(row)) = (col.checked_sub(scroll_x), row.checked_sub(scroll_y)) else {
            continue;
        };
        let x = inner.x.saturating_add(col.saturating_mul(CELL_WIDTH));
        let y = inner.y.saturating_add(row.saturating_mul(CELL_HEIGHT));
        if x >= inner.right() || y >= inner.bottom() {
            continue;
        }

        let highlighted = selected.is_some_and(|edge| edge.touches(node.id()));
        let style = if highlighted {
            Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let text = if node.is_blank() { "·" } else { node.value() };
        let width = CELL_WIDTH.min(inner.right() - x);
        frame.render_widget(Paragraph::new(text).style(style), Rect::new(x, y, width, 1));
    }
}

fn draw_edges(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let input = app.controller.render_input();
    let items = input
        .diagram
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let marker = if input.selected_edge == Some(index) { "● " } else { "  " };
            ListItem::new(format!("{marker}{}", edge_line(input.diagram, edge)))
        })
        .collect::<Vec<_>>();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.edge_cursor));
    }
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PANEL_COLOR))
                .title(" Edges "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_property_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let panel = app.controller.property_panel();
    let text = match (panel.visible, panel.selected_edge, panel.edge) {
        (true, Some(index), Some(edge)) => {
            let label = match &app.label_editor {
                Some(buffer) => format!("{buffer}_"),
                None => edge.value().unwrap_or("-").to_owned(),
            };
            let style = edge.style();
            format!(
                "Edge {index}: label {label} | side {:?} | line {:?} | head {:?} | bend {}",
                style.label_position, style.line, style.head, style.bend
            )
        }
        _ => "No edge selected".to_owned(),
    };
    let border = if app.label_editor.is_some() { FOCUS_COLOR } else { PANEL_COLOR };
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Edge "),
    );
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let history = app.controller.history();
    let mut spans = vec![
        Span::styled("^Z", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(" undo "),
        Span::styled("a", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(" edge "),
        Span::styled("e", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(" code "),
        Span::styled("p", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(" link "),
        Span::styled("t", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(" tool "),
        Span::styled("q", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(format!(" quit | step {}/{}", history.cursor() + 1, history.len())),
    ];

    if app.controller.link_copy_confirmed() {
        spans.push(Span::styled(" | Link copied ✓", Style::default().fg(FOCUS_COLOR)));
    }

    match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => {
            spans.push(Span::raw(format!(" | {}", toast.message)));
        }
        Some(_) => app.toast = None,
        None => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_modal(frame: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let area = centered_rect(60, 30, area);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(message.to_owned()).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_owned()),
    );
    frame.render_widget(paragraph, area);
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    keyboard_enhanced: bool,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal(false);
            err
        })?;

        // Key release events (needed for held-modifier tool overrides) require the kitty
        // keyboard protocol.
        let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )
            .is_ok();

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal(keyboard_enhanced);
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal(keyboard_enhanced);
            err
        })?;

        Ok(Self { terminal, keyboard_enhanced })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal(self.keyboard_enhanced);
    }
}

fn teardown_terminal(keyboard_enhanced: bool) {
    let mut stdout = io::stdout();
    if keyboard_enhanced {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;

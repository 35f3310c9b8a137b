// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Translates terminal key events into session commands.
//!
//! The mapping depends on which surface currently owns the keyboard; the session controller
//! itself never sees raw key events.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::session::OverrideKey;

/// Which surface receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Canvas,
    CodePopup,
    LabelEdit,
    Notice,
    LeavePrompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    OverrideDown(OverrideKey),
    OverrideUp(OverrideKey),
    Dismiss,
    Undo,
    Redo,
    OpenCode,
    CopyPermalink,
    CycleTool,
    Move(Direction),
    ToggleSelect,
    AddEdge,
    EditLabel,
    SwapLabelSide,
    RemoveEdge,
    Quit,
    Insert(char),
    Newline,
    Backspace,
    Acknowledge,
    ConfirmLeave,
}

fn override_key(code: ModifierKeyCode) -> Option<OverrideKey> {
    match code {
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Some(OverrideKey::Pan),
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some(OverrideKey::Arrow),
        _ => None,
    }
}

fn undo_redo(key: &KeyEvent) -> Option<Command> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('Z') => Some(Command::Redo),
        KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Command::Redo),
        KeyCode::Char('z') => Some(Command::Undo),
        _ => None,
    }
}

pub(crate) fn command_for(mode: InputMode, key: &KeyEvent) -> Option<Command> {
    if let KeyCode::Modifier(code) = key.code {
        let override_key = override_key(code)?;
        // Releases are delivered in every mode; presses only on the canvas.
        return match key.kind {
            KeyEventKind::Press if mode == InputMode::Canvas => {
                Some(Command::OverrideDown(override_key))
            }
            KeyEventKind::Release => Some(Command::OverrideUp(override_key)),
            KeyEventKind::Press | KeyEventKind::Repeat => None,
        };
    }

    if key.kind == KeyEventKind::Release {
        return None;
    }

    match mode {
        InputMode::Notice => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Command::Acknowledge),
            _ => None,
        },
        InputMode::LeavePrompt => match key.code {
            KeyCode::Char('y' | 'Y') => Some(Command::ConfirmLeave),
            _ => Some(Command::Dismiss),
        },
        InputMode::CodePopup | InputMode::LabelEdit => match key.code {
            KeyCode::Esc | KeyCode::Tab => Some(Command::Dismiss),
            KeyCode::Enter if mode == InputMode::LabelEdit => Some(Command::Dismiss),
            KeyCode::Enter => Some(Command::Newline),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Insert(ch))
            }
            _ => None,
        },
        InputMode::Canvas => {
            if let Some(command) = undo_redo(key) {
                return Some(command);
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return match key.code {
                    KeyCode::Char('c') => Some(Command::Quit),
                    _ => None,
                };
            }
            match key.code {
                KeyCode::Esc => Some(Command::Dismiss),
                KeyCode::Char('q') => Some(Command::Quit),
                KeyCode::Char('e') => Some(Command::OpenCode),
                KeyCode::Char('p') => Some(Command::CopyPermalink),
                KeyCode::Char('t') => Some(Command::CycleTool),
                KeyCode::Char('a') => Some(Command::AddEdge),
                KeyCode::Char('l') => Some(Command::EditLabel),
                KeyCode::Char('s') => Some(Command::SwapLabelSide),
                KeyCode::Char('x') | KeyCode::Delete => Some(Command::RemoveEdge),
                KeyCode::Enter => Some(Command::ToggleSelect),
                KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
                KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
                KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
                KeyCode::Right => Some(Command::Move(Direction::Right)),
                _ => None,
            }
        }
    }
}

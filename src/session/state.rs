// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::Instant;

use crate::format::{DecodeError, ParseError};
use crate::model::{Diagram, Edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Pan,
    Arrow,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Arrow => "arrow",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Pan => Self::Arrow,
            Self::Arrow => Self::Pan,
        }
    }
}

/// A momentary key that swaps the active tool while it is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideKey {
    Pan,
    Arrow,
}

impl OverrideKey {
    pub fn tool(self) -> Tool {
        match self {
            Self::Pan => Tool::Pan,
            Self::Arrow => Tool::Arrow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ToolOverride {
    pub(crate) key: OverrideKey,
    pub(crate) previous: Tool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePopup {
    pub text: String,
}

/// Something the user has to acknowledge before the session accepts further input.
#[derive(Debug)]
pub enum Notice {
    InvalidLink(DecodeError),
    InvalidCode(ParseError),
    ManualCopy { url: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLink(err) => {
                write!(f, "Could not open the linked diagram; starting empty. {err}")
            }
            Self::InvalidCode(err) => write!(f, "Could not apply diagram code. {err}"),
            Self::ManualCopy { url } => write!(f, "Copy this link manually: {url}"),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) tool: Tool,
    pub(crate) selected_edge: Option<usize>,
    pub(crate) code_popup: Option<CodePopup>,
    pub(crate) link_confirmed_until: Option<Instant>,
    pub(crate) tool_override: Option<ToolOverride>,
    pub(crate) notice: Option<Notice>,
}

/// Everything the editing surface needs to draw a frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub tool: Tool,
    pub selected_edge: Option<usize>,
    pub diagram: &'a Diagram,
}

/// Input for the single-edge property panel.
#[derive(Debug, Clone, Copy)]
pub struct PropertyPanel<'a> {
    pub selected_edge: Option<usize>,
    pub edge: Option<&'a Edge>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    NoEdgeSelected,
    MissingEdge { index: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEdgeSelected => f.write_str("no edge selected"),
            Self::MissingEdge { index } => write!(f, "selected edge {index} does not exist"),
        }
    }
}

impl std::error::Error for EditError {}

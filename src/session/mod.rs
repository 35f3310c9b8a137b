// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session: the document, its undo history, and transient UI state.
//!
//! The [`Controller`] is the only thing that mutates a session. Hosts feed it input through its
//! entry points and read back [`RenderInput`]/[`PropertyPanel`] snapshots to draw.

pub mod config;
mod controller;
pub mod host;
mod state;

pub use config::{SessionConfig, DEFAULT_LINK_CONFIRM_DURATION};
pub use controller::{Controller, PermalinkCopy, PopupClose};
pub use host::{
    Clipboard, ClipboardError, Clock, Location, ManualClock, MemoryLocation, SystemClock,
};
pub use state::{CodePopup, EditError, Notice, OverrideKey, PropertyPanel, RenderInput, Tool};

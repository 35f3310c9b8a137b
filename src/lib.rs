// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Arrowboard: a terminal editor for small commutative-diagram style graphs.
//!
//! The whole document travels in a URL fragment, every edit goes through an undo history that
//! coalesces rapid changes, and the diagram can be round-tripped through a text markup.

pub mod format;
pub mod history;
pub mod model;
pub mod session;
pub mod tui;

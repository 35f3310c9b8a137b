// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram document model.
//!
//! A diagram is a plain value (nodes plus edges); history and selection live in the session.

pub mod diagram;
pub(crate) mod fixtures;
pub mod ids;

pub use diagram::{
    ArrowHead, Diagram, DiagramError, Edge, EdgePatch, EdgeStyle, LabelPosition, LineKind, Node,
    Position,
};
pub use ids::{IdError, NodeId};

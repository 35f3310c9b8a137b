// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use crate::history::DEFAULT_COALESCE_WINDOW;

pub const DEFAULT_LINK_CONFIRM_DURATION: Duration = Duration::from_millis(1000);

/// Tunables for a [`Controller`](super::Controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Edits closer together than this collapse into one undo step.
    pub coalesce_window: Duration,
    /// How long the "link copied" confirmation stays up.
    pub link_confirm_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            coalesce_window: DEFAULT_COALESCE_WINDOW,
            link_confirm_duration: DEFAULT_LINK_CONFIRM_DURATION,
        }
    }
}

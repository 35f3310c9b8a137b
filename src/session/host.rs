// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collaborators the session needs from its host: a clock, a clipboard, and an addressable
//! location that holds the permalink fragment.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Rc::new(Cell::new(Instant::now())) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardError {
    reason: String,
}

impl ClipboardError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipboard unavailable: {}", self.reason)
    }
}

impl std::error::Error for ClipboardError {}

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The host's addressable location (the page URL, split at `#`).
pub trait Location {
    /// The URL without any fragment.
    fn base_url(&self) -> &str;
    fn fragment(&self) -> Option<&str>;
    /// Replaces the fragment in place, without adding a navigation entry.
    fn replace_fragment(&mut self, fragment: &str);

    fn url(&self) -> String {
        match self.fragment() {
            Some(fragment) => format!("{}#{fragment}", self.base_url()),
            None => self.base_url().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocation {
    base_url: String,
    fragment: Option<String>,
}

impl MemoryLocation {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), fragment: None }
    }

    /// Splits `url` at the first `#`. An empty fragment counts as no fragment.
    pub fn parse(url: &str) -> Self {
        match url.split_once('#') {
            Some((base, fragment)) => Self {
                base_url: base.to_owned(),
                fragment: (!fragment.is_empty()).then(|| fragment.to_owned()),
            },
            None => Self::new(url),
        }
    }
}

impl Location for MemoryLocation {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment = Some(fragment.to_owned());
    }
}

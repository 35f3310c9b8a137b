// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo history over diagram snapshots.
//!
//! Every committed edit either appends a snapshot or overwrites the snapshot under the cursor.
//! Overwriting is what turns a burst of rapid edits (dragging, typing a label) into a single undo
//! step. The decision is purely time based: there is no content diffing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::Diagram;

pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    diagram: Arc<Diagram>,
    time: Instant,
}

impl HistoryEntry {
    pub fn diagram(&self) -> &Arc<Diagram> {
        &self.diagram
    }

    pub fn time(&self) -> Instant {
        self.time
    }
}

/// What [`History::record`] did with a candidate snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The candidate matches the snapshot under the cursor; nothing changed.
    Unchanged,
    Appended,
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    coalesce_window: Duration,
}

impl History {
    pub fn new(initial: Arc<Diagram>, now: Instant) -> Self {
        Self {
            entries: vec![HistoryEntry { diagram: initial, time: now }],
            cursor: 0,
            coalesce_window: DEFAULT_COALESCE_WINDOW,
        }
    }

    pub fn with_coalesce_window(mut self, coalesce_window: Duration) -> Self {
        self.coalesce_window = coalesce_window;
        self
    }

    pub fn coalesce_window(&self) -> Duration {
        self.coalesce_window
    }

    /// Records `diagram` as the new current snapshot.
    ///
    /// A new entry is appended when the cursor is not at the tail (the redo branch is dropped) or
    /// when more than the coalesce window has passed since the entry under the cursor was
    /// written. Otherwise that entry is overwritten and its time reset to `now`.
    pub fn record(&mut self, diagram: Arc<Diagram>, now: Instant) -> Recorded {
        let head = &self.entries[self.cursor];
        if Arc::ptr_eq(&head.diagram, &diagram) || *head.diagram == *diagram {
            return Recorded::Unchanged;
        }

        let at_tail = self.cursor + 1 == self.entries.len();
        let quiet = now.saturating_duration_since(head.time) > self.coalesce_window;
        let entry = HistoryEntry { diagram, time: now };

        if !at_tail || quiet {
            self.entries.truncate(self.cursor + 1);
            self.entries.push(entry);
            self.cursor += 1;
            Recorded::Appended
        } else {
            self.entries[self.cursor] = entry;
            Recorded::Coalesced
        }
    }

    /// Steps back one snapshot. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Arc<Diagram>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Steps forward one snapshot. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Arc<Diagram>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn current(&self) -> &Arc<Diagram> {
        &self.entries[self.cursor].diagram
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the history holds at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

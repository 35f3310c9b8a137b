// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use crate::format::{Codec, Gateway};
use crate::history::{History, Recorded};
use crate::model::{Diagram, EdgePatch};

use super::config::SessionConfig;
use super::host::{Clipboard, Clock, Location, SystemClock};
use super::state::{
    CodePopup, EditError, Notice, OverrideKey, PropertyPanel, RenderInput, SessionState, Tool,
    ToolOverride,
};

/// Result of closing the code popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupClose {
    NotOpen,
    /// The text still matches the document.
    Unchanged,
    Applied(Recorded),
    /// The text did not parse; a notice was raised and the document kept.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermalinkCopy {
    /// A previous copy is still being confirmed; nothing was done.
    AlreadyConfirmed,
    Copied { url: String },
    /// The clipboard was unavailable; the URL was raised as a notice instead.
    ManualCopy { url: String },
}

/// Owns the document, its history, and the transient editing state.
///
/// Every public method runs to completion and leaves the session consistent; the host never
/// observes a half-applied edit. The current document is always the history entry under the
/// cursor.
pub struct Controller<G = Codec, C = SystemClock> {
    gateway: G,
    clock: C,
    config: SessionConfig,
    history: History,
    state: SessionState,
}

impl Controller {
    /// Starts with the default codec and the wall clock.
    pub fn start_default(fragment: Option<&str>, config: SessionConfig) -> Self {
        Self::start(fragment, config, Codec, SystemClock)
    }
}

impl<G: Gateway, C: Clock> Controller<G, C> {
    pub fn new(diagram: Diagram, config: SessionConfig, gateway: G, clock: C) -> Self {
        let history = History::new(Arc::new(diagram), clock.now())
            .with_coalesce_window(config.coalesce_window);
        Self { gateway, clock, config, history, state: SessionState::default() }
    }

    /// Opens the diagram carried in a URL fragment.
    ///
    /// A missing or empty fragment starts an empty diagram. A fragment that fails to decode also
    /// starts empty, with the decode error raised as a notice.
    pub fn start(fragment: Option<&str>, config: SessionConfig, gateway: G, clock: C) -> Self {
        let fragment = fragment
            .map(|fragment| fragment.trim().trim_start_matches('#'))
            .filter(|fragment| !fragment.is_empty());

        let (diagram, notice) = match fragment.map(|fragment| gateway.decode_compact(fragment)) {
            None => (Diagram::default(), None),
            Some(Ok(diagram)) => (diagram, None),
            Some(Err(err)) => (Diagram::default(), Some(Notice::InvalidLink(err))),
        };

        let mut controller = Self::new(diagram, config, gateway, clock);
        controller.state.notice = notice;
        controller
    }

    pub fn diagram(&self) -> &Arc<Diagram> {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tool(&self) -> Tool {
        self.state.tool
    }

    pub fn selected_edge(&self) -> Option<usize> {
        self.state.selected_edge
    }

    pub fn code_popup(&self) -> Option<&CodePopup> {
        self.state.code_popup.as_ref()
    }

    pub fn code_popup_mut(&mut self) -> Option<&mut CodePopup> {
        self.state.code_popup.as_mut()
    }

    pub fn render_input(&self) -> RenderInput<'_> {
        RenderInput {
            tool: self.state.tool,
            selected_edge: self.state.selected_edge,
            diagram: self.diagram(),
        }
    }

    pub fn property_panel(&self) -> PropertyPanel<'_> {
        let edge = self.state.selected_edge.and_then(|index| self.diagram().edge(index));
        PropertyPanel { selected_edge: self.state.selected_edge, edge, visible: edge.is_some() }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.state.notice.as_ref()
    }

    /// Takes the pending notice, unblocking the session.
    pub fn acknowledge_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Leaving would lose work whenever the document has any content.
    pub fn needs_leave_confirmation(&self) -> bool {
        !self.diagram().is_empty()
    }

    /// Commits a full replacement document from the editing surface.
    ///
    /// When the new document has exactly one more edge than the previous one, that last edge is
    /// selected.
    pub fn apply_document_change(&mut self, diagram: impl Into<Arc<Diagram>>) -> Recorded {
        let diagram = diagram.into();
        let previous_edges = self.diagram().edges().len();
        let new_edges = diagram.edges().len();

        let recorded = self.history.record(diagram, self.clock.now());

        if new_edges == previous_edges + 1 {
            self.state.selected_edge = Some(new_edges - 1);
        }

        recorded
    }

    /// Selects the edge at `index`, or clears the selection if it is already selected.
    /// Indices past the end are ignored.
    pub fn select_edge(&mut self, index: usize) {
        if self.state.selected_edge == Some(index) {
            self.state.selected_edge = None;
        } else if index < self.diagram().edges().len() {
            self.state.selected_edge = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.selected_edge = None;
    }

    pub fn update_selected_edge(&mut self, patch: &EdgePatch) -> Result<Recorded, EditError> {
        let index = self.state.selected_edge.ok_or(EditError::NoEdgeSelected)?;
        let next = self
            .diagram()
            .with_edge_patched(index, patch)
            .ok_or(EditError::MissingEdge { index })?;
        Ok(self.apply_document_change(next))
    }

    /// Removes the selected edge along with any blank node it leaves unreferenced.
    pub fn remove_selected_edge(&mut self) -> Result<Recorded, EditError> {
        let index = self.state.selected_edge.ok_or(EditError::NoEdgeSelected)?;
        let next = self.diagram().without_edge(index).ok_or(EditError::MissingEdge { index })?;
        let recorded = self.apply_document_change(next);
        self.state.selected_edge = None;
        Ok(recorded)
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo().is_some();
        if moved {
            self.state.selected_edge = None;
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo().is_some();
        if moved {
            self.state.selected_edge = None;
        }
        moved
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.state.tool = tool;
        self.state.selected_edge = None;
    }

    /// Swaps to the key's tool while it is held. A second key pressed during an override is
    /// ignored.
    pub fn override_key_down(&mut self, key: OverrideKey) {
        if self.state.tool_override.is_some() {
            return;
        }
        self.state.tool_override = Some(ToolOverride { key, previous: self.state.tool });
        self.set_tool(key.tool());
    }

    /// Restores the tool that was active before the override started.
    pub fn override_key_up(&mut self, key: OverrideKey) {
        match self.state.tool_override {
            Some(active) if active.key == key => {
                self.state.tool_override = None;
                self.set_tool(active.previous);
            }
            _ => {}
        }
    }

    pub fn open_code_popup(&mut self) {
        let text = self.gateway.encode_markup(self.diagram());
        self.state.code_popup = Some(CodePopup { text });
        self.state.selected_edge = None;
    }

    /// Closes the code popup, committing its text if it was edited.
    ///
    /// The text is parsed once; a parse failure raises a notice and leaves the document as it
    /// was. The popup closes either way.
    pub fn close_code_popup(&mut self) -> PopupClose {
        let Some(popup) = self.state.code_popup.take() else {
            return PopupClose::NotOpen;
        };

        if popup.text == self.gateway.encode_markup(self.diagram()) {
            return PopupClose::Unchanged;
        }

        match self.gateway.decode_markup(&popup.text) {
            Ok(diagram) => {
                let recorded = self.apply_document_change(diagram);
                self.state.selected_edge = None;
                PopupClose::Applied(recorded)
            }
            Err(err) => {
                self.state.notice = Some(Notice::InvalidCode(err));
                PopupClose::Rejected
            }
        }
    }

    /// The "escape" action: closes the code popup if open, otherwise clears the selection.
    pub fn dismiss(&mut self) -> Option<PopupClose> {
        if self.state.code_popup.is_some() {
            return Some(self.close_code_popup());
        }
        self.state.selected_edge = None;
        None
    }

    /// Publishes the document as a permalink.
    ///
    /// The location's fragment is replaced in place and the full URL is put on the clipboard.
    /// While a previous copy is still confirmed the call does nothing.
    pub fn copy_permalink(
        &mut self,
        location: &mut impl Location,
        clipboard: &mut impl Clipboard,
    ) -> PermalinkCopy {
        if self.link_copy_confirmed() {
            return PermalinkCopy::AlreadyConfirmed;
        }

        let fragment = self.gateway.encode_compact(self.diagram());
        location.replace_fragment(&fragment);
        let url = format!("{}#{fragment}", location.base_url());

        match clipboard.copy(&url) {
            Ok(()) => {
                self.state.link_confirmed_until =
                    Some(self.clock.now() + self.config.link_confirm_duration);
                PermalinkCopy::Copied { url }
            }
            Err(_) => {
                self.state.notice = Some(Notice::ManualCopy { url: url.clone() });
                PermalinkCopy::ManualCopy { url }
            }
        }
    }

    pub fn link_copy_confirmed(&self) -> bool {
        self.state.link_confirmed_until.is_some_and(|until| self.clock.now() < until)
    }

    /// Expires the link confirmation once its deadline has passed. Returns `true` if it did.
    pub fn tick(&mut self) -> bool {
        if self.state.link_confirmed_until.is_some() && !self.link_copy_confirmed() {
            self.state.link_confirmed_until = None;
            return true;
        }
        false
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// Grid cell a node occupies on the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    value: String,
    #[serde(default)]
    position: Position,
}

impl Node {
    pub fn new(id: NodeId, value: impl Into<String>, position: Position) -> Self {
        Self { id, value: value.into(), position }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// A node without a label is a placeholder that only exists to anchor edges. Whitespace does
    /// not count as a label.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    #[default]
    Arrow,
    None,
}

/// Which side of the arrow the label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Left,
    Right,
    Inside,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "is_default")]
    pub line: LineKind,
    #[serde(default, skip_serializing_if = "is_default")]
    pub head: ArrowHead,
    #[serde(default, skip_serializing_if = "is_default")]
    pub label_position: LabelPosition,
    /// Bend angle in degrees; positive bends to the left of the direction of travel.
    #[serde(default, skip_serializing_if = "is_default")]
    pub bend: i32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub shift: i32,
}

impl EdgeStyle {
    pub fn is_default(&self) -> bool {
        is_default(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(flatten)]
    style: EdgeStyle,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to, value: None, style: EdgeStyle::default() }
    }

    pub fn new_with(from: NodeId, to: NodeId, value: Option<String>, style: EdgeStyle) -> Self {
        Self { from, to, value, style }
    }

    pub fn from(&self) -> &NodeId {
        &self.from
    }

    pub fn to(&self) -> &NodeId {
        &self.to
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.from == node_id || &self.to == node_id
    }

    /// Merges `patch` into this edge.
    ///
    /// A label that trims to nothing is dropped entirely so that an unlabeled edge never carries
    /// an empty string.
    pub fn apply_patch(&mut self, patch: &EdgePatch) {
        if let Some(value) = &patch.value {
            self.value = Some(value.clone());
        }
        if let Some(line) = patch.line {
            self.style.line = line;
        }
        if let Some(head) = patch.head {
            self.style.head = head;
        }
        if let Some(label_position) = patch.label_position {
            self.style.label_position = label_position;
        }
        if let Some(bend) = patch.bend {
            self.style.bend = bend;
        }
        if let Some(shift) = patch.shift {
            self.style.shift = shift;
        }

        self.drop_blank_value();
    }

    fn drop_blank_value(&mut self) {
        if self.value.as_deref().is_some_and(|value| value.trim().is_empty()) {
            self.value = None;
        }
    }
}

/// Partial edge update as emitted by the property panel. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub value: Option<String>,
    pub line: Option<LineKind>,
    pub head: Option<ArrowHead>,
    pub label_position: Option<LabelPosition>,
    pub bend: Option<i32>,
    pub shift: Option<i32>,
}

impl EdgePatch {
    pub fn value(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()), ..Self::default() }
    }

    pub fn label_position(label_position: LabelPosition) -> Self {
        Self { label_position: Some(label_position), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    DuplicateNodeId { node_id: NodeId },
    DanglingEdge { edge_index: usize, node_id: NodeId },
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id: {node_id}"),
            Self::DanglingEdge { edge_index, node_id } => {
                write!(f, "edge {edge_index} references missing node: {node_id}")
            }
        }
    }
}

impl std::error::Error for DiagramError {}

/// The document being edited: an ordered list of nodes and an ordered list of edges.
///
/// Diagrams are handled as immutable snapshots; the `with_*`/`without_*` helpers return a new
/// value and leave `self` untouched. Edges are identified by their index, so removing an edge
/// shifts the identity of every edge after it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Diagram {
    /// Builds a diagram without checking that edges reference existing nodes.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, DiagramError> {
        let diagram = Self::from_parts(nodes, edges);
        diagram.validate()?;
        Ok(diagram)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Checks node id uniqueness and that every edge endpoint exists.
    pub fn validate(&self) -> Result<(), DiagramError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id()) {
                return Err(DiagramError::DuplicateNodeId { node_id: node.id().clone() });
            }
        }

        for (edge_index, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.from(), edge.to()] {
                if !seen.contains(endpoint) {
                    return Err(DiagramError::DanglingEdge {
                        edge_index,
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Drops edge labels that trim to nothing, so an unlabeled edge never carries an empty string.
    pub fn canonicalize(&mut self) {
        for edge in &mut self.edges {
            edge.drop_blank_value();
        }
    }

    pub fn with_node(&self, node: Node) -> Self {
        let mut next = self.clone();
        next.nodes.push(node);
        next
    }

    pub fn with_edge(&self, edge: Edge) -> Self {
        let mut next = self.clone();
        next.edges.push(edge);
        next
    }

    /// Returns a copy with `patch` merged into the edge at `index`, or `None` if there is no such
    /// edge.
    pub fn with_edge_patched(&self, index: usize, patch: &EdgePatch) -> Option<Self> {
        let mut next = self.clone();
        next.edges.get_mut(index)?.apply_patch(patch);
        Some(next)
    }

    /// Returns a copy without the edge at `index`.
    ///
    /// Blank nodes that no remaining edge touches are pruned along with it; labeled nodes stay
    /// even when they end up disconnected.
    pub fn without_edge(&self, index: usize) -> Option<Self> {
        if index >= self.edges.len() {
            return None;
        }

        let mut edges = self.edges.clone();
        edges.remove(index);

        let nodes = self
            .nodes
            .iter()
            .filter(|node| !node.is_blank() || edges.iter().any(|edge| edge.touches(node.id())))
            .cloned()
            .collect();

        Some(Self { nodes, edges })
    }
}

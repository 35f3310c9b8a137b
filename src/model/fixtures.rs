// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::{Diagram, Edge, EdgeStyle, LabelPosition, Node, Position};
use super::ids::NodeId;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn labeled(from: &str, to: &str, label: &str) -> Edge {
    Edge::new_with(nid(from), nid(to), Some(label.to_owned()), EdgeStyle::default())
}

/// The classic commutative square `f ; g = h ; k`.
pub(crate) fn commutative_square() -> Diagram {
    let nodes = vec![
        Node::new(nid("a"), "A", Position::new(0, 0)),
        Node::new(nid("b"), "B", Position::new(1, 0)),
        Node::new(nid("c"), "C", Position::new(0, 1)),
        Node::new(nid("d"), "D", Position::new(1, 1)),
    ];

    let mut k = labeled("c", "d", "k");
    k.apply_patch(&crate::model::EdgePatch::label_position(LabelPosition::Right));

    let edges = vec![labeled("a", "b", "f"), labeled("b", "d", "g"), labeled("a", "c", "h"), k];

    Diagram::from_parts(nodes, edges)
}

#[cfg(test)]
pub(crate) fn blank_pair() -> Diagram {
    Diagram::from_parts(
        vec![
            Node::new(nid("a"), "", Position::new(0, 0)),
            Node::new(nid("b"), "", Position::new(1, 0)),
        ],
        vec![Edge::new(nid("a"), nid("b"))],
    )
}

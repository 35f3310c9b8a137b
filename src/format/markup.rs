// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fmt::Write as _;

use crate::model::{
    ArrowHead, Diagram, Edge, EdgeStyle, IdError, LabelPosition, LineKind, Node, NodeId, Position,
};

const HEADER: &str = "diagram";

/// Edge operators, longest-prefix first.
const EDGE_OPERATORS: [(&str, LineKind, ArrowHead); 8] = [
    ("-.->", LineKind::Dashed, ArrowHead::Arrow),
    ("-.-", LineKind::Dashed, ArrowHead::None),
    ("-->", LineKind::Solid, ArrowHead::Arrow),
    ("---", LineKind::Solid, ArrowHead::None),
    ("..>", LineKind::Dotted, ArrowHead::Arrow),
    ("...", LineKind::Dotted, ArrowHead::None),
    ("==>", LineKind::Double, ArrowHead::Arrow),
    ("===", LineKind::Double, ArrowHead::None),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingHeader,
    UnsupportedSyntax { line_no: usize, line: String },
    InvalidNodeId { line_no: usize, name: String, reason: IdError },
    InvalidPosition { line_no: usize, token: String },
    UnterminatedLabel { line_no: usize, line: String },
    EmptyEdgeLabel { line_no: usize, line: String },
    DuplicateNode { line_no: usize, node_id: NodeId },
    UnknownNode { line_no: usize, node_id: NodeId },
    UnknownAttribute { line_no: usize, attribute: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "expected '{HEADER}' as the first non-empty line"),
            Self::UnsupportedSyntax { line_no, line } => {
                write!(f, "unsupported syntax on line {line_no}: {line}")
            }
            Self::InvalidNodeId { line_no, name, reason } => {
                write!(f, "invalid node id on line {line_no}: {name} ({reason})")
            }
            Self::InvalidPosition { line_no, token } => write!(
                f,
                "invalid node position on line {line_no}: {token} (expected '<x>,<y>')"
            ),
            Self::UnterminatedLabel { line_no, line } => {
                write!(f, "unterminated label on line {line_no}: {line}")
            }
            Self::EmptyEdgeLabel { line_no, line } => {
                write!(f, "empty edge label on line {line_no}: {line}")
            }
            Self::DuplicateNode { line_no, node_id } => {
                write!(f, "node '{node_id}' is declared twice (line {line_no})")
            }
            Self::UnknownNode { line_no, node_id } => write!(
                f,
                "edge on line {line_no} references undeclared node '{node_id}'"
            ),
            Self::UnknownAttribute { line_no, attribute } => write!(
                f,
                "unknown edge attribute on line {line_no}: {attribute} (expected bend=<n>, shift=<n>, swap, or inside)"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

fn escape_label(label: &str, out: &mut String) {
    for ch in label.chars() {
        match ch {
            '\\' | ']' | '|' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}

/// Splits `input` at the first unescaped `close`, returning the unescaped label and the rest.
fn take_label(input: &str, close: char) -> Option<(String, &str)> {
    let mut label = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => label.push('\n'),
                Some((_, escaped)) => label.push(escaped),
                None => return None,
            },
            _ if ch == close => return Some((label, &input[idx + close.len_utf8()..])),
            _ => label.push(ch),
        }
    }
    None
}

fn split_ident(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
        .map(|(idx, _)| idx)
        .unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn parse_node_id(name: &str, line_no: usize) -> Result<NodeId, ParseError> {
    NodeId::new(name).map_err(|reason| ParseError::InvalidNodeId {
        line_no,
        name: name.to_owned(),
        reason,
    })
}

fn parse_position(token: &str, line_no: usize) -> Result<Position, ParseError> {
    let invalid = || ParseError::InvalidPosition { line_no, token: token.trim().to_owned() };
    let (x, y) = token.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Position::new(x, y))
}

fn parse_node_line(
    trimmed: &str,
    name: &str,
    after_at: &str,
    line_no: usize,
) -> Result<Node, ParseError> {
    let node_id = parse_node_id(name, line_no)?;

    let Some(open_idx) = after_at.find('[') else {
        return Ok(Node::new(node_id, "", parse_position(after_at, line_no)?));
    };

    let position = parse_position(&after_at[..open_idx], line_no)?;
    let (label, rest) = take_label(&after_at[open_idx + 1..], ']').ok_or_else(|| {
        ParseError::UnterminatedLabel { line_no, line: trimmed.to_owned() }
    })?;
    if !rest.trim().is_empty() {
        return Err(ParseError::UnsupportedSyntax { line_no, line: trimmed.to_owned() });
    }

    Ok(Node::new(node_id, label, position))
}

fn parse_attributes(
    raw: &str,
    style: &mut EdgeStyle,
    line_no: usize,
) -> Result<(), ParseError> {
    let unknown = |attribute: &str| ParseError::UnknownAttribute {
        line_no,
        attribute: attribute.to_owned(),
    };

    for attribute in raw.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        match attribute.split_once('=') {
            None if attribute == "swap" => style.label_position = LabelPosition::Right,
            None if attribute == "inside" => style.label_position = LabelPosition::Inside,
            Some((key, value)) => {
                let value: i32 = value.trim().parse().map_err(|_| unknown(attribute))?;
                match key.trim() {
                    "bend" => style.bend = value,
                    "shift" => style.shift = value,
                    _ => return Err(unknown(attribute)),
                }
            }
            None => return Err(unknown(attribute)),
        }
    }

    Ok(())
}

fn parse_edge_line(
    trimmed: &str,
    from_name: &str,
    after_from: &str,
    nodes: &[Node],
    line_no: usize,
) -> Result<Edge, ParseError> {
    let unsupported = || ParseError::UnsupportedSyntax { line_no, line: trimmed.to_owned() };

    let after_from = after_from.trim_start();
    let (op, line, head) = EDGE_OPERATORS
        .iter()
        .find(|(op, _, _)| after_from.starts_with(op))
        .copied()
        .ok_or_else(unsupported)?;
    let mut rest = after_from[op.len()..].trim_start();

    let mut value = None;
    if let Some(after_bar) = rest.strip_prefix('|') {
        let (label, after_label) = take_label(after_bar, '|').ok_or_else(|| {
            ParseError::UnterminatedLabel { line_no, line: trimmed.to_owned() }
        })?;
        if label.trim().is_empty() {
            return Err(ParseError::EmptyEdgeLabel { line_no, line: trimmed.to_owned() });
        }
        value = Some(label);
        rest = after_label.trim_start();
    }

    let (to_name, rest) = split_ident(rest);
    if to_name.is_empty() {
        return Err(unsupported());
    }

    let mut style = EdgeStyle { line, head, ..EdgeStyle::default() };
    let rest = rest.trim();
    if !rest.is_empty() {
        let inner = rest
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .ok_or_else(unsupported)?;
        parse_attributes(inner, &mut style, line_no)?;
    }

    let from = parse_node_id(from_name, line_no)?;
    let to = parse_node_id(to_name, line_no)?;
    for endpoint in [&from, &to] {
        if !nodes.iter().any(|node| node.id() == endpoint) {
            return Err(ParseError::UnknownNode { line_no, node_id: endpoint.clone() });
        }
    }

    Ok(Edge::new_with(from, to, value, style))
}

/// Parses the markup form.
///
/// ```text
/// diagram
/// %% comment
/// a @ 0,0 [A]
/// b @ 1,0
/// a -->|f| b {bend=30, swap}
/// ```
///
/// Nodes are declared with `<id> @ <x>,<y>` and an optional `[<label>]`. Edges may only refer to
/// nodes declared on an earlier line. Labels use `\` to escape `]`, `|`, `\` and newlines.
pub fn decode_markup(input: &str) -> Result<Diagram, ParseError> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut saw_header = false;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("%%") {
            continue;
        }

        if !saw_header {
            if trimmed != HEADER {
                return Err(ParseError::MissingHeader);
            }
            saw_header = true;
            continue;
        }

        let (name, after_name) = split_ident(trimmed);
        if name.is_empty() {
            return Err(ParseError::UnsupportedSyntax { line_no, line: trimmed.to_owned() });
        }

        if let Some(after_at) = after_name.trim_start().strip_prefix('@') {
            let node = parse_node_line(trimmed, name, after_at, line_no)?;
            if nodes.iter().any(|existing| existing.id() == node.id()) {
                return Err(ParseError::DuplicateNode { line_no, node_id: node.id().clone() });
            }
            nodes.push(node);
        } else {
            edges.push(parse_edge_line(trimmed, name, after_name, &nodes, line_no)?);
        }
    }

    if !saw_header {
        return Err(ParseError::MissingHeader);
    }

    Ok(Diagram::from_parts(nodes, edges))
}

fn edge_operator(style: &EdgeStyle) -> &'static str {
    EDGE_OPERATORS
        .iter()
        .find(|(_, line, head)| *line == style.line && *head == style.head)
        .map(|(op, _, _)| *op)
        .unwrap_or("-->")
}

/// Renders the canonical markup form: header, nodes in order, then edges in order. Attributes
/// at their default value are omitted.
pub fn encode_markup(diagram: &Diagram) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    for node in diagram.nodes() {
        let Position { x, y } = node.position();
        let _ = write!(out, "{} @ {x},{y}", node.id());
        if !node.value().is_empty() {
            out.push_str(" [");
            escape_label(node.value(), &mut out);
            out.push(']');
        }
        out.push('\n');
    }

    for edge in diagram.edges() {
        let style = edge.style();
        let _ = write!(out, "{} {}", edge.from(), edge_operator(style));
        if let Some(value) = edge.value() {
            out.push('|');
            escape_label(value, &mut out);
            out.push('|');
        }
        let _ = write!(out, " {}", edge.to());

        let mut attributes = Vec::new();
        if style.bend != 0 {
            attributes.push(format!("bend={}", style.bend));
        }
        if style.shift != 0 {
            attributes.push(format!("shift={}", style.shift));
        }
        match style.label_position {
            LabelPosition::Left => {}
            LabelPosition::Right => attributes.push("swap".to_owned()),
            LabelPosition::Inside => attributes.push("inside".to_owned()),
        }
        if !attributes.is_empty() {
            let _ = write!(out, " {{{}}}", attributes.join(", "));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decode_markup, encode_markup, ParseError};
    use crate::model::fixtures::commutative_square;
    use crate::model::{
        ArrowHead, Diagram, Edge, EdgeStyle, LabelPosition, LineKind, Node, NodeId, Position,
    };

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn parses_nodes_and_edges() {
        let input = r#"
            diagram
            %% the corners
            a @ 0,0 [A]
            b @ 2,-1
            a -->|f| b {bend=30, swap}
        "#;

        let diagram = decode_markup(input).expect("parse");

        assert_eq!(
            diagram.nodes(),
            &[
                Node::new(nid("a"), "A", Position::new(0, 0)),
                Node::new(nid("b"), "", Position::new(2, -1)),
            ]
        );
        assert_eq!(
            diagram.edges(),
            &[Edge::new_with(
                nid("a"),
                nid("b"),
                Some("f".to_owned()),
                EdgeStyle { bend: 30, label_position: LabelPosition::Right, ..EdgeStyle::default() },
            )]
        );
    }

    #[rstest]
    #[case("-->", LineKind::Solid, ArrowHead::Arrow)]
    #[case("---", LineKind::Solid, ArrowHead::None)]
    #[case("-.->", LineKind::Dashed, ArrowHead::Arrow)]
    #[case("-.-", LineKind::Dashed, ArrowHead::None)]
    #[case("..>", LineKind::Dotted, ArrowHead::Arrow)]
    #[case("...", LineKind::Dotted, ArrowHead::None)]
    #[case("==>", LineKind::Double, ArrowHead::Arrow)]
    #[case("===", LineKind::Double, ArrowHead::None)]
    fn edge_operators_select_line_and_head(
        #[case] op: &str,
        #[case] line: LineKind,
        #[case] head: ArrowHead,
    ) {
        let input = format!("diagram\na @ 0,0\nb @ 1,0\na {op} b\n");
        let diagram = decode_markup(&input).expect("parse");
        let style = diagram.edges()[0].style();
        assert_eq!((style.line, style.head), (line, head));
    }

    #[test]
    fn export_is_canonical_and_parses_back() {
        let diagram = commutative_square();
        let out = encode_markup(&diagram);

        assert_eq!(
            out,
            "diagram\na @ 0,0 [A]\nb @ 1,0 [B]\nc @ 0,1 [C]\nd @ 1,1 [D]\na -->|f| b\nb -->|g| d\na -->|h| c\nc -->|k| d {swap}\n"
        );
        assert_eq!(decode_markup(&out).expect("parse"), diagram);
    }

    #[test]
    fn labels_with_delimiters_survive_export() {
        let diagram = Diagram::from_parts(
            vec![
                Node::new(nid("a"), "F[x]", Position::new(0, 0)),
                Node::new(nid("b"), "line\\break\nhere", Position::new(1, 0)),
            ],
            vec![Edge::new_with(nid("a"), nid("b"), Some("a|b".to_owned()), EdgeStyle::default())],
        );

        let out = encode_markup(&diagram);
        assert_eq!(decode_markup(&out).expect("parse"), diagram);
    }

    #[test]
    fn empty_diagram_is_just_the_header() {
        assert_eq!(encode_markup(&Diagram::default()), "diagram\n");
        assert_eq!(decode_markup("diagram").expect("parse"), Diagram::default());
    }

    #[rstest]
    #[case::no_header("a @ 0,0\n")]
    #[case::empty_input("")]
    #[case::wrong_header("flowchart\n")]
    fn rejects_missing_header(#[case] input: &str) {
        assert_eq!(decode_markup(input), Err(ParseError::MissingHeader));
    }

    #[test]
    fn rejects_edges_to_undeclared_nodes() {
        let err = decode_markup("diagram\na @ 0,0\na --> b\n").expect_err("undeclared");
        assert_eq!(err, ParseError::UnknownNode { line_no: 3, node_id: nid("b") });
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn rejects_duplicate_nodes() {
        let err = decode_markup("diagram\na @ 0,0\na @ 1,1\n").expect_err("duplicate");
        assert_eq!(err, ParseError::DuplicateNode { line_no: 3, node_id: nid("a") });
    }

    #[rstest]
    #[case::bad_position("diagram\na @ 0;0\n")]
    #[case::unterminated_label("diagram\na @ 0,0 [A\n")]
    #[case::empty_edge_label("diagram\na @ 0,0\nb @ 1,0\na -->| | b\n")]
    #[case::unknown_attribute("diagram\na @ 0,0\nb @ 1,0\na --> b {loop}\n")]
    #[case::unknown_operator("diagram\na @ 0,0\nb @ 1,0\na ~> b\n")]
    #[case::trailing_garbage("diagram\na @ 0,0\nb @ 1,0\na --> b c\n")]
    fn rejects_malformed_lines(#[case] input: &str) {
        assert!(decode_markup(input).is_err());
    }
}

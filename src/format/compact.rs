// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::model::{Diagram, DiagramError};

#[derive(Debug)]
pub enum DecodeError {
    Empty,
    Base64 { source: base64::DecodeError },
    Json { source: serde_json::Error },
    Invalid { source: DiagramError },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("diagram link is empty"),
            Self::Base64 { source } => write!(f, "diagram link is not valid base64url: {source}"),
            Self::Json { source } => write!(f, "diagram link has an unexpected shape: {source}"),
            Self::Invalid { source } => write!(f, "diagram link is inconsistent: {source}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Base64 { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::Invalid { source } => Some(source),
        }
    }
}

/// Encodes a diagram as unpadded base64url JSON, safe to place after `#` in a URL.
pub fn encode_compact(diagram: &Diagram) -> String {
    let json = serde_json::to_vec(diagram).expect("diagram serialization is infallible");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes the output of [`encode_compact`]. A leading `#` and trailing padding are tolerated.
pub fn decode_compact(input: &str) -> Result<Diagram, DecodeError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed).trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|source| DecodeError::Base64 { source })?;
    let mut diagram: Diagram =
        serde_json::from_slice(&bytes).map_err(|source| DecodeError::Json { source })?;
    diagram.canonicalize();
    diagram.validate().map_err(|source| DecodeError::Invalid { source })?;

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use rstest::rstest;

    use super::{decode_compact, encode_compact, DecodeError};
    use crate::format::{decode_markup, encode_markup};
    use crate::model::fixtures::commutative_square;
    use crate::model::Diagram;

    #[test]
    fn compact_form_is_fragment_safe_and_restores_the_diagram() {
        let diagram = commutative_square();
        let encoded = encode_compact(&diagram);

        assert!(encoded
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
        assert_eq!(decode_compact(&format!("#{encoded}")).expect("decode"), diagram);
    }

    #[test]
    fn empty_diagram_encodes_without_default_fields() {
        let encoded = encode_compact(&Diagram::default());
        let json = URL_SAFE_NO_PAD.decode(encoded).expect("base64");
        assert_eq!(json, br#"{"nodes":[],"edges":[]}"#);
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_hash("#")]
    fn rejects_empty_input(#[case] input: &str) {
        assert!(matches!(decode_compact(input), Err(DecodeError::Empty)));
    }

    #[test]
    fn rejects_non_base64() {
        assert!(matches!(decode_compact("not base64!"), Err(DecodeError::Base64 { .. })));
    }

    #[test]
    fn rejects_json_of_the_wrong_shape() {
        let encoded = URL_SAFE_NO_PAD.encode(br#"{"nodes":42}"#);
        assert!(matches!(decode_compact(&encoded), Err(DecodeError::Json { .. })));
    }

    #[test]
    fn rejects_edges_to_missing_nodes() {
        let encoded = URL_SAFE_NO_PAD.encode(br#"{"nodes":[{"id":"a"}],"edges":[{"from":"a","to":"b"}]}"#);
        assert!(matches!(decode_compact(&encoded), Err(DecodeError::Invalid { .. })));
    }

    #[rstest]
    #[case::empty(r#""""#)]
    #[case::spaces(r#""  ""#)]
    fn blank_edge_labels_decode_as_unlabeled(#[case] value: &str) {
        let json = format!(
            r#"{{"nodes":[{{"id":"a"}},{{"id":"b"}}],"edges":[{{"from":"a","to":"b","value":{value}}}]}}"#
        );
        let diagram = decode_compact(&URL_SAFE_NO_PAD.encode(json)).expect("decode");
        assert_eq!(diagram.edges()[0].value(), None);

        let markup = encode_markup(&diagram);
        assert_eq!(markup, "diagram\na @ 0,0\nb @ 0,0\na --> b\n");
        assert_eq!(decode_markup(&markup).expect("markup parses back"), diagram);
    }
}

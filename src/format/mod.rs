// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram serialization.
//!
//! Two forms are supported: a compact URL-fragment-safe string used for permalinks and a
//! line-oriented markup form that users edit by hand.

pub mod compact;
pub mod markup;

pub use compact::{decode_compact, encode_compact, DecodeError};
pub use markup::{decode_markup, encode_markup, ParseError};

use crate::model::Diagram;

/// Conversion between a [`Diagram`] and its two textual forms.
///
/// The session controller only talks to serialization through this trait; [`Codec`] is the
/// implementation the application ships with.
pub trait Gateway {
    fn encode_compact(&self, diagram: &Diagram) -> String;
    fn decode_compact(&self, input: &str) -> Result<Diagram, DecodeError>;
    fn encode_markup(&self, diagram: &Diagram) -> String;
    fn decode_markup(&self, input: &str) -> Result<Diagram, ParseError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec;

impl Gateway for Codec {
    fn encode_compact(&self, diagram: &Diagram) -> String {
        encode_compact(diagram)
    }

    fn decode_compact(&self, input: &str) -> Result<Diagram, DecodeError> {
        decode_compact(input)
    }

    fn encode_markup(&self, diagram: &Diagram) -> String {
        encode_markup(diagram)
    }

    fn decode_markup(&self, input: &str) -> Result<Diagram, ParseError> {
        decode_markup(input)
    }
}

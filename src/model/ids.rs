// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a node within a single diagram.
///
/// Ids double as the node names of the markup form, so they are restricted to ASCII
/// alphanumerics and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_node_ident(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for NodeId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    InvalidChar { ch: char },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("node id must not be empty"),
            Self::InvalidChar { ch } => {
                write!(f, "node id contains invalid character: '{ch}'")
            }
        }
    }
}

impl std::error::Error for IdError {}

fn validate_node_ident(ident: &str) -> Result<(), IdError> {
    if ident.is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(ch) = ident.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(IdError::InvalidChar { ch });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{IdError, NodeId};

    #[test]
    fn node_id_rejects_empty() {
        assert_eq!(NodeId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn node_id_rejects_whitespace_and_punctuation() {
        assert_eq!(NodeId::new("a b"), Err(IdError::InvalidChar { ch: ' ' }));
        assert_eq!(NodeId::new("a/b"), Err(IdError::InvalidChar { ch: '/' }));
    }
}

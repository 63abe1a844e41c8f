// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
        }
    }
}

impl std::error::Error for ParseError {}

fn parse_id(name: &'static str, input: &str) -> Result<String, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty(name));
    }
    if input.trim() != input {
        return Err(ParseError::Trimmed(name));
    }
    if input.len() > ID_MAX_LEN {
        return Err(ParseError::TooLong(name, ID_MAX_LEN));
    }
    Ok(input.to_string())
}

/// Opaque, source-defined entity identifier, unique within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct EntityId(String);

impl EntityId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_id("entity_id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_id("user_id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct NeighborhoodId(String);

impl NeighborhoodId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_id("neighborhood_id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_padded_ids() {
        assert_eq!(EntityId::parse(""), Err(ParseError::Empty("entity_id")));
        assert_eq!(UserId::parse(" u1"), Err(ParseError::Trimmed("user_id")));
        assert_eq!(
            NeighborhoodId::parse(&"n".repeat(ID_MAX_LEN + 1)),
            Err(ParseError::TooLong("neighborhood_id", ID_MAX_LEN))
        );
    }

    #[test]
    fn accepts_plain_ids() {
        let id = EntityId::parse("listing-42").expect("valid id");
        assert_eq!(id.as_str(), "listing-42");
    }
}

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a catalog character, e.g. `hiragana-ka`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    /// Creates a new `CharacterId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharacterId({})", self.0)
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CharacterId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Error type for parsing an id from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for CharacterId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "CharacterId".to_string(),
            });
        }
        Ok(Self::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_display() {
        let id = CharacterId::new("hiragana-ka");
        assert_eq!(id.to_string(), "hiragana-ka");
    }

    #[test]
    fn test_character_id_from_str_trims() {
        let id: CharacterId = "  katakana-n ".parse().unwrap();
        assert_eq!(id, CharacterId::new("katakana-n"));
    }

    #[test]
    fn test_character_id_from_str_rejects_blank() {
        assert!("   ".parse::<CharacterId>().is_err());
    }

    #[test]
    fn test_character_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&CharacterId::new("hiragana-a")).unwrap();
        assert_eq!(json, "\"hiragana-a\"");
    }
}

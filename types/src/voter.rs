//! Voter identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LockvoteError;

/// The account that owns a set of locking positions.
///
/// Opaque to lockvote beyond being a non-empty, whitespace-free string; the
/// wallet collaborator is responsible for its format.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterId(String);

impl VoterId {
    pub fn new(raw: impl Into<String>) -> Result<Self, LockvoteError> {
        let s = raw.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(LockvoteError::InvalidVoterId(s));
        }
        Ok(Self(s))
    }

    /// Return the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VoterId {
    type Error = LockvoteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VoterId> for String {
    fn from(id: VoterId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(VoterId::new("").is_err());
        assert!(VoterId::new("alice near").is_err());
        assert_eq!(VoterId::new("alice.near").unwrap().as_str(), "alice.near");
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<VoterId>("\"\"").is_err());
        let id: VoterId = serde_json::from_str("\"bob.near\"").unwrap();
        assert_eq!(id.to_string(), "bob.near");
    }
}

//! Domain identifier types with validation
//!
//! Newtype wrappers keep venue identifiers and exhibition document identities
//! from being mixed up with each other or with free-form strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Museum (venue) identifier newtype wrapper
///
/// The stable ID a venue has in the registry. Every exhibition document
/// carries the ID of the venue it belongs to.
///
/// # Examples
///
/// ```
/// use curator::domain::ids::MuseumId;
/// use std::str::FromStr;
///
/// let id = MuseumId::from_str("tokyo-national-museum").unwrap();
/// assert_eq!(id.as_str(), "tokyo-national-museum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MuseumId(String);

impl MuseumId {
    /// Creates a new MuseumId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(MuseumId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Museum ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the museum ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MuseumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MuseumId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for MuseumId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Exhibition document identity
///
/// The key an exhibition document is stored and deduplicated under. New
/// identities are produced by [`crate::core::identity::derive_id`]; `new` exists
/// for keys read back from a store.
///
/// # Examples
///
/// ```
/// use curator::domain::ids::{ExhibitionId, MuseumId};
/// use curator::core::identity::derive_id;
///
/// let museum_id = MuseumId::new("mori-art-museum").unwrap();
/// let id: ExhibitionId = derive_id(&museum_id, "Chim↑Pom");
/// assert_eq!(id.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExhibitionId(String);

impl ExhibitionId {
    /// Creates an ExhibitionId from an existing key
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Exhibition ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Wraps a freshly derived digest. Callers guarantee it is non-empty.
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    /// Returns the exhibition ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExhibitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExhibitionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExhibitionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_museum_id_creation() {
        let id = MuseumId::new("national-art-center").unwrap();
        assert_eq!(id.as_str(), "national-art-center");
    }

    #[test]
    fn test_museum_id_empty_fails() {
        assert!(MuseumId::new("").is_err());
        assert!(MuseumId::new("   ").is_err());
    }

    #[test]
    fn test_museum_id_display() {
        let id = MuseumId::new("m-1").unwrap();
        assert_eq!(format!("{}", id), "m-1");
    }

    #[test]
    fn test_exhibition_id_empty_fails() {
        assert!(ExhibitionId::new("").is_err());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = MuseumId::new("m-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"m-1\"");

        let parsed: ExhibitionId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed.as_str(), "abc123");
    }
}

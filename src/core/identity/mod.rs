//! Document identity derivation
//!
//! An exhibition's identity is a content address over its venue ID and its
//! normalized title, so the same exhibition scraped twice lands on the same
//! document.

pub mod normalize;

pub use normalize::normalize_title;

use crate::domain::ids::{ExhibitionId, MuseumId};
use sha2::{Digest, Sha256};

/// Separates the museum ID from the title in the hashed input
const FIELD_SEPARATOR: char = '\u{1F}';

/// Derives the document identity for an exhibition
///
/// Returns the lowercase hex SHA-256 of `museum_id`, a unit separator and the
/// normalized title. The result is stable across runs and processes.
///
/// # Examples
///
/// ```
/// use curator::core::identity::derive_id;
/// use curator::domain::MuseumId;
///
/// let museum_id = MuseumId::new("tnm").unwrap();
/// let a = derive_id(&museum_id, "Treasures of Japan");
/// let b = derive_id(&museum_id, "  TREASURES   of japan ");
/// assert_eq!(a, b);
/// ```
pub fn derive_id(museum_id: &MuseumId, title: &str) -> ExhibitionId {
    let mut hasher = Sha256::new();
    hasher.update(museum_id.as_str().as_bytes());
    let mut separator = [0u8; 4];
    hasher.update(FIELD_SEPARATOR.encode_utf8(&mut separator).as_bytes());
    hasher.update(normalize_title(title).as_bytes());
    let result = hasher.finalize();

    ExhibitionId::from_digest(format!("{result:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn museum(id: &str) -> MuseumId {
        MuseumId::new(id).unwrap()
    }

    #[test]
    fn test_derive_id_is_deterministic() {
        let first = derive_id(&museum("tnm"), "Hokusai");
        let second = derive_id(&museum("tnm"), "Hokusai");
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
        assert!(first
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_derive_id_known_digest() {
        // sha256("m\x1fa")
        let id = derive_id(&museum("m"), "A");
        let mut hasher = Sha256::new();
        hasher.update(b"m\x1fa");
        assert_eq!(id.as_str(), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn test_derive_id_differs_by_museum() {
        assert_ne!(
            derive_id(&museum("tnm"), "Hokusai"),
            derive_id(&museum("mot"), "Hokusai")
        );
    }

    #[test]
    fn test_derive_id_separator_prevents_ambiguity() {
        assert_ne!(
            derive_id(&museum("ab"), "c"),
            derive_id(&museum("a"), "bc")
        );
    }

    #[test]
    fn test_derive_id_folds_width_and_case() {
        assert_eq!(
            derive_id(&museum("tnm"), "ＡＢＣ展"),
            derive_id(&museum("tnm"), "abc展")
        );
    }
}

//! Title normalization applied before hashing

use unicode_normalization::UnicodeNormalization;

/// Normalizes an exhibition title for identity derivation
///
/// Applies Unicode NFKC (folds full-width and compatibility forms), lowercases,
/// collapses every whitespace run to a single ASCII space and trims. Existing
/// document identities depend on this exact sequence.
pub fn normalize_title(title: &str) -> String {
    let folded: String = title.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Hokusai", "hokusai" ; "lowercase")]
    #[test_case("  Hokusai \t and\n Hiroshige  ", "hokusai and hiroshige" ; "whitespace collapsed")]
    #[test_case("ＭＯＭＡ　Ｃｏｌｌｅｃｔｉｏｎ", "moma collection" ; "full width and ideographic space")]
    #[test_case("ｶﾀｶﾅ", "カタカナ" ; "half width katakana")]
    #[test_case("Chim↑Pom", "chim↑pom" ; "symbols kept")]
    #[test_case("", "" ; "empty")]
    fn test_normalize_title(input: &str, expected: &str) {
        assert_eq!(normalize_title(input), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_title("Ｔｈｅ  Great   WAVE");
        assert_eq!(normalize_title(&once), once);
    }
}

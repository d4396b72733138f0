//! Case-insensitive text comparison shared by routing, parsing and completion.
//!
//! Everything that decides whether typed input matches a label, an option or
//! a grant goes through these helpers, so completion never offers a word that
//! dispatch would reject.

/// Unicode-aware case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Whether `text` starts with `prefix`, ignoring case.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    fold(text).starts_with(&fold(prefix))
}

/// Case-folded form used as a map key or for duplicate detection.
///
/// Folds per character, like [`eq_ignore_case`], so a word-final `Σ` folds
/// to `σ` on both sides.
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_covers_non_ascii_letters() {
        assert!(eq_ignore_case("CAFÉ", "café"));
        assert!(eq_ignore_case("Créatif", "CRÉATIF"));
        assert!(eq_ignore_case("ΣΟΦΙΑ", "σοφια"));
        assert!(!eq_ignore_case("cafe", "café"));
    }

    #[test]
    fn prefix_matches_agree_with_equality() {
        assert!(starts_with_ignore_case("Créatif", "cRÉ"));
        assert!(starts_with_ignore_case("anything", ""));
        assert!(!starts_with_ignore_case("survie", "créa"));
        assert_eq!(fold("Ünïcode"), fold("üNÏCODE"));
        assert!(starts_with_ignore_case("ΣΟΦΙΑΣ", "σοφιασ"));
    }
}

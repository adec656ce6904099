//! SQL LIKE pattern escaping
//!
//! Search terms and tag labels are matched as literal text, so every
//! LIKE metacharacter they contain must be escaped first.

/// Escape SQL LIKE metacharacters (%, _, \) for use with `ESCAPE '\'`
///
/// # Example
///
/// ```
/// use salesboard_server::utils::pattern::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("100% cotton_tee"));
/// assert_eq!(pattern, "%100\\% cotton\\_tee%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_plain_text_unchanged() {
        assert_eq!(escape_like_pattern("Neha Shah"), "Neha Shah");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_like_metacharacters() {
        assert_eq!(escape_like_pattern("50%"), "50\\%");
        assert_eq!(escape_like_pattern("gift_card"), "gift\\_card");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(escape_like_pattern("%_\\"), "\\%\\_\\\\");
    }
}

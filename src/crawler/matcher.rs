//! Case-insensitive term matching

use crate::SeekError;

/// A validated, non-empty search term
///
/// Whitespace inside the term is collapsed the same way extracted body text
/// is, so `"hello   world"` matches a page reading `hello world`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    term: String,
    folded: String,
}

impl SearchTerm {
    /// Validates a raw search term
    ///
    /// Returns `SeekError::InvalidInput` if the term is empty or contains only
    /// whitespace.
    pub fn new(raw: &str) -> Result<Self, SeekError> {
        let term = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if term.is_empty() {
            return Err(SeekError::InvalidInput(
                "search term must not be empty".to_string(),
            ));
        }

        let folded = term.to_lowercase();
        Ok(Self { term, folded })
    }

    pub fn as_str(&self) -> &str {
        &self.term
    }

    /// Counts non-overlapping, case-insensitive occurrences in `text`
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_seek::crawler::SearchTerm;
    ///
    /// let term = SearchTerm::new("rust").unwrap();
    /// assert_eq!(term.count_in("Rust, RUST and rustaceans"), 3);
    /// ```
    pub fn count_in(&self, text: &str) -> usize {
        text.to_lowercase().matches(self.folded.as_str()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(text: &str, term: &str) -> usize {
        SearchTerm::new(term).unwrap().count_in(text)
    }

    #[test]
    fn test_rejects_empty_term() {
        assert!(matches!(
            SearchTerm::new(""),
            Err(SeekError::InvalidInput(_))
        ));
        assert!(matches!(
            SearchTerm::new(" \t\n"),
            Err(SeekError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_case_insensitive() {
        let term = SearchTerm::new("Needle").unwrap();
        assert_eq!(term.count_in("needle NEEDLE nEeDlE"), 3);
    }

    #[test]
    fn test_no_match() {
        let term = SearchTerm::new("needle").unwrap();
        assert_eq!(term.count_in("haystack"), 0);
        assert_eq!(term.count_in(""), 0);
    }

    #[test]
    fn test_non_overlapping() {
        let term = SearchTerm::new("aa").unwrap();
        assert_eq!(term.count_in("aaaa"), 2);
        assert_eq!(term.count_in("aaa"), 1);
    }

    #[test]
    fn test_substring_matches() {
        assert_eq!(count("category catalog", "cat"), 2);
    }

    #[test]
    fn test_term_whitespace_collapsed() {
        let term = SearchTerm::new("  hello   world ").unwrap();
        assert_eq!(term.as_str(), "hello world");
        assert_eq!(term.count_in("Hello World, hello world"), 2);
    }

    #[test]
    fn test_unicode_folding() {
        assert_eq!(count("STRASSE Ärger", "ärger"), 1);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert_eq!(count("a.c abc a.c", "a.c"), 2);
    }

    #[test]
    fn test_deterministic() {
        let term = SearchTerm::new("ab").unwrap();
        let text = "xAbyabzAB";
        assert_eq!(term.count_in(text), term.count_in(text));
        assert_eq!(term.count_in(text), 3);
    }
}

//! Text validation for todos, plus the storage key shared with the adapter.
//!
//! Length is measured on the trimmed text in Unicode scalar values.

pub const MIN_TEXT_LENGTH: usize = 1;
pub const MAX_TEXT_LENGTH: usize = 500;
pub const STORAGE_KEY: &str = "todos";

/// True when `text`, trimmed, is between [`MIN_TEXT_LENGTH`] and
/// [`MAX_TEXT_LENGTH`] characters long.
pub fn is_valid_todo_text(text: &str) -> bool {
    TodoConstraints::default().accepts(text)
}

/// Length bounds for todo text. The default matches the module constants;
/// the maximum can be overridden through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoConstraints {
    pub min_text_length: usize,
    pub max_text_length: usize,
}

impl Default for TodoConstraints {
    fn default() -> Self {
        Self {
            min_text_length: MIN_TEXT_LENGTH,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

impl TodoConstraints {
    pub fn with_max_text_length(max_text_length: usize) -> Self {
        Self {
            max_text_length,
            ..Self::default()
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        let len = text.trim().chars().count();
        len >= self.min_text_length && len <= self.max_text_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(!is_valid_todo_text(""));
        assert!(!is_valid_todo_text("   "));
        assert!(!is_valid_todo_text("\t\n "));
    }

    #[test]
    fn accepts_regular_text() {
        assert!(is_valid_todo_text("Buy milk"));
        assert!(is_valid_todo_text("a"));
    }

    #[test]
    fn max_length_boundary() {
        assert!(is_valid_todo_text(&"a".repeat(500)));
        assert!(!is_valid_todo_text(&"a".repeat(501)));
    }

    #[test]
    fn surrounding_whitespace_is_not_counted() {
        let padded = format!("   {}   ", "a".repeat(500));
        assert!(is_valid_todo_text(&padded));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(is_valid_todo_text(&"é".repeat(500)));
        assert!(!is_valid_todo_text(&"é".repeat(501)));
    }

    #[test]
    fn custom_maximum() {
        let constraints = TodoConstraints::with_max_text_length(5);
        assert!(constraints.accepts("12345"));
        assert!(!constraints.accepts("123456"));
        assert!(!constraints.accepts(" "));
    }

    proptest! {
        #[test]
        fn valid_iff_trimmed_length_in_range(s in "\\PC{0,600}") {
            let len = s.trim().chars().count();
            prop_assert_eq!(is_valid_todo_text(&s), (1..=500).contains(&len));
        }

        #[test]
        fn whitespace_only_is_never_valid(s in "[ \\t\\n\\r]{0,40}") {
            prop_assert!(!is_valid_todo_text(&s));
        }
    }
}

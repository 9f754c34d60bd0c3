//! Regex tokenization of text cells.

use crate::error::TextOpError;
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    lowercase: bool,
}

impl Tokenizer {
    pub fn new(pattern: &str, lowercase: bool) -> Result<Self, TextOpError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| TextOpError::invalid_hyperparameter(format!("token pattern: {e}")))?;
        Ok(Self { pattern, lowercase })
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let owned;
        let text = if self.lowercase {
            owned = text.to_lowercase();
            owned.as_str()
        } else {
            text
        };
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Text of a cell: strings as-is, null as empty, anything else as JSON text.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whitespace-separated word count, used for text column detection.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tok = Tokenizer::new(r"\w+", true).unwrap();
        assert_eq!(tok.tokenize("Hello, World! it's"), vec!["hello", "world", "it", "s"]);
    }

    #[test]
    fn test_tokenize_keeps_case() {
        let tok = Tokenizer::new(r"[A-Za-z]+", false).unwrap();
        assert_eq!(tok.tokenize("Rust 2024 Edition"), vec!["Rust", "Edition"]);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("abc")), "abc");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!(12)), "12");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\tthree\n"), 3);
        assert_eq!(word_count(""), 0);
    }
}

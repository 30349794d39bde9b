//! Core types for the vocabulary drill tool.

use serde::{Deserialize, Serialize};

/// A vocabulary entry. Identity is the `en` field, compared
/// case-insensitively; entries are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub ja: String,
    pub en: String,
}

impl Word {
    pub fn new(ja: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ja: ja.into(),
            en: en.into(),
        }
    }

    /// "en - ja" display form used by search results.
    pub fn display(&self) -> String {
        format!("{} - {}", self.en, self.ja)
    }
}

/// Identity key for a word: the lowercased `en` field.
pub fn word_key(en: &str) -> String {
    en.to_lowercase()
}

/// Quiz direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    EnToJa,
    JaToEn,
}

/// Kind of a produced output line; the presentation layer maps these
/// to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    System,
    Prompt,
    User,
    Error,
    Info,
    Success,
    Header,
    Question,
}

/// One line of output produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(LineKind::System, text)
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(LineKind::Prompt, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(LineKind::User, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self::new(LineKind::Header, text)
    }

    pub fn question(text: impl Into<String>) -> Self {
        Self::new(LineKind::Question, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_key_is_case_insensitive() {
        assert_eq!(word_key("Eat"), word_key("eat"));
        assert_eq!(word_key("EAT"), "eat");
    }

    #[test]
    fn word_display_format() {
        let w = Word::new("食べる", "eat");
        assert_eq!(w.display(), "eat - 食べる");
    }
}

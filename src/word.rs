use std::fmt;

/// A single practice word. Never empty and never surrounded by whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    /// Trims `raw` and returns `None` if nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in code points, which is what the diff aligns on.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded, non-empty word list together with the language it is spoken in.
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    words: Vec<Word>,
    language: String,
}

impl WordList {
    /// Returns `None` for an empty list; a session never starts without words.
    pub fn new(words: Vec<Word>, language: impl Into<String>) -> Option<Self> {
        if words.is_empty() {
            return None;
        }
        Some(Self {
            words,
            language: language.into(),
        })
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Word>, String) {
        (self.words, self.language)
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ARTICLE, LEMMA, POS};

/// A token and its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    surface: String,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

impl Word {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Create a new word with a part-of-speech annotation.
    pub fn with_pos(surface: impl Into<String>, pos: impl Into<String>) -> Self {
        let mut w = Self::new(surface);
        w.set_annotation(POS, pos);
        w
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }

    pub fn pos(&self) -> Option<&str> {
        self.annotation(POS)
    }

    pub fn lemma(&self) -> Option<&str> {
        self.annotation(LEMMA)
    }
}

/// An ordered sequence of [Word]s, with sentence-level annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sentence {
    #[serde(default)]
    annotations: BTreeMap<String, String>,
    words: Vec<Word>,
}

impl Sentence {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            annotations: BTreeMap::new(),
            words,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }

    /// Title of the article the sentence comes from.
    pub fn article(&self) -> Option<&str> {
        self.annotation(ARTICLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_annotations() {
        let mut w = Word::with_pos("Dogs", "NOUN");
        assert_eq!(w.pos(), Some("NOUN"));
        assert_eq!(w.lemma(), None);

        w.set_annotation(LEMMA, "dog");
        assert_eq!(w.lemma(), Some("dog"));
        assert_eq!(w.surface(), "Dogs");
    }

    #[test]
    fn serialized_form() {
        let mut s = Sentence::new(vec![Word::with_pos("Hi", "X")]);
        s.set_annotation(ARTICLE, "Greetings");

        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"annotations":{"art":"Greetings"},"words":[{"surface":"Hi","annotations":{"pos":"X"}}]}"#
        );
        assert_eq!(s.article(), Some("Greetings"));
    }
}

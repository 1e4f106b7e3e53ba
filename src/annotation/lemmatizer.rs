//! Lemmatizer trait and lowercasing baseline.
use super::{Word, LEMMA};

/// Annotates tagged words with a lemma ([LEMMA]), in place.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, words: &mut [Word]);
}

/// Baseline lemmatizer: the lemma is the lowercased surface form.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn lemmatize(&self, words: &mut [Word]) {
        for word in words {
            let lemma = word.surface().to_lowercase();
            word.set_annotation(LEMMA, lemma);
        }
    }
}

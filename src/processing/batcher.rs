/*! Sentence batching.

Sentences longer than a threshold (in words) are cut into consecutive runs of `threshold` words,
the last run holding the remainder. Word order is always kept, nothing is dropped.

Every unit is lemmatized and stamped with the title of its article ([crate::annotation::ARTICLE]).
!*/
use itertools::Itertools;

use crate::annotation::{Lemmatizer, Sentence, Word, ARTICLE};
use crate::error::Error;

/// Default maximum number of words of a sentence unit.
pub const SENTENCE_THRESHOLD: usize = 150;

#[derive(Debug, Clone, Copy)]
pub struct SentenceBatcher {
    threshold: usize,
}

impl Default for SentenceBatcher {
    fn default() -> Self {
        Self {
            threshold: SENTENCE_THRESHOLD,
        }
    }
}

impl SentenceBatcher {
    /// Create a batcher emitting units of at most `threshold` words.
    pub fn new(threshold: usize) -> Result<Self, Error> {
        if threshold == 0 {
            return Err(Error::Config(
                "sentence threshold must be at least 1".to_string(),
            ));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Split a sentence into runs of at most `threshold` words.
    ///
    /// Sentences that fit (empty ones included) are returned as a single run.
    pub fn split(&self, words: Vec<Word>) -> Vec<Vec<Word>> {
        if words.len() <= self.threshold {
            return vec![words];
        }

        let chunks = words.into_iter().chunks(self.threshold);
        let runs: Vec<Vec<Word>> = chunks.into_iter().map(|run| run.collect()).collect();
        runs
    }

    /// Build the batch of an article.
    ///
    /// `sentences` are the tagged sentences of the article, in text order.
    pub fn batch(
        &self,
        title: &str,
        sentences: Vec<Vec<Word>>,
        lemmatizer: &dyn Lemmatizer,
    ) -> Vec<Sentence> {
        let mut batch = Vec::with_capacity(sentences.len());
        for words in sentences {
            for run in self.split(words) {
                let mut unit = Sentence::new(run);
                lemmatizer.lemmatize(unit.words_mut());
                unit.set_annotation(ARTICLE, title);
                batch.push(unit);
            }
        }

        batch
    }
}

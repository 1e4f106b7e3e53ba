//! Tagger trait and segmentation-based baseline.
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

use super::Word;

/// Tokenization, sentence splitting and part-of-speech tagging.
///
/// Given raw text, returns the ordered sentences of the text,
/// each one being an ordered sequence of words annotated with [super::POS].
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<Vec<Word>>, Error>;
}

/// Baseline tagger using Unicode sentence and word boundaries.
///
/// Part-of-speech tags are coarse: `PUNCT`, `NUM`, `PROPN` (capitalized, not sentence-initial) and `X`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SegmentTagger;

impl SegmentTagger {
    fn coarse_tag(token: &str, sentence_initial: bool) -> &'static str {
        if token.chars().all(|c| !c.is_alphanumeric()) {
            "PUNCT"
        } else if token.chars().any(|c| c.is_numeric()) && !token.chars().any(char::is_alphabetic)
        {
            "NUM"
        } else if !sentence_initial && token.chars().next().map_or(false, char::is_uppercase) {
            "PROPN"
        } else {
            "X"
        }
    }
}

impl Tagger for SegmentTagger {
    fn tag(&self, text: &str) -> Result<Vec<Vec<Word>>, Error> {
        let sentences = text
            .unicode_sentences()
            .map(|sentence| {
                sentence
                    .split_word_bounds()
                    .filter(|token| !token.trim().is_empty())
                    .enumerate()
                    .map(|(idx, token)| Word::with_pos(token, Self::coarse_tag(token, idx == 0)))
                    .collect::<Vec<Word>>()
            })
            .filter(|words| !words.is_empty())
            .collect();

        Ok(sentences)
    }
}

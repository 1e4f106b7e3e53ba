/*! Linguistic annotation.

Words and sentences carry free-form string annotations, filled in incrementally:
part-of-speech by a [Tagger], lemma by a [Lemmatizer], senses by a disambiguator.

Taggers and lemmatizers are external collaborators, consumed through the [Tagger] and [Lemmatizer] traits.
Simple baselines ([SegmentTagger], [LowercaseLemmatizer]) are provided.
!*/
mod lemmatizer;
mod tagger;
mod types;

pub use lemmatizer::{Lemmatizer, LowercaseLemmatizer};
pub use tagger::{SegmentTagger, Tagger};
pub use types::{Sentence, Word};

/// Part-of-speech annotation key.
pub const POS: &str = "pos";
/// Lemma annotation key.
pub const LEMMA: &str = "lemma";
/// Sentence annotation holding the title of the source article.
pub const ARTICLE: &str = "art";
/// Sense annotation key, set by disambiguators.
pub const SENSE: &str = "wn30_key";

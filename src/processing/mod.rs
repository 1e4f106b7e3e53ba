/*! Content processing

Turns annotated article text into batches of bounded-length sentence units.
!*/
mod batcher;

pub use batcher::{SentenceBatcher, SENTENCE_THRESHOLD};

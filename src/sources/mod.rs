//! Article sources.
//!
//! Wraps the decoding of compressed article archives into [Iterator]s of articles.
pub mod wikipedia;

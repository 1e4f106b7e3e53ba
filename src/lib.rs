//! # corpus-wsd
//!
//! Word sense disambiguation of Wikipedia extraction dumps.
//!
//! Archives produced by Wikipedia extractors are read article by article, tagged,
//! split into bounded sentences, lemmatized and sent to a disambiguator.
//! Results are written as JSON lines in an output tree mirroring the input one.
//!
//! This crate can be used as a tool (see the `corpus-wsd` binary), or as a lib
//! to plug other taggers, lemmatizers or disambiguators into the pipeline.
pub mod annotation;
pub mod config;
pub mod disambiguation;
pub mod error;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod sources;

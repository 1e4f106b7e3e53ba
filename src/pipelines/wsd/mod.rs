//! Word sense disambiguation pipeline.
//!
//! Takes a tree of Wikipedia extraction archives and produces, for each archive,
//! a mirrored file of annotated sentences.
//!
//! # Processing
//! 1. Archives are listed recursively under the input folder and sorted.
//! 1. They are distributed among a fixed number of workers, either through a shared queue
//!    or as contiguous chunks (see [crate::config::Scheduling]).
//! 1. Each worker reads articles, tags them, splits long sentences, lemmatizes, disambiguates
//!    and writes the results in its current archive's output.
//! 1. The pipeline waits for every worker (or the configured timeout) and returns the number of processed articles.
mod dispatcher;
mod progress;
mod worker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;
use log::info;

use crate::annotation::{Lemmatizer, LowercaseLemmatizer, SegmentTagger, Tagger};
use crate::config::Config;
use crate::disambiguation::{DisambiguatorFactory, JsonLines, ProcessCommand};
use crate::error::Error;

pub use dispatcher::WsdPipeline;
pub use progress::Progress;
pub use worker::{Worker, WorkerOptions, WorkerReport};

/// Linguistic tools shared by all workers.
///
/// Taggers and lemmatizers are shared, disambiguators are created once per worker.
#[derive(Clone)]
pub struct Collaborators {
    pub tagger: Arc<dyn Tagger>,
    pub lemmatizer: Arc<dyn Lemmatizer>,
    pub disambiguators: Arc<dyn DisambiguatorFactory>,
}

impl Collaborators {
    /// Baseline tagger and lemmatizer, with an external disambiguator if one is configured.
    pub fn from_config(config: &Config) -> Self {
        let disambiguators: Arc<dyn DisambiguatorFactory> = match ProcessCommand::from_config(config) {
            Some(command) => Arc::new(command),
            None => {
                info!("No disambiguator configured, writing tagged sentences only");
                Arc::new(JsonLines)
            }
        };

        Self {
            tagger: Arc::new(SegmentTagger),
            lemmatizer: Arc::new(LowercaseLemmatizer),
            disambiguators,
        }
    }
}

/// List every file under `root`, recursively, in path order.
pub fn list_archives(root: &Path) -> Result<Vec<PathBuf>, Error> {
    if !root.is_dir() {
        return Err(Error::Config(format!("{:?} is not a directory", root)));
    }

    let pattern = format!("{}/**/*", Pattern::escape(&root.to_string_lossy()));
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Split `items` into `parts` contiguous chunks.
///
/// Every chunk holds `items.len() / parts` items, except the last one that also gets the remainder.
pub fn partition<T>(items: Vec<T>, parts: usize) -> Vec<Vec<T>> {
    let parts = parts.max(1);
    let size = items.len() / parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut items = items.into_iter();
    for _ in 0..parts - 1 {
        chunks.push(items.by_ref().take(size).collect());
    }
    chunks.push(items.collect());

    chunks
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn partition_remainder_in_last() {
        let chunks = partition((0..10).collect(), 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 4]);
        assert_eq!(chunks[2], vec![6, 7, 8, 9]);
    }

    #[test]
    fn partition_fewer_items_than_parts() {
        let chunks = partition(vec!["a", "b"], 3);
        assert_eq!(chunks, vec![vec![], vec![], vec!["a", "b"]]);
    }

    #[test]
    fn partition_is_lossless() {
        for total in 0..30 {
            for parts in 1..8 {
                let chunks = partition((0..total).collect::<Vec<_>>(), parts);
                assert_eq!(chunks.len(), parts);
                let flat: Vec<_> = chunks.into_iter().flatten().collect();
                assert_eq!(flat, (0..total).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn lists_files_recursively() {
        let dir = tempdir().unwrap();
        for p in ["AB/wiki_01.bz2", "AA/wiki_01.bz2", "AA/wiki_00.bz2"] {
            let path = dir.path().join(p);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"").unwrap();
        }

        let paths = list_archives(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("AA/wiki_00.bz2"),
                PathBuf::from("AA/wiki_01.bz2"),
                PathBuf::from("AB/wiki_01.bz2"),
            ]
        );

        assert!(list_archives(&dir.path().join("missing")).is_err());
    }
}

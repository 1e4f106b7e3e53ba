/*! Worker control loop.

A worker processes archives one after the other. For each archive it:
1. skips it if its extension is not the expected one,
1. opens an [OutputSink] mirroring the archive path (unless writing is disabled),
1. reads articles one by one, tags, batches and disambiguates them, writing each batch to the sink,
1. closes the sink.

Errors on a single article are logged and the article is skipped.
Errors on the archive itself (open, read, output) abandon the archive, and the worker goes on with the next one.
!*/
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use log::{debug, error, info, trace, warn};

use crate::{
    annotation::{Lemmatizer, Tagger},
    config::Config,
    disambiguation::Disambiguate,
    error::Error,
    io::OutputSink,
    processing::SentenceBatcher,
    sources::wikipedia::{Archive, Article},
};

use super::{Collaborators, Progress};

/// Per-worker subset of the configuration.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub output_folder: PathBuf,
    pub archive_extension: String,
    pub use_only_abstract: bool,
    pub exclude_write: bool,
    pub use_compression: bool,
    pub sentence_threshold: usize,
}

impl From<&Config> for WorkerOptions {
    fn from(config: &Config) -> Self {
        Self {
            output_folder: config.output_folder.clone(),
            archive_extension: config.archive_extension.clone(),
            use_only_abstract: config.use_only_abstract,
            exclude_write: config.exclude_write,
            use_compression: config.use_compression,
            sentence_threshold: config.sentence_threshold,
        }
    }
}

/// What a worker did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub files_done: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub articles: u64,
    pub article_errors: u64,
}

impl WorkerReport {
    pub fn merge(&mut self, other: &WorkerReport) {
        self.files_done += other.files_done;
        self.files_failed += other.files_failed;
        self.files_skipped += other.files_skipped;
        self.articles += other.articles;
        self.article_errors += other.article_errors;
    }
}

pub struct Worker {
    id: usize,
    options: WorkerOptions,
    tagger: Arc<dyn Tagger>,
    lemmatizer: Arc<dyn Lemmatizer>,
    disambiguator: Box<dyn Disambiguate>,
    batcher: SentenceBatcher,
    progress: Progress,
    cancelled: Arc<AtomicBool>,
}

impl Worker {
    pub fn new(
        id: usize,
        options: WorkerOptions,
        collaborators: &Collaborators,
        progress: Progress,
        cancelled: Arc<AtomicBool>,
    ) -> Result<Self, Error> {
        let batcher = SentenceBatcher::new(options.sentence_threshold)?;
        let disambiguator = collaborators.disambiguators.create(id)?;

        Ok(Self {
            id,
            options,
            tagger: collaborators.tagger.clone(),
            lemmatizer: collaborators.lemmatizer.clone(),
            disambiguator,
            batcher,
            progress,
            cancelled,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.options.archive_extension.as_str())
    }

    /// Process every path of `paths`, in order, then close the disambiguator.
    pub fn run<I>(mut self, paths: I) -> WorkerReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = WorkerReport::default();

        for path in paths {
            if self.is_cancelled() {
                warn!("[worker {}] cancelled, stopping before {:?}", self.id, path);
                break;
            }

            trace!("Processing {:?}", path);
            if !self.accepts(&path) {
                trace!("[worker {}] skipping {:?}", self.id, path);
                report.files_skipped += 1;
                continue;
            }

            match self.process_file(&path, &mut report) {
                Ok(nb_articles) => {
                    info!(
                        "[worker {}] {:?}: {} articles",
                        self.id, path, nb_articles
                    );
                    report.files_done += 1;
                }
                Err(e) => {
                    error!("[worker {}] abandoning {:?}: {}", self.id, path, e);
                    report.files_failed += 1;
                }
            }
        }

        if let Err(e) = self.disambiguator.close() {
            error!("[worker {}] error closing disambiguator: {}", self.id, e);
        }

        debug!("[worker {}] done: {:?}", self.id, report);
        report
    }

    /// Process a single archive, returning the number of articles written.
    pub fn process_file(&mut self, path: &Path, report: &mut WorkerReport) -> Result<u64, Error> {
        let mut sink = if self.options.exclude_write {
            OutputSink::discard()
        } else {
            OutputSink::create(&self.options.output_folder, path, self.options.use_compression)?
        };

        let archive = Archive::from_path(path)?;
        let mut nb_articles = 0;

        for record in archive {
            if self.is_cancelled() {
                return Err(Error::Custom("cancelled".to_string()));
            }

            let article = match record {
                Ok(article) => article,
                Err(Error::Record { line, reason }) => {
                    error!("Error reading record at line {} of {:?}: {}", line, path, reason);
                    report.article_errors += 1;
                    continue;
                }
                // I/O errors: the rest of the archive is unreadable
                Err(e) => return Err(e),
            };

            let t0_article = Instant::now();
            match self.guarded_process_article(&article, &mut sink) {
                Ok(nb_units) => {
                    self.progress.incr();
                    nb_articles += 1;
                    report.articles += 1;
                    trace!(
                        "Processed {} {}ms {}ms {}",
                        article.title(),
                        self.progress.mean_per_article().as_millis(),
                        t0_article.elapsed().as_millis(),
                        nb_units
                    );
                }
                Err(e) => {
                    error!("Error processing {}: {}", article.title(), e);
                    report.article_errors += 1;
                }
            }
        }

        // a cancelled file is never committed, even if it was fully read
        if self.is_cancelled() {
            return Err(Error::Custom("cancelled".to_string()));
        }

        sink.close()?;
        Ok(nb_articles)
    }

    /// [Worker::process_article], turning panics of collaborators into errors
    /// so that they only cost the current article.
    fn guarded_process_article(
        &mut self,
        article: &Article,
        sink: &mut OutputSink,
    ) -> Result<usize, Error> {
        panic::catch_unwind(AssertUnwindSafe(|| self.process_article(article, sink)))
            .unwrap_or_else(|payload| {
                Err(Error::Custom(format!(
                    "panicked: {}",
                    panic_message(payload.as_ref())
                )))
            })
    }

    /// Tag, batch and disambiguate an article, writing the result into `sink`.
    /// Returns the number of sentence units written.
    fn process_article(&mut self, article: &Article, sink: &mut OutputSink) -> Result<usize, Error> {
        let text = if self.options.use_only_abstract {
            article.abstract_text(true)
        } else {
            article.text(true)
        };

        let sentences = self.tagger.tag(&text)?;
        let batch = self
            .batcher
            .batch(article.title(), sentences, self.lemmatizer.as_ref());

        self.disambiguator.write_batch(&batch, sink)?;
        Ok(batch.len())
    }
}

/// Message of a panic payload, when it has one.
pub(super) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

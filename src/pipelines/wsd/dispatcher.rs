//! Worker dispatching.
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use log::{debug, error, info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{Config, Scheduling};
use crate::error::Error;
use crate::pipelines::pipeline::Pipeline;

use super::worker::panic_message;
use super::{list_archives, partition, Collaborators, Progress, Worker, WorkerOptions, WorkerReport};

type ReportMessage = (usize, Result<WorkerReport, Error>);

pub struct WsdPipeline {
    config: Config,
    collaborators: Collaborators,
}

impl WsdPipeline {
    /// Pipeline using the collaborators described by `config`.
    pub fn new(config: Config) -> Self {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    fn build_pool(&self) -> Result<ThreadPool, Error> {
        ThreadPoolBuilder::new()
            .num_threads(self.config.concurrent_threads)
            .thread_name(|i| format!("wsd-worker-{}", i))
            .panic_handler(|payload| {
                error!("worker panicked: {}", panic_message(payload.as_ref()))
            })
            .build()
            .map_err(|e| Error::Custom(format!("could not build thread pool: {}", e)))
    }

    /// Spawn a worker on `pool` that processes `paths` and sends its report on `reports`.
    fn spawn_worker<I>(
        &self,
        pool: &ThreadPool,
        id: usize,
        paths: I,
        progress: &Progress,
        cancelled: &Arc<AtomicBool>,
        reports: &Sender<ReportMessage>,
    ) where
        I: IntoIterator<Item = PathBuf> + Send + 'static,
    {
        let options = WorkerOptions::from(&self.config);
        let collaborators = self.collaborators.clone();
        let progress = progress.clone();
        let cancelled = cancelled.clone();
        let reports = reports.clone();

        pool.spawn(move || {
            let report = Worker::new(id, options, &collaborators, progress, cancelled)
                .map(|worker| worker.run(paths));
            if reports.send((id, report)).is_err() {
                debug!("[worker {}] dispatcher is gone", id);
            }
        });
    }

    /// Feed `paths` into the work queue until exhaustion or `deadline`.
    /// Returns `false` on timeout.
    fn feed(&self, paths: Vec<PathBuf>, queue: Sender<PathBuf>, deadline: Instant) -> bool {
        for path in paths {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match queue.send_timeout(path, remaining) {
                Ok(()) => (),
                Err(SendTimeoutError::Timeout(_)) => return false,
                Err(SendTimeoutError::Disconnected(path)) => {
                    error!("No worker left, {:?} and following files are not processed", path);
                    break;
                }
            }
        }
        true
    }

    /// Wait for `nb_workers` reports until `deadline`.
    /// Returns the merged report, and `false` on timeout.
    fn collect(
        reports: &Receiver<ReportMessage>,
        nb_workers: usize,
        deadline: Instant,
    ) -> (WorkerReport, bool) {
        let mut total = WorkerReport::default();
        for _ in 0..nb_workers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match reports.recv_timeout(remaining) {
                Ok((id, Ok(report))) => {
                    debug!("[worker {}] report: {:?}", id, report);
                    total.merge(&report);
                }
                Ok((id, Err(e))) => error!("[worker {}] could not start: {}", id, e),
                Err(RecvTimeoutError::Timeout) => return (total, false),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        (total, true)
    }
}

impl Pipeline<u64> for WsdPipeline {
    fn version() -> &'static str {
        "0.1.0"
    }

    fn run(&self) -> Result<u64, Error> {
        let paths = list_archives(&self.config.wiki_folder)?;
        info!(
            "Found {} files in {:?}",
            paths.len(),
            self.config.wiki_folder
        );

        if !self.config.exclude_write && !self.config.output_folder.exists() {
            warn!("Destination does not exist. Creating");
            std::fs::create_dir_all(&self.config.output_folder)?;
        }

        let nb_workers = self.config.concurrent_threads;
        let pool = self.build_pool()?;
        let progress = Progress::new();
        let cancelled = Arc::new(AtomicBool::new(false));
        let deadline = Instant::now() + self.config.timeout();
        let (report_tx, report_rx) = channel::unbounded();

        let fed = match self.config.scheduling {
            Scheduling::Static => {
                for (id, chunk) in partition(paths, nb_workers).into_iter().enumerate() {
                    debug!("[worker {}] {} files", id, chunk.len());
                    self.spawn_worker(&pool, id, chunk, &progress, &cancelled, &report_tx);
                }
                true
            }
            Scheduling::Queue => {
                let (queue_tx, queue_rx) = channel::bounded(nb_workers * 2);
                for id in 0..nb_workers {
                    self.spawn_worker(
                        &pool,
                        id,
                        queue_rx.clone(),
                        &progress,
                        &cancelled,
                        &report_tx,
                    );
                }
                drop(queue_rx);
                // queue_tx is dropped when feeding ends, letting workers finish
                self.feed(paths, queue_tx, deadline)
            }
        };
        drop(report_tx);

        let (report, completed) = if fed {
            Self::collect(&report_rx, nb_workers, deadline)
        } else {
            (WorkerReport::default(), false)
        };

        if !completed {
            cancelled.store(true, Ordering::Relaxed);
            warn!(
                "Timeout after {:?}, cancelling workers. {} articles processed so far",
                self.config.timeout(),
                progress.get()
            );
        } else {
            info!(
                "{} files done, {} failed, {} skipped, {} article errors",
                report.files_done, report.files_failed, report.files_skipped, report.article_errors
            );
        }

        info!(
            "Processed {} articles in {:?}",
            progress.get(),
            progress.elapsed()
        );
        Ok(progress.get())
    }
}

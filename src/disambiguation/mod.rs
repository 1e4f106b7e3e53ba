/*! Disambiguation.

A disambiguator receives the batch of sentence units of one article and writes its output
directly into the provided stream. The whole batch is written with a single write, so that
output files only contain complete batches, in article order.

Disambiguators are stateful (they usually hold an external process) and are never shared:
each worker gets its own instance from a [DisambiguatorFactory].
!*/
mod jsonl;
mod process;

use std::io::Write;

use crate::annotation::Sentence;
use crate::error::Error;

pub use jsonl::{serialize_batch, JsonLines};
pub use process::{ProcessCommand, ProcessDisambiguator};

pub trait Disambiguate: Send {
    /// Disambiguate `batch` and write the result into `out`.
    fn write_batch(&mut self, batch: &[Sentence], out: &mut dyn Write) -> Result<(), Error>;

    /// Release underlying resources. Called once, when the owning worker is done.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Creates one [Disambiguate] per worker.
pub trait DisambiguatorFactory: Send + Sync {
    fn create(&self, worker_id: usize) -> Result<Box<dyn Disambiguate>, Error>;
}

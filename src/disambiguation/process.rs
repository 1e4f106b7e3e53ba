/*! External process disambiguation.

The disambiguator is a long-running process (usually a python neural model) reading
sentences on its standard input and answering on its standard output, one line per sentence:

- request: space-separated `surface|lemma|pos` tokens,
- response: space-separated sense labels, one per token, `0` or `_` meaning no sense.

Sentences are sent in chunks of at most `batch_size` sentences, each chunk being fully
answered before the next one is sent.
!*/
use std::{
    io::{self, BufRead, BufReader, ErrorKind, Write},
    path::PathBuf,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use itertools::Itertools;
use log::{debug, error, info};

use crate::annotation::{Sentence, LEMMA, POS, SENSE};
use crate::config::Config;
use crate::error::Error;

use super::{serialize_batch, Disambiguate, DisambiguatorFactory};

/// Placeholder for missing token fields.
const EMPTY_FIELD: &str = "_";

/// Command line of the external disambiguator.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    program: PathBuf,
    script: Option<PathBuf>,
    data_path: Option<PathBuf>,
    weights: Vec<String>,
    batch_size: usize,
}

impl ProcessCommand {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            script: None,
            data_path: None,
            weights: Vec::new(),
            batch_size: 1,
        }
    }

    /// Build the command described by `config`, if a disambiguator program is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.python_path.as_ref().map(|program| Self {
            program: program.clone(),
            script: config.script.clone(),
            data_path: config.data_path.clone(),
            weights: config.weights.clone(),
            batch_size: config.batch_size,
        })
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(script) = &self.script {
            args.push(script.to_string_lossy().into_owned());
        }
        if let Some(data_path) = &self.data_path {
            args.push("--data_path".to_string());
            args.push(data_path.to_string_lossy().into_owned());
        }
        if !self.weights.is_empty() {
            args.push("--weights".to_string());
            args.extend(self.weights.iter().cloned());
        }
        args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl DisambiguatorFactory for ProcessCommand {
    fn create(&self, worker_id: usize) -> Result<Box<dyn Disambiguate>, Error> {
        info!(
            "[worker {}] starting disambiguator {:?} {:?}",
            worker_id,
            self.program,
            self.args()
        );
        Ok(Box::new(ProcessDisambiguator::spawn(self)?))
    }
}

pub struct ProcessDisambiguator {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    batch_size: usize,
}

impl ProcessDisambiguator {
    pub fn spawn(command: &ProcessCommand) -> Result<Self, Error> {
        let mut child = command.command().spawn()?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Disambiguator("no stdout on child process".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            batch_size: command.batch_size.max(1),
        })
    }

    fn field(value: Option<&str>) -> String {
        match value {
            Some(v) if !v.is_empty() => v.replace(|c: char| c == '|' || c.is_whitespace(), "_"),
            _ => EMPTY_FIELD.to_string(),
        }
    }

    /// Encode a sentence as a request line (without line terminator).
    pub fn encode(sentence: &Sentence) -> String {
        sentence
            .words()
            .iter()
            .map(|w| {
                format!(
                    "{}|{}|{}",
                    Self::field(Some(w.surface())),
                    Self::field(w.annotation(LEMMA)),
                    Self::field(w.annotation(POS))
                )
            })
            .join(" ")
    }

    /// Apply a response line to `sentence`.
    pub fn decode(line: &str, sentence: &mut Sentence) -> Result<(), Error> {
        let labels: Vec<&str> = line.split_whitespace().collect();
        if labels.len() != sentence.len() {
            return Err(Error::Disambiguator(format!(
                "got {} labels for a sentence of {} words",
                labels.len(),
                sentence.len()
            )));
        }

        for (word, label) in sentence.words_mut().iter_mut().zip(labels) {
            if label != "0" && label != EMPTY_FIELD {
                word.set_annotation(SENSE, label);
            }
        }
        Ok(())
    }

    /// Read `n` response lines.
    fn read_responses(
        stdout: &mut BufReader<ChildStdout>,
        n: usize,
    ) -> Result<Vec<String>, Error> {
        let mut responses = Vec::with_capacity(n);
        for _ in 0..n {
            let mut line = String::new();
            if stdout.read_line(&mut line)? == 0 {
                return Err(Error::Disambiguator(
                    "disambiguator closed its output".to_string(),
                ));
            }
            responses.push(line);
        }
        Ok(responses)
    }

    /// Kill the child and refuse any further request.
    fn mark_broken(&mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.kill() {
            debug!("could not kill disambiguator: {}", e);
        }
    }

    fn disambiguate_chunk(&mut self, chunk: &mut [Sentence]) -> Result<(), Error> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Disambiguator("disambiguator is closed".to_string()))?;
        let stdout = &mut self.stdout;
        let child = &mut self.child;

        let mut request = String::new();
        for sentence in chunk.iter() {
            request.push_str(&Self::encode(sentence));
            request.push('\n');
        }

        // the request is written while responses are read,
        // so that neither side blocks on a full pipe
        let exchange = crossbeam::scope(|s| {
            let writer = s.spawn(move |_| -> io::Result<()> {
                stdin.write_all(request.as_bytes())?;
                stdin.flush()
            });

            let responses = Self::read_responses(stdout, chunk.len());
            if responses.is_err() {
                // unblocks the writer if the child stopped reading
                let _ = child.kill();
            }

            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::new(ErrorKind::Other, "request writer panicked")));
            (responses, written)
        });

        let responses = match exchange {
            Ok((Ok(responses), Ok(()))) => responses,
            Ok((Err(e), _)) => {
                self.mark_broken();
                return Err(e);
            }
            Ok((Ok(_), Err(e))) => {
                self.mark_broken();
                return Err(e.into());
            }
            Err(_) => {
                self.mark_broken();
                return Err(Error::Disambiguator(
                    "request writer panicked".to_string(),
                ));
            }
        };

        // every response of the chunk has been consumed: a bad one only fails this batch
        let mut result = Ok(());
        for (sentence, line) in chunk.iter_mut().zip(&responses) {
            if let Err(e) = Self::decode(line, sentence) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl Disambiguate for ProcessDisambiguator {
    fn write_batch(&mut self, batch: &[Sentence], out: &mut dyn Write) -> Result<(), Error> {
        let mut annotated = batch.to_vec();
        for chunk in annotated.chunks_mut(self.batch_size) {
            self.disambiguate_chunk(chunk)?;
        }

        let buf = serialize_batch(&annotated)?;
        out.write_all(&buf)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        // closing stdin lets the process terminate
        drop(self.stdin.take());
        let status = self.child.wait()?;
        debug!("disambiguator exited with {}", status);

        if status.success() {
            Ok(())
        } else {
            Err(Error::Disambiguator(format!(
                "disambiguator exited with {}",
                status
            )))
        }
    }
}

impl Drop for ProcessDisambiguator {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                error!("could not kill disambiguator: {}", e);
            }
            let _ = self.child.wait();
        }
    }
}

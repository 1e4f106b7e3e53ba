//! JSON lines serialization of batches.
use std::io::Write;

use crate::annotation::Sentence;
use crate::error::Error;

use super::{Disambiguate, DisambiguatorFactory};

/// Serialize `batch` as JSON lines, one sentence per line.
pub fn serialize_batch(batch: &[Sentence]) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    for sentence in batch {
        serde_json::to_writer(&mut buf, sentence)?;
        buf.push(b'\n');
    }
    Ok(buf)
}

/// Writes batches as they are, without disambiguation.
///
/// Used when no external disambiguator is configured, to produce tagged/lemmatized corpora.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLines;

impl Disambiguate for JsonLines {
    fn write_batch(&mut self, batch: &[Sentence], out: &mut dyn Write) -> Result<(), Error> {
        let buf = serialize_batch(batch)?;
        out.write_all(&buf)?;
        Ok(())
    }
}

impl DisambiguatorFactory for JsonLines {
    fn create(&self, _worker_id: usize) -> Result<Box<dyn Disambiguate>, Error> {
        Ok(Box::new(JsonLines))
    }
}

#[cfg(test)]
mod tests {
    use crate::annotation::{Word, ARTICLE};

    use super::*;

    /// Counts write calls.
    #[derive(Default)]
    struct CountingWriter {
        writes: usize,
        content: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes += 1;
            self.content.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn one_line_per_sentence() {
        let batch: Vec<Sentence> = (0..3)
            .map(|i| {
                let mut s = Sentence::new(vec![Word::with_pos(format!("w{}", i), "X")]);
                s.set_annotation(ARTICLE, "Title");
                s
            })
            .collect();

        let mut out = CountingWriter::default();
        JsonLines.write_batch(&batch, &mut out).unwrap();

        // the whole batch goes out in one write
        assert_eq!(out.writes, 1);

        let content = String::from_utf8(out.content).unwrap();
        let decoded: Vec<Sentence> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let mut out = CountingWriter::default();
        JsonLines.write_batch(&[], &mut out).unwrap();
        assert!(out.content.is_empty());
    }
}

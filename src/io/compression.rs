//! Compression formats of input archives and output files.
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    path::Path,
};

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

/// Compression format, detected from a file extension.
///
/// Wikipedia extraction dumps are usually bzip2'd, but gzipped files are supported too.
/// Both decoders are multi-stream ones, since dumps are often concatenations of
/// independently compressed blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Bzip2,
    Gzip,
    None,
}

impl Compression {
    /// Detect compression from the final extension of `path`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bz2") => Compression::Bzip2,
            Some("gz") => Compression::Gzip,
            _ => Compression::None,
        }
    }

    /// File extension (without dot) used for files of this format.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::Bzip2 => Some("bz2"),
            Compression::Gzip => Some("gz"),
            Compression::None => None,
        }
    }

    /// Wrap `inner` into the matching decoder and a [BufReader].
    pub fn reader<R: Read + 'static>(&self, inner: R) -> Box<dyn BufRead> {
        match self {
            Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(inner))),
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(inner))),
            Compression::None => Box::new(BufReader::new(inner)),
        }
    }

    /// Open `path` for reading, decompressing according to its extension.
    pub fn open(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
        let f = File::open(path)?;
        Ok(Self::from_path(path).reader(f))
    }
}

/// Compressing (or not) writer over `W`.
///
/// Compressed variants must be [Encoder::finish]ed to get a valid trailer.
pub(crate) enum Encoder<W: Write> {
    Plain(W),
    Bzip2(BzEncoder<W>),
    Gzip(GzEncoder<W>),
}

impl<W: Write> Encoder<W> {
    pub fn new(inner: W, compression: Compression) -> Self {
        match compression {
            Compression::Bzip2 => {
                Encoder::Bzip2(BzEncoder::new(inner, bzip2::Compression::default()))
            }
            Compression::Gzip => Encoder::Gzip(GzEncoder::new(inner, flate2::Compression::default())),
            Compression::None => Encoder::Plain(inner),
        }
    }

    /// Write the compression trailer (if any) and give back the inner writer.
    pub fn finish(self) -> std::io::Result<W> {
        match self {
            Encoder::Plain(w) => Ok(w),
            Encoder::Bzip2(enc) => enc.finish(),
            Encoder::Gzip(enc) => enc.finish(),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Encoder::Plain(w) => w.write(buf),
            Encoder::Bzip2(enc) => enc.write(buf),
            Encoder::Gzip(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Encoder::Plain(w) => w.flush(),
            Encoder::Bzip2(enc) => enc.flush(),
            Encoder::Gzip(enc) => enc.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn detect_from_extension() {
        assert_eq!(
            Compression::from_path(Path::new("AA/wiki_00.bz2")),
            Compression::Bzip2
        );
        assert_eq!(
            Compression::from_path(Path::new("AA/wiki_00.gz")),
            Compression::Gzip
        );
        assert_eq!(
            Compression::from_path(Path::new("AA/wiki_00")),
            Compression::None
        );
        assert_eq!(
            Compression::from_path(Path::new("AA/wiki_00.txt")),
            Compression::None
        );
    }

    #[test]
    fn encoded_content_is_readable() {
        for compression in [Compression::Bzip2, Compression::Gzip, Compression::None] {
            let mut enc = Encoder::new(Vec::new(), compression);
            enc.write_all(b"first line\nsecond line\n").unwrap();
            let bytes = enc.finish().unwrap();

            let reader = compression.reader(Cursor::new(bytes));
            let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
            assert_eq!(lines, vec!["first line", "second line"], "{:?}", compression);
        }
    }

    #[test]
    fn multi_stream_bzip2() {
        // two independently compressed blocks, concatenated
        let mut bytes = Vec::new();
        for part in [&b"part one\n"[..], &b"part two\n"[..]] {
            let mut enc = Encoder::new(Vec::new(), Compression::Bzip2);
            enc.write_all(part).unwrap();
            bytes.extend(enc.finish().unwrap());
        }

        let reader = Compression::Bzip2.reader(Cursor::new(bytes));
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["part one", "part two"]);
    }
}

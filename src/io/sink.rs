/*! Per-archive output sink.

An [OutputSink] is bound to exactly one input archive and writes to
`<output root>/<archive parent dir name>/<archive stem>[.<ext>]`, mirroring the input tree.

Content goes to a `.part` sibling first, and is renamed to its final name when the sink is
[OutputSink::close]d. A sink that is dropped without being closed (per-file error, timeout, crash)
releases its file handle but leaves the `.part` file behind.
!*/
use std::{
    ffi::OsString,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, trace};

use crate::error::Error;

use super::compression::{Compression, Encoder};

const PART_SUFFIX: &str = ".part";

enum Target {
    File {
        encoder: Encoder<BufWriter<File>>,
        part_path: PathBuf,
        final_path: PathBuf,
    },
    Discard,
}

pub struct OutputSink {
    target: Target,
}

impl OutputSink {
    /// Compute the mirrored output path of `input` under `output_root`.
    ///
    /// When `compression` has an extension, it is appended to the input stem:
    /// `wiki/AA/wiki_00.bz2` gives `out/AA/wiki_00.bz2` (compressed) or `out/AA/wiki_00` (plain).
    pub fn mirrored_path(
        output_root: &Path,
        input: &Path,
        compression: Compression,
    ) -> Result<PathBuf, Error> {
        let stem = input
            .file_stem()
            .ok_or_else(|| Error::Custom(format!("no file name in {:?}", input)))?;

        let mut path = output_root.to_path_buf();
        if let Some(parent_name) = input.parent().and_then(|p| p.file_name()) {
            path.push(parent_name);
        }

        let mut filename = OsString::from(stem);
        if let Some(ext) = compression.extension() {
            filename.push(".");
            filename.push(ext);
        }
        path.push(filename);

        Ok(path)
    }

    /// Create a sink for `input`.
    ///
    /// If `compress` is set, output is compressed using the format of the input archive.
    /// The mirrored directory is created if needed.
    pub fn create(output_root: &Path, input: &Path, compress: bool) -> Result<Self, Error> {
        let compression = if compress {
            Compression::from_path(input)
        } else {
            Compression::None
        };

        let final_path = Self::mirrored_path(output_root, input, compression)?;
        if let Some(dir) = final_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut part_path = final_path.clone().into_os_string();
        part_path.push(PART_SUFFIX);
        let part_path = PathBuf::from(part_path);

        debug!("Out File: {:?}", final_path);
        let file = File::create(&part_path)?;
        let encoder = Encoder::new(BufWriter::new(file), compression);

        Ok(Self {
            target: Target::File {
                encoder,
                part_path,
                final_path,
            },
        })
    }

    /// A sink that drops everything written into it and creates nothing on disk.
    pub fn discard() -> Self {
        Self {
            target: Target::Discard,
        }
    }

    /// Final path of the output, `None` for discarding sinks.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File { final_path, .. } => Some(final_path),
            Target::Discard => None,
        }
    }

    /// Finish compression, flush, sync and move the output to its final name.
    pub fn close(self) -> Result<(), Error> {
        match self.target {
            Target::File {
                encoder,
                part_path,
                final_path,
            } => {
                let writer = encoder.finish()?;
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()?;
                drop(file);

                std::fs::rename(&part_path, &final_path)?;
                trace!("closed {:?}", final_path);
                Ok(())
            }
            Target::Discard => Ok(()),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.target {
            Target::File { encoder, .. } => encoder.write(buf),
            Target::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.target {
            Target::File { encoder, .. } => encoder.flush(),
            Target::Discard => Ok(()),
        }
    }
}

use std::{
    io::{BufRead, ErrorKind},
    path::Path,
};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{error::Error, io::Compression};

use super::{markup, Article};

lazy_static! {
    static ref DOC_ATTRIBUTE: Regex = Regex::new(r#"(\w+)="([^"]*)""#).unwrap();
}

const DOC_END: &str = "</doc>";

/// Archive instance, generic over reader type.
///
/// Records are read lazily, one line at a time: the archive is never fully loaded in memory.
///
/// Two record encodings are supported and detected per record:
/// - JSON lines (`{"id": …, "url": …, "title": …, "text": …}`),
/// - `<doc id="…" url="…" title="…">` blocks, closed by a `</doc>` line.
///
/// Undecodable records yield an [Error::Record] and iteration goes on with the next record,
/// while I/O errors (such as truncated compressed streams) yield an [Error::Io] and end the iteration.
pub struct Archive<R> {
    reader: R,
    line_number: usize,
    buf: Vec<u8>,
    /// Record header met inside a previous record, with its line number.
    pending: Option<(String, usize)>,
    done: bool,
}

/// Archive reader over a compressed file.
impl Archive<Box<dyn BufRead>> {
    /// Open the archive at `path`, decompressing it according to its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = Compression::open(path.as_ref())?;
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Archive<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: Vec::new(),
            pending: None,
            done: false,
        }
    }

    /// Read the next line, without its line terminator.
    ///
    /// Invalid UTF-8 is replaced rather than failing the whole archive.
    fn next_line(&mut self) -> Option<Result<String, Error>> {
        self.buf.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        self.line_number += 1;

        while matches!(self.buf.last(), Some(b'\n') | Some(b'\r')) {
            self.buf.pop();
        }
        Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Read a `<doc>` block whose opening line is `header`.
    fn read_doc(&mut self, header: &str, start: usize) -> Result<Article, Error> {
        let mut id = None;
        let mut url = None;
        let mut title = None;
        for attr in DOC_ATTRIBUTE.captures_iter(header) {
            let value = markup::decode_entities(&attr[2]).into_owned();
            match &attr[1] {
                "id" => id = Some(value),
                "url" => url = Some(value),
                "title" => title = Some(value),
                _ => (),
            }
        }

        let title = title.ok_or_else(|| Error::Record {
            line: start,
            reason: "document has no title".to_string(),
        })?;

        let mut body: Vec<String> = Vec::new();
        loop {
            let line = match self.next_line() {
                Some(line) => line?,
                None => {
                    return Err(Error::Record {
                        line: start,
                        reason: format!("document {:?} is not terminated", title),
                    })
                }
            };

            if line.trim() == DOC_END {
                break;
            }

            // the closing tag is missing: the new document is kept for the next record
            if line.trim_start().starts_with("<doc") {
                self.pending = Some((line, self.line_number));
                return Err(Error::Record {
                    line: start,
                    reason: format!("document {:?} is not terminated", title),
                });
            }

            // extraction tools repeat the title as the first body line
            if body.is_empty() && markup::decode_entities(line.trim()) == title.as_str() {
                continue;
            }
            body.push(line);
        }

        let text = body.join("\n").trim().to_string();
        Ok(Article::new(title, text).with_attributes(id, url))
    }
}

impl<R: BufRead> Iterator for Archive<R> {
    type Item = Result<Article, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let (line, start) = match self.pending.take() {
                Some(pending) => pending,
                None => match self.next_line() {
                    Some(Ok(line)) => (line, self.line_number),
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    None => {
                        self.done = true;
                        return None;
                    }
                },
            };

            let record = line.trim();
            if record.is_empty() {
                continue;
            }

            trace!("record at line {}", start);

            let article = if record.starts_with('{') {
                serde_json::from_str::<Article>(record).map_err(|e| Error::Record {
                    line: start,
                    reason: e.to_string(),
                })
            } else if record.starts_with("<doc") {
                let header = record.to_string();
                self.read_doc(&header, start)
            } else {
                Err(Error::Record {
                    line: start,
                    reason: "content outside of a record".to_string(),
                })
            };

            // I/O errors inside a document end the archive too
            if let Err(Error::Io(_)) = &article {
                self.done = true;
            }
            return Some(article);
        }
    }
}

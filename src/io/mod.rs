/*!
# IO utilities

Compressed archive decoding and per-file output writing.

[Compression] picks a codec from a file extension, and [OutputSink] owns the
(optionally compressed) output stream that mirrors one input archive.
!*/
mod compression;
mod sink;

pub use compression::Compression;
pub use sink::OutputSink;

//! Frame source abstraction and file opening.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek};

use crate::error::PlaybackError;

/// A seekable byte stream holding concatenated frames.
///
/// Implemented for every `Read + Seek` type, so a [`File`] is used in
/// production and an in-memory `Cursor` in tests.
pub trait FrameSource: Read + Seek {}

impl<T: Read + Seek> FrameSource for T {}

/// Open the animation file for reading.
pub fn open_source(path: &str) -> Result<File, PlaybackError> {
    File::open(path).map_err(|source| PlaybackError::SourceOpen {
        path: path.to_string(),
        source,
    })
}

/// Read until `buf` is full or the source is exhausted.
///
/// Returns the number of bytes read. Interrupted reads are retried, so a
/// short count always means end of source.
pub(crate) fn read_full<R: Read + ?Sized>(
    source: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

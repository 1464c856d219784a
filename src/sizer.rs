//! One-time scan for the size of the first frame.
//!
//! Frames are separated by a delimiter that starts either at offset 0 of the
//! source or right after a line feed. The frame size is the distance from the
//! start of the source to that delimiter, including the line feed.

use std::io::SeekFrom;

use crate::config::SCAN_BUFFER_SIZE;
use crate::error::ScanError;
use crate::source::{read_full, FrameSource};

/// Streaming delimiter search with a fixed-size buffer.
///
/// Memory use is bounded by the buffer size regardless of the source length.
///
/// ## Example
///
/// ```rust
/// use std::io::Cursor;
/// use badapple::FrameSizer;
///
/// let mut source = Cursor::new(b"AB\nCD\nnekomark\r\nEF\nGH\nnekomark\r\n".to_vec());
/// let sizer = FrameSizer::new(b"nekomark", 8);
///
/// assert_eq!(sizer.frame_size(&mut source).unwrap(), 6);
/// assert_eq!(source.position(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct FrameSizer<'a> {
    delimiter: &'a [u8],
    buffer_size: usize,
}

impl<'a> FrameSizer<'a> {
    /// Create a sizer for `delimiter` scanning `buffer_size` bytes at a time.
    ///
    /// `buffer_size` is raised to the delimiter length if smaller, since a
    /// match must fit inside one buffer.
    pub fn new(delimiter: &'a [u8], buffer_size: usize) -> Self {
        Self {
            delimiter,
            buffer_size: buffer_size.max(delimiter.len()).max(1),
        }
    }

    /// Size of the scan buffer.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Scan `source` from its current position for the first anchored
    /// delimiter and return its distance from that position.
    ///
    /// The starting position counts as a frame start, so a delimiter right
    /// there is anchored. On success the source is rewound to offset 0.
    pub fn frame_size<S: FrameSource + ?Sized>(&self, source: &mut S) -> Result<u64, ScanError> {
        let delim = self.delimiter;
        if delim.is_empty() {
            return Err(ScanError::NoDelimiterFound);
        }

        let mut buf = vec![0u8; self.buffer_size];
        let base = source.stream_position()?;
        // Bytes consumed after `base` before the current buffer.
        let mut seek: u64 = 0;
        // Whether the buffer start is `base` or follows a line feed.
        let mut anchored = true;

        loop {
            let len = read_full(source, &mut buf)?;
            if len == 0 {
                break;
            }
            let chunk = &buf[..len];

            if anchored && chunk.starts_with(delim) {
                return self.found(source, seek);
            }

            let mut last_lf: Option<usize> = None;
            let line_feeds = chunk
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| i);
            for i in line_feeds {
                last_lf = Some(i);
                if chunk[i + 1..].starts_with(delim) {
                    return self.found(source, seek + i as u64 + 1);
                }
            }

            if len < buf.len() {
                break;
            }

            // A delimiter after the last line feed may continue in the next
            // buffer. Restart right after that line feed so it is seen whole.
            match last_lf {
                Some(i) if len - i - 1 < delim.len() => {
                    seek += i as u64 + 1;
                    source.seek(SeekFrom::Start(base + seek))?;
                    anchored = true;
                }
                _ => {
                    seek += len as u64;
                    anchored = false;
                }
            }
        }

        tracing::debug!(scanned = seek, "reached end of source without a delimiter");
        Err(ScanError::NoDelimiterFound)
    }

    fn found<S: FrameSource + ?Sized>(&self, source: &mut S, size: u64) -> Result<u64, ScanError> {
        source.seek(SeekFrom::Start(0))?;
        tracing::info!("frame size: {}", size);
        Ok(size)
    }
}

/// Compute the first frame's size with the default scan buffer.
pub fn compute_frame_size<S: FrameSource + ?Sized>(
    source: &mut S,
    delimiter: &[u8],
) -> Result<u64, ScanError> {
    FrameSizer::new(delimiter, SCAN_BUFFER_SIZE).frame_size(source)
}

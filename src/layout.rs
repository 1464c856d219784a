//! Byte layout of a frame inside the source file.

use crate::error::PlaybackError;

/// Lengths derived from the first frame's size and the padding settings.
///
/// All frames in a source share the same layout:
///
/// ```text
/// | payload | tail_cut | delimiter | over_seek | next payload ...
/// |<---- frame_size -->|
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameLayout {
    /// Bytes from frame start to the delimiter, padding included
    pub frame_size: u64,
    /// Bytes drawn per frame
    pub payload_len: usize,
    /// Bytes skipped after a payload to reach the next one
    pub advance_len: u64,
}

impl FrameLayout {
    /// Build a layout, rejecting frames that are not longer than their
    /// trailing padding.
    ///
    /// ```rust
    /// use badapple::FrameLayout;
    ///
    /// let layout = FrameLayout::new(100, 8, 4, 2).unwrap();
    /// assert_eq!(layout.payload_len, 96);
    /// assert_eq!(layout.advance_len, 14);
    ///
    /// assert!(FrameLayout::new(3, 8, 4, 2).is_err());
    /// ```
    pub fn new(
        frame_size: u64,
        delimiter_len: usize,
        tail_cut: u64,
        over_seek: u64,
    ) -> Result<Self, PlaybackError> {
        let too_short = || PlaybackError::FrameTooShort { frame_size, tail_cut };
        let payload = frame_size
            .checked_sub(tail_cut)
            .filter(|&n| n > 0)
            .ok_or_else(too_short)?;
        let payload_len = usize::try_from(payload).map_err(|_| {
            PlaybackError::InvalidConfig(format!("frame size {frame_size} does not fit in memory"))
        })?;

        let advance_len = u64::try_from(delimiter_len)
            .ok()
            .and_then(|d| d.checked_add(tail_cut))
            .and_then(|n| n.checked_add(over_seek))
            .ok_or_else(|| PlaybackError::InvalidConfig("padding lengths overflow".into()))?;

        Ok(Self {
            frame_size,
            payload_len,
            advance_len,
        })
    }

    /// Distance from one payload start to the next.
    #[inline]
    pub fn stride(&self) -> u64 {
        self.payload_len as u64 + self.advance_len
    }
}

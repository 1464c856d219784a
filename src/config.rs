//! Playback configuration and its compile-time defaults.

use std::time::Duration;

use crate::error::PlaybackError;

/// Animation file read when no other path is configured.
pub const SOURCE_PATH: &str = "badapple.txt";

/// Marker separating two frames in the source file.
pub const DELIMITER: &str = "nekomark";

/// Padding bytes (`"\r\n\r\n"`) before each delimiter that are not drawn.
pub const TAIL_CUT: u64 = 4;

/// Padding bytes (`"\r\n"`) after each delimiter skipped before the next frame.
pub const OVER_SEEK: u64 = 2;

/// Size of the buffer used while searching for the first delimiter.
///
/// Must not be smaller than the delimiter.
pub const SCAN_BUFFER_SIZE: usize = 4096;

/// Default delay between two frames, in nanoseconds.
pub const DEFAULT_DELAY_NANOS: u64 = 126_084_441;

/// Settings for one playback run.
///
/// All fields have defaults taken from the constants of this module, so a
/// partially filled document deserializes into a usable config.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Path of the animation file
    pub source_path: String,
    /// Frame delimiter (compared byte by byte)
    pub delimiter: String,
    /// Padding bytes before the delimiter
    pub tail_cut: u64,
    /// Padding bytes after the delimiter
    pub over_seek: u64,
    /// Scan buffer size for the frame sizer
    pub scan_buffer_size: usize,
    /// Whole-second component of the frame interval
    pub delay_secs: u64,
    /// Nanosecond component of the frame interval
    pub delay_nanos: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            source_path: SOURCE_PATH.to_string(),
            delimiter: DELIMITER.to_string(),
            tail_cut: TAIL_CUT,
            over_seek: OVER_SEEK,
            scan_buffer_size: SCAN_BUFFER_SIZE,
            delay_secs: 0,
            delay_nanos: DEFAULT_DELAY_NANOS,
        }
    }
}

impl PlaybackConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document into a `PlaybackConfig`.
    ///
    /// Missing keys keep their default values.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Override the nanosecond component of the frame interval.
    pub fn with_delay_nanos(mut self, nanos: u64) -> Self {
        self.delay_nanos = nanos;
        self
    }

    /// Override the delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Override both padding lengths.
    pub fn with_padding(mut self, tail_cut: u64, over_seek: u64) -> Self {
        self.tail_cut = tail_cut;
        self.over_seek = over_seek;
        self
    }

    /// Override the scan buffer size.
    pub fn with_scan_buffer_size(mut self, size: usize) -> Self {
        self.scan_buffer_size = size;
        self
    }

    /// Delimiter as raw bytes.
    #[inline]
    pub fn delimiter_bytes(&self) -> &[u8] {
        self.delimiter.as_bytes()
    }

    /// Period of the frame timer.
    ///
    /// Nanosecond values of one second or more carry into the seconds.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.delay_secs).saturating_add(Duration::from_nanos(self.delay_nanos))
    }

    /// Check the invariants the sizer and the timer rely on.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.delimiter.is_empty() {
            return Err(PlaybackError::InvalidConfig("delimiter must not be empty".into()));
        }
        if self.delimiter.len() > self.scan_buffer_size {
            return Err(PlaybackError::InvalidConfig(format!(
                "delimiter is {} bytes but the scan buffer holds only {}",
                self.delimiter.len(),
                self.scan_buffer_size
            )));
        }
        if self.interval().is_zero() {
            return Err(PlaybackError::InvalidDelay);
        }
        Ok(())
    }
}

/// Parse a `-d` argument: decimal, or hexadecimal with a `0x` prefix.
///
/// Zero is rejected.
///
/// ```rust
/// use badapple::parse_delay_nanos;
///
/// assert_eq!(parse_delay_nanos("126084441").unwrap(), 126_084_441);
/// assert_eq!(parse_delay_nanos("0x10").unwrap(), 16);
/// assert!(parse_delay_nanos("0").is_err());
/// ```
pub fn parse_delay_nanos(arg: &str) -> Result<u64, PlaybackError> {
    let arg = arg.trim();
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => arg.parse::<u64>(),
    };
    match parsed {
        Ok(0) => Err(PlaybackError::InvalidDelay),
        Ok(nanos) => Ok(nanos),
        Err(_) => Err(PlaybackError::InvalidConfig(format!("invalid delay '{}'", arg))),
    }
}

//! Error types for frame scanning and playback.

use thiserror::Error;

/// Failure of the one-time frame size scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The source ended before an anchored delimiter was found
    #[error("no delimiter found in source")]
    NoDelimiterFound,
    /// Reading or seeking the source failed
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Errors that stop playback.
///
/// None of these are retried. Running out of frames is not an error, see
/// [`TickOutcome::Finished`](crate::TickOutcome::Finished).
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The animation file could not be opened.
    #[error("{path}: {source}")]
    SourceOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or seeking the source failed.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// Writing a frame to the output failed.
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// The source holds no delimiter at a frame boundary.
    #[error("no {delimiter} found in {path}")]
    NoDelimiterFound { delimiter: String, path: String },

    /// A zero delay was requested.
    #[error("delay should not be 0")]
    InvalidDelay,

    /// Configuration values that cannot work together.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The first frame is not longer than the padding cut from its end.
    #[error("frame size {frame_size} leaves nothing to draw after cutting {tail_cut} padding bytes")]
    FrameTooShort { frame_size: u64, tail_cut: u64 },
}

impl PlaybackError {
    /// Attach the delimiter and source path to a scan failure.
    pub fn from_scan(err: ScanError, delimiter: &str, path: &str) -> Self {
        match err {
            ScanError::NoDelimiterFound => Self::NoDelimiterFound {
                delimiter: delimiter.to_string(),
                path: path.to_string(),
            },
            ScanError::Read(e) => Self::Read(e),
        }
    }
}

/// Result type alias using [`PlaybackError`].
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delimiter_names_delimiter_and_path() {
        let err = PlaybackError::from_scan(ScanError::NoDelimiterFound, "nekomark", "badapple.txt");
        assert_eq!(err.to_string(), "no nekomark found in badapple.txt");
    }

    #[test]
    fn scan_read_error_stays_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = PlaybackError::from_scan(ScanError::Read(io), "nekomark", "badapple.txt");
        assert!(matches!(err, PlaybackError::Read(_)));
        assert_eq!(err.to_string(), "read error: disk on fire");
    }

    #[test]
    fn invalid_delay_message() {
        assert_eq!(PlaybackError::InvalidDelay.to_string(), "delay should not be 0");
    }
}

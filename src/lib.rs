//! # badapple
//!
//! Terminal player for text animations stored as one file of concatenated
//! frames separated by a delimiter.
//!
//! This crate provides:
//! - A bounded-memory scan that finds the size of the first frame
//! - A playback session that draws one frame per tick, each behind a
//!   cursor-reset escape so the terminal redraws in place
//! - A timer-driven driver that ticks the session at a fixed interval
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration types
//! - `toml` - Enable loading [`PlaybackConfig`] from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use badapple::{open_source, play, PlaybackConfig, PlaybackSession};
//!
//! let config = PlaybackConfig::default();
//! let source = open_source(&config.source_path)?;
//! let mut session = PlaybackSession::new(source, std::io::stdout(), &config)?;
//!
//! // Draws one frame per interval until the file runs out
//! let summary = play(&mut session, config.interval()).await?;
//! ```

mod config;
mod error;
mod layout;
mod player;
pub mod render;
mod session;
mod sizer;
mod source;

pub use config::{
    parse_delay_nanos, PlaybackConfig, DEFAULT_DELAY_NANOS, DELIMITER, OVER_SEEK,
    SCAN_BUFFER_SIZE, SOURCE_PATH, TAIL_CUT,
};
pub use error::{PlaybackError, Result, ScanError};
pub use layout::FrameLayout;
pub use player::{play, play_until, PlaybackSummary};
pub use render::{unbuffered_stdout, RenderBuffer, CURSOR_HOME};
pub use session::{PlaybackSession, PlaybackState, TickOutcome};
pub use sizer::{compute_frame_size, FrameSizer};
pub use source::{open_source, FrameSource};

//! Playback session: per-tick frame drawing.

use std::io::{SeekFrom, Write};

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::layout::FrameLayout;
use crate::render::RenderBuffer;
use crate::sizer::FrameSizer;
use crate::source::{read_full, FrameSource};

/// Current state of a playback session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Waiting for the next tick
    Idle,
    /// A frame is being read and written
    Drawing,
    /// The source is exhausted or an I/O error occurred
    Stopped,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One frame was written to the sink
    Drawn,
    /// No frame data was left; playback is over
    Finished,
}

/// Everything a tick needs: the source, the sink, the layout and the
/// render buffer.
///
/// The session does not handle timing. The caller invokes [`tick`] once per
/// timer period; because `tick` borrows the session mutably, two ticks can
/// never run at the same time.
///
/// ## Example
///
/// ```rust
/// use std::io::Cursor;
/// use badapple::{PlaybackConfig, PlaybackSession, TickOutcome};
///
/// let source = Cursor::new(b"AB\nnekomark\r\nCD\nnekomark\r\n".to_vec());
/// let config = PlaybackConfig::new().with_padding(0, 2);
/// let mut session = PlaybackSession::new(source, Vec::new(), &config).unwrap();
///
/// assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
/// assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
/// assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
///
/// let out = session.finish();
/// assert_eq!(out, b"\x1b[0;0HAB\n\x1b[0;0HCD\n");
/// ```
///
/// [`tick`]: PlaybackSession::tick
#[derive(Debug)]
pub struct PlaybackSession<S, W> {
    source: S,
    sink: W,
    layout: FrameLayout,
    buffer: RenderBuffer,
    state: PlaybackState,
    frames_drawn: u64,
}

impl<S: FrameSource, W: Write> PlaybackSession<S, W> {
    /// Size the first frame of `source` and prepare for playback.
    ///
    /// The source must be positioned at the start of the first frame.
    pub fn new(mut source: S, sink: W, config: &PlaybackConfig) -> Result<Self> {
        config.validate()?;

        let delimiter = config.delimiter_bytes();
        let frame_size = FrameSizer::new(delimiter, config.scan_buffer_size)
            .frame_size(&mut source)
            .map_err(|e| PlaybackError::from_scan(e, &config.delimiter, &config.source_path))?;
        let layout =
            FrameLayout::new(frame_size, delimiter.len(), config.tail_cut, config.over_seek)?;

        Ok(Self::with_layout(source, sink, layout))
    }

    /// Build a session for a source whose layout is already known.
    pub fn with_layout(source: S, sink: W, layout: FrameLayout) -> Self {
        tracing::debug!(
            frame_size = layout.frame_size,
            payload = layout.payload_len,
            advance = layout.advance_len,
            stride = layout.stride(),
            "playback session ready"
        );
        Self {
            source,
            sink,
            layout,
            buffer: RenderBuffer::new(layout.payload_len),
            state: PlaybackState::Idle,
            frames_drawn: 0,
        }
    }

    /// Draw the next frame.
    ///
    /// Reads one payload, writes it behind the cursor-reset prefix in a
    /// single write, then seeks past the padding and delimiter. Once the
    /// source yields no data the session stops and every further tick
    /// returns [`TickOutcome::Finished`] without writing.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.state == PlaybackState::Stopped {
            return Ok(TickOutcome::Finished);
        }
        self.state = PlaybackState::Drawing;

        match self.draw() {
            Ok(TickOutcome::Drawn) => {
                self.state = PlaybackState::Idle;
                self.frames_drawn += 1;
                Ok(TickOutcome::Drawn)
            }
            Ok(TickOutcome::Finished) => {
                self.state = PlaybackState::Stopped;
                tracing::info!(frames = self.frames_drawn, "end of animation");
                Ok(TickOutcome::Finished)
            }
            Err(e) => {
                self.state = PlaybackState::Stopped;
                Err(e)
            }
        }
    }

    fn draw(&mut self) -> Result<TickOutcome> {
        let filled =
            read_full(&mut self.source, self.buffer.payload_mut()).map_err(PlaybackError::Read)?;
        if filled == 0 {
            return Ok(TickOutcome::Finished);
        }
        if filled < self.layout.payload_len {
            tracing::warn!(
                frame = self.frames_drawn + 1,
                read = filled,
                expected = self.layout.payload_len,
                "last frame is truncated"
            );
        }

        self.sink.write_all(self.buffer.frame(filled)).map_err(PlaybackError::Write)?;
        self.sink.flush().map_err(PlaybackError::Write)?;

        let skip = i64::try_from(self.layout.advance_len)
            .map_err(|_| PlaybackError::InvalidConfig("padding too large to seek over".into()))?;
        self.source.seek(SeekFrom::Current(skip)).map_err(PlaybackError::Read)?;

        tracing::debug!(frame = self.frames_drawn + 1, bytes = filled, "frame drawn");
        Ok(TickOutcome::Drawn)
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of frames written so far.
    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Frame layout found during setup.
    #[inline]
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// End the session, closing the source and releasing the buffer.
    ///
    /// Returns the sink.
    pub fn finish(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek};

    use super::*;

    /// Records every `write` call separately.
    #[derive(Default)]
    struct Recorder {
        writes: Vec<Vec<u8>>,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// `count` frames of `rows` lines with the default padding around the
    /// delimiter. Frame `f` is filled with letter `a + f`.
    fn animation(count: usize, rows: usize, cols: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for f in 0..count {
            for _ in 0..rows {
                data.extend(std::iter::repeat(b'a' + f as u8).take(cols));
                data.push(b'\n');
            }
            data.extend_from_slice(b"\r\n\r\nnekomark\r\n");
        }
        data
    }

    #[test]
    fn n_ticks_draw_n_frames() {
        let frames = 5;
        let source = Cursor::new(animation(frames, 3, 7));
        let mut session =
            PlaybackSession::new(source, Recorder::default(), &PlaybackConfig::new()).unwrap();

        // 3 rows of 7 chars + LF, plus "\r\n\r\n".
        assert_eq!(session.layout().frame_size, 28);
        assert_eq!(session.layout().payload_len, 24);

        for _ in 0..frames {
            assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
            assert_eq!(session.state(), PlaybackState::Idle);
        }
        assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
        assert_eq!(session.state(), PlaybackState::Stopped);
        assert_eq!(session.frames_drawn(), frames as u64);

        let writes = session.finish().writes;
        assert_eq!(writes.len(), frames);
        for (i, w) in writes.iter().enumerate() {
            assert_eq!(w.len(), 28 + 6 - 4);
            assert!(w.starts_with(b"\x1b[0;0H"));
            let expected: Vec<u8> =
                std::iter::repeat(b'a' + i as u8).take(7).chain([b'\n']).collect();
            assert_eq!(&w[6..14], &expected[..]);
        }
    }

    #[test]
    fn first_tick_draws_first_frame() {
        let source = Cursor::new(animation(2, 1, 4));
        let mut session = PlaybackSession::new(source, Vec::new(), &PlaybackConfig::new()).unwrap();
        session.tick().unwrap();
        assert_eq!(session.finish(), b"\x1b[0;0Haaaa\n");
    }

    #[test]
    fn ticks_after_finish_write_nothing() {
        let source = Cursor::new(animation(1, 2, 2));
        let mut session =
            PlaybackSession::new(source, Recorder::default(), &PlaybackConfig::new()).unwrap();
        assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
        for _ in 0..3 {
            assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
        }
        assert_eq!(session.finish().writes.len(), 1);
    }

    #[test]
    fn truncated_last_frame_draws_only_read_bytes() {
        let mut data = animation(1, 2, 3);
        data.extend_from_slice(b"zz");
        let source = Cursor::new(data);
        let mut session =
            PlaybackSession::new(source, Recorder::default(), &PlaybackConfig::new()).unwrap();

        assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
        assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
        assert_eq!(session.tick().unwrap(), TickOutcome::Finished);

        let writes = session.finish().writes;
        assert_eq!(writes[1], b"\x1b[0;0Hzz");
    }

    #[test]
    fn frame_shorter_than_padding_fails_setup() {
        let source = Cursor::new(b"AB\nnekomark\r\nCD\nnekomark\r\n".to_vec());
        let err = PlaybackSession::new(source, Vec::new(), &PlaybackConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            PlaybackError::FrameTooShort {
                frame_size: 3,
                tail_cut: 4
            }
        ));
    }

    #[test]
    fn missing_delimiter_fails_setup() {
        let source = Cursor::new(b"just some text\nwith lines\n".to_vec());
        let err = PlaybackSession::new(source, Vec::new(), &PlaybackConfig::new()).unwrap_err();
        assert_eq!(err.to_string(), "no nekomark found in badapple.txt");
    }

    #[test]
    fn custom_delimiter_and_small_scan_buffer() {
        let data = b"##\n##\n--\n@@\n@@\n--\n".to_vec();
        let config = PlaybackConfig::new()
            .with_delimiter("--")
            .with_padding(0, 1)
            .with_scan_buffer_size(2);
        let mut session = PlaybackSession::new(Cursor::new(data), Vec::new(), &config).unwrap();
        assert_eq!(session.layout().frame_size, 6);

        assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
        assert_eq!(session.tick().unwrap(), TickOutcome::Drawn);
        assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
        assert_eq!(session.finish(), b"\x1b[0;0H##\n##\n\x1b[0;0H@@\n@@\n");
    }

    /// Source that fails every read.
    #[derive(Debug)]
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "device gone"))
        }
    }

    impl Seek for Broken {
        fn seek(&mut self, _: SeekFrom) -> std::io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn read_error_stops_session() {
        let layout = FrameLayout::new(10, 8, 4, 2).unwrap();
        let mut session = PlaybackSession::with_layout(Broken, Vec::new(), layout);

        assert!(matches!(session.tick(), Err(PlaybackError::Read(_))));
        assert_eq!(session.state(), PlaybackState::Stopped);
        assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
        assert!(session.finish().is_empty());
    }

    #[test]
    fn read_error_during_setup() {
        let err = PlaybackSession::new(Broken, Vec::new(), &PlaybackConfig::new()).unwrap_err();
        assert!(matches!(err, PlaybackError::Read(_)));
    }
}

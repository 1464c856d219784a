//! Timer-driven playback.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::{PlaybackError, Result};
use crate::session::{PlaybackSession, TickOutcome};
use crate::source::FrameSource;

/// How a playback run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Frames written to the sink
    pub frames_drawn: u64,
    /// Whether the shutdown signal fired before the source ran out
    pub interrupted: bool,
}

/// Play `session` until the source is exhausted.
///
/// See [`play_until`].
pub async fn play<S: FrameSource, W: Write>(
    session: &mut PlaybackSession<S, W>,
    period: Duration,
) -> Result<PlaybackSummary> {
    play_until(session, period, std::future::pending::<()>()).await
}

/// Draw one frame per `period` until the source is exhausted or `shutdown`
/// completes, then write a single trailing newline.
///
/// The first frame is drawn one period after the call. Ticks run one after
/// another on the calling task; a tick that overruns its period delays the
/// following ones instead of causing a burst.
pub async fn play_until<S, W, F>(
    session: &mut PlaybackSession<S, W>,
    period: Duration,
    shutdown: F,
) -> Result<PlaybackSummary>
where
    S: FrameSource,
    W: Write,
    F: Future<Output = ()>,
{
    if period.is_zero() {
        return Err(PlaybackError::InvalidDelay);
    }

    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut interrupted = false;
    loop {
        tokio::select! {
            _ = timer.tick() => {
                if session.tick()? == TickOutcome::Finished {
                    break;
                }
            }
            _ = &mut shutdown => {
                tracing::info!(frames = session.frames_drawn(), "playback interrupted");
                interrupted = true;
                break;
            }
        }
    }

    let sink = session.sink_mut();
    sink.write_all(b"\n").map_err(PlaybackError::Write)?;
    sink.flush().map_err(PlaybackError::Write)?;

    Ok(PlaybackSummary {
        frames_drawn: session.frames_drawn(),
        interrupted,
    })
}

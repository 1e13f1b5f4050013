//! "Thinking..." spinner shown while a request is in flight.
//!
//! The animation runs as its own tokio task and redraws one line in place with
//! a carriage return. [`ProgressSession::stop`] cancels it and waits for the
//! task to finish, so nothing else is written to the terminal until the line
//! has been blanked.

use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One full animation cycle.
pub const FRAMES: [&str; 10] = [
    "[ ⠋ ]", "[ ⠙ ]", "[ ⠹ ]", "[ ⠸ ]", "[ ⠼ ]", "[ ⠴ ]", "[ ⠦ ]", "[ ⠧ ]", "[ ⠇ ]", "[ ⠏ ]",
];

/// Delay between frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

const LABEL: &str = "Thinking...";

/// Written once on stop: return, 40 blanks, return.
const CLEAR_LINE: &str = "\r                                        \r";

/// A running spinner. Must be stopped with [`ProgressSession::stop`] to
/// guarantee the line is cleared before further output.
pub struct ProgressSession {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressSession {
    /// Draw the first frame to `out`, then spawn the animation. The first
    /// frame is on screen by the time this returns.
    pub fn start<W>(mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        if let Err(e) = draw(&mut out, 0) {
            debug!("Spinner could not draw: {}", e);
        }
        let cancel = CancellationToken::new();
        let first_tick = Instant::now() + FRAME_INTERVAL;
        let handle = tokio::spawn(animate(out, cancel.clone(), first_tick));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Signal the animation to stop and wait until it has cleaned up.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("Spinner task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ProgressSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn draw<W: Write>(out: &mut W, idx: usize) -> std::io::Result<()> {
    write!(out, "\r{} {}", FRAMES[idx % FRAMES.len()], LABEL)?;
    out.flush()
}

async fn animate<W: Write>(mut out: W, cancel: CancellationToken, first_tick: Instant) {
    let mut ticker = tokio::time::interval_at(first_tick, FRAME_INTERVAL);
    let mut idx = 1;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if draw(&mut out, idx).is_err() {
                    // Terminal went away; treat as a normal stop.
                    break;
                }
                idx += 1;
            }
        }
    }

    let _ = out
        .write_all(CLEAR_LINE.as_bytes())
        .and_then(|_| out.flush());
}

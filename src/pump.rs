//! Event pump
//!
//! Reads newline-delimited JSON key events from an async reader and
//! delivers each one to a target, the way a host event loop would.
//! Malformed lines and failing handlers are logged and skipped.

use std::rc::Rc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::{debug, error, info, warn};

use crate::events::KeyEvent;
use crate::target::ListenerTarget;

/// Longest line accepted as a single event; at most this much is buffered per line
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Counters reported when the input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Events parsed and delivered
    pub delivered: u64,
    /// Lines that were not valid events
    pub malformed: u64,
    /// Deliveries where a handler returned an error
    pub failed: u64,
}

/// Feeds events from a line-oriented reader into a target
pub struct EventPump<R> {
    reader: R,
    target: Rc<ListenerTarget>,
}

impl<R> EventPump<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, target: Rc<ListenerTarget>) -> Self {
        Self { reader, target }
    }

    /// Pump until the reader reaches end of input
    pub async fn run(mut self) -> Result<PumpStats> {
        let mut stats = PumpStats::default();
        let mut buf = Vec::new();

        info!("event pump started");

        loop {
            buf.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_BYTES as u64 + 1)
                .read_until(b'\n', &mut buf)
                .await
                .context("failed to read event stream")?;
            if read == 0 {
                break;
            }

            if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_BYTES {
                let skipped = discard_line(&mut self.reader)
                    .await
                    .context("failed to read event stream")?;
                warn!(len = buf.len() + skipped, "event line too large, skipping");
                stats.malformed += 1;
                continue;
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!(?e, "event line is not UTF-8, skipping");
                    stats.malformed += 1;
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            let event: KeyEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    warn!(?e, "malformed key event, skipping");
                    stats.malformed += 1;
                    continue;
                }
            };

            debug!(key = %event.key, event_type = %event.event_type, "key event received");

            match self.target.dispatch_event(&event) {
                Ok(()) => stats.delivered += 1,
                Err(e) => {
                    error!(error = %e, key = %event.key, "key handler failed");
                    stats.failed += 1;
                }
            }
        }

        info!(?stats, "event pump reached end of input");
        Ok(stats)
    }
}

/// Consume the rest of the current line without buffering it
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut discarded = 0;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(discarded);
        }
        let (used, done) = match available.iter().position(|b| *b == b'\n') {
            Some(end) => (end + 1, true),
            None => (available.len(), false),
        };
        reader.consume(used);
        discarded += used;
        if done {
            return Ok(discarded);
        }
    }
}

//! Stop signals for the demo binary

use std::fmt;

use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Which signal ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Terminate,
    Interrupt,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopSignal::Terminate => write!(f, "SIGTERM"),
            StopSignal::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Waits for SIGTERM or SIGINT
#[derive(Debug, Default)]
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Resolve with the first stop signal received
    ///
    /// Fails if the signal handlers cannot be registered.
    pub async fn wait(&self) -> std::io::Result<StopSignal> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        let received = tokio::select! {
            _ = sigterm.recv() => StopSignal::Terminate,
            _ = sigint.recv() => StopSignal::Interrupt,
        };
        debug!(signal = %received, "stop signal received");
        Ok(received)
    }
}

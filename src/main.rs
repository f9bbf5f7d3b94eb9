//! keyhook: shortcut demo driven by a JSON key event stream
//!
//! Loads a shortcut file binding keys to named actions, attaches a
//! keyboard hook to the process-wide document target, and feeds it
//! newline-delimited JSON key events read from stdin. Every fired action
//! is written to stdout as one JSON line.
//!
//! Runs until stdin closes or SIGINT/SIGTERM arrives.

use anyhow::Result;
use serde::Serialize;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use keyhook::config::Config;
use keyhook::lifecycle::ShutdownSignal;
use keyhook::pump::EventPump;
use keyhook::{document, EventType, Keyboard};

/// One fired shortcut, as printed on stdout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FiredAction {
    action: String,
    key: String,
    event_type: EventType,
    default_prevented: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr, fired actions to stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "keyhook starting");

    let config = Config::load()?;
    let shortcuts = config.load_shortcuts()?;
    info!(
        path = %config.shortcuts_path.display(),
        shortcuts = shortcuts.listeners.len(),
        "configuration loaded"
    );

    // Shortcut callbacks -> stdout writer
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<FiredAction>();

    let props = shortcuts.to_props(move |action, event| {
        action_tx.send(FiredAction {
            action: action.to_string(),
            key: event.key.clone(),
            event_type: event.event_type,
            default_prevented: event.default_prevented(),
        })?;
        Ok(())
    });

    let manual = props.should_listen.is_none();
    let mut keyboard = Keyboard::new(props)?;
    if manual {
        keyboard.activate();
    }

    let shutdown = ShutdownSignal::new();
    let pump = EventPump::new(BufReader::new(tokio::io::stdin()), document());

    tokio::select! {
        result = pump.run() => {
            match result {
                Ok(stats) => info!(?stats, "input closed"),
                Err(e) => error!(?e, "event pump error"),
            }
        }

        _ = async {
            while let Some(fired) = action_rx.recv().await {
                print_action(&fired);
            }
        } => {
            info!("action channel closed");
        }

        result = shutdown.wait() => {
            match result {
                Ok(received) => info!(signal = %received, "shutdown signal received"),
                Err(e) => error!(?e, "failed to install signal handlers"),
            }
        }
    }

    // Flush actions fired by the last events before the pump finished
    while let Ok(fired) = action_rx.try_recv() {
        print_action(&fired);
    }

    keyboard.teardown();
    info!("keyhook stopped");

    Ok(())
}

fn print_action(fired: &FiredAction) {
    match serde_json::to_string(fired) {
        Ok(line) => println!("{line}"),
        Err(e) => error!(?e, "failed to encode fired action"),
    }
}

//! Error types for the keyboard hook

/// Errors raised while configuring or dispatching keyboard listeners
#[derive(Debug, thiserror::Error)]
pub enum KeyboardError {
    #[error("no event types configured - at least one of keydown, keyup, keypress is required")]
    NoEventTypes,

    #[error("invalid key declaration: {0}")]
    InvalidDeclaration(String),

    /// A registered callback failed; later callbacks for the event were skipped
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

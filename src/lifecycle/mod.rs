//! Hook lifecycle
//!
//! Provides the [`Keyboard`] hook with its activation state machine, the
//! props it is configured from, and process shutdown handling for the
//! event pump.

mod keyboard;
mod props;
mod shutdown;

pub use keyboard::{Keyboard, KeyboardHandlers};
pub use props::{KeyboardProps, ShouldListen};
pub use shutdown::{ShutdownSignal, StopSignal};

//! keyhook: declarative keyboard shortcuts with lifecycle-driven activation
//!
//! Components declare shortcuts as a list of entries or a key-name map.
//! Declarations are normalized into canonical keys, indexed into a
//! registry, and matched against key events by a single dispatch handler.
//! The [`Keyboard`] hook attaches that handler to a target's event-type
//! channels and detaches it again, driven by an optional `should_listen`
//! input and always on drop.
//!
//! ```
//! use std::rc::Rc;
//! use keyhook::{EventType, KeyCombo, KeyEvent, Keyboard, KeyboardProps, ListenerEntry, ListenerTarget, Modifiers};
//!
//! let target = Rc::new(ListenerTarget::new());
//! let keyboard = Keyboard::new(
//!     KeyboardProps::new(vec![ListenerEntry::new(KeyCombo::new("s").ctrl(), |_| Ok(()))])
//!         .with_should_listen(true)
//!         .with_target(target.clone()),
//! )?;
//! assert!(keyboard.is_active());
//!
//! let event = KeyEvent::new(EventType::KeyDown, "s").with_modifiers(Modifiers::NONE.with_ctrl(true));
//! target.dispatch_event(&event)?;
//! # Ok::<(), keyhook::KeyboardError>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod key;
pub mod lifecycle;
pub mod pump;
pub mod registry;
pub mod target;

pub use dispatch::{Dispatcher, EventListener};
pub use error::KeyboardError;
pub use events::{EventType, HandlerProp, KeyEvent};
pub use key::{CanonicalKey, KeyCombo, KeyDecl, KeyName, Modifiers};
pub use lifecycle::{Keyboard, KeyboardHandlers, KeyboardProps, ShouldListen};
pub use registry::{
    callback, Callback, ListenerEntry, ListenerMap, ListenerOptions, Listeners, MapListener,
    Registry,
};
pub use target::{document, EventTarget, ListenerTarget};

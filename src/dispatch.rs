//! Key event dispatch
//!
//! Matches an observed event against the registry and runs the matching
//! callbacks synchronously, in registration order.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::KeyboardError;
use crate::events::KeyEvent;
use crate::key::normalize_event;
use crate::registry::Registry;

/// A handler attachable to an event target
pub type EventListener = Rc<dyn Fn(&KeyEvent) -> Result<(), KeyboardError>>;

/// Dispatches events against one registry snapshot
#[derive(Clone)]
pub struct Dispatcher {
    registry: Rc<Registry>,
    prevent_default: bool,
}

impl Dispatcher {
    /// `prevent_default` suppresses the default action of every matched event
    pub fn new(registry: Registry, prevent_default: bool) -> Self {
        Self {
            registry: Rc::new(registry),
            prevent_default,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every callback registered for the event's key
    ///
    /// Returns how many callbacks ran. An unmatched event is not an error and
    /// leaves the event untouched. The first failing callback stops the pass
    /// and its error is returned.
    pub fn dispatch(&self, event: &KeyEvent) -> Result<usize, KeyboardError> {
        let key = normalize_event(event);
        let Some((callbacks, options)) = self.registry.get(&key) else {
            trace!(%key, "no listener for key");
            return Ok(0);
        };

        debug!(%key, event_type = %event.event_type, callbacks = callbacks.len(), "dispatching key event");

        if self.prevent_default {
            event.prevent_default();
        }

        for (callback, options) in callbacks.iter().zip(options) {
            if options.prevent_default {
                event.prevent_default();
            }
            callback(event)?;
        }

        Ok(callbacks.len())
    }

    /// Shareable handler for attaching to targets or wiring into element props
    pub fn into_listener(self) -> EventListener {
        Rc::new(move |event: &KeyEvent| self.dispatch(event).map(|_| ()))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("prevent_default", &self.prevent_default)
            .finish()
    }
}

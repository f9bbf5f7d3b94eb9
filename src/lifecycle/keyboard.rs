//! The keyboard hook
//!
//! Owns the registry built from its props, the dispatch handler, and an
//! explicit activation state machine (Inactive -> Active -> Inactive).
//! Attach and detach are idempotent, and dropping the hook always detaches.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use super::props::KeyboardProps;
use crate::dispatch::{Dispatcher, EventListener};
use crate::error::KeyboardError;
use crate::events::{EventType, HandlerProp};
use crate::registry::Registry;
use crate::target::{document, EventTarget};

/// Where and how the handler is currently attached
struct Attachment {
    target: Rc<dyn EventTarget>,
    event_types: Vec<EventType>,
    listener: EventListener,
}

/// Activation state of a hook
enum Activation {
    Inactive,
    Active(Attachment),
}

/// Element-prop name to handler, one entry per configured event type
#[derive(Clone, Default)]
pub struct KeyboardHandlers(BTreeMap<HandlerProp, EventListener>);

impl KeyboardHandlers {
    pub fn get(&self, prop: HandlerProp) -> Option<&EventListener> {
        self.0.get(&prop)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandlerProp, &EventListener)> {
        self.0.iter().map(|(prop, listener)| (*prop, listener))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyboardHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Declarative keyboard shortcuts bound to a target
pub struct Keyboard {
    props: KeyboardProps,
    listener: EventListener,
    activation: Activation,
}

impl Keyboard {
    /// Build the hook and apply its `should_listen` input
    ///
    /// Fails with [`KeyboardError::NoEventTypes`] if no channel is configured.
    pub fn new(props: KeyboardProps) -> Result<Self, KeyboardError> {
        let props = props.validate()?;
        let listener = build_listener(&props);

        let mut keyboard = Self {
            props,
            listener,
            activation: Activation::Inactive,
        };
        keyboard.reconcile();
        Ok(keyboard)
    }

    /// Raw handler, usable for direct wiring into element callbacks
    pub fn event_listener(&self) -> EventListener {
        Rc::clone(&self.listener)
    }

    /// The handler keyed by element prop (`onKeyDown`, ...) for each configured channel
    pub fn keyboard_handlers(&self) -> KeyboardHandlers {
        KeyboardHandlers(
            self.props
                .event_types
                .iter()
                .map(|event_type| (event_type.handler_prop(), Rc::clone(&self.listener)))
                .collect(),
        )
    }

    pub fn props(&self) -> &KeyboardProps {
        &self.props
    }

    pub fn is_active(&self) -> bool {
        matches!(self.activation, Activation::Active(_))
    }

    /// Attach the handler to every configured channel. No-op when already active.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }

        let target = self.resolve_target();
        let event_types = self.props.event_types.clone();
        for event_type in &event_types {
            target.add_event_listener(*event_type, &self.listener);
        }

        info!(?event_types, "keyboard listener attached");
        self.activation = Activation::Active(Attachment {
            target,
            event_types,
            listener: Rc::clone(&self.listener),
        });
    }

    /// Detach the handler from the channels it was attached to. No-op when inactive.
    pub fn deactivate(&mut self) {
        let Activation::Active(attachment) =
            std::mem::replace(&mut self.activation, Activation::Inactive)
        else {
            return;
        };

        for event_type in &attachment.event_types {
            attachment
                .target
                .remove_event_listener(*event_type, &attachment.listener);
        }
        info!(event_types = ?attachment.event_types, "keyboard listener detached");
    }

    /// Apply the `should_listen` input; does nothing when activation is manual
    pub fn reconcile(&mut self) {
        if let Some(should_listen) = &self.props.should_listen {
            let listen = should_listen.evaluate();
            self.reconcile_to(listen);
        }
    }

    /// Drive activation to an explicit value
    pub fn reconcile_to(&mut self, listen: bool) {
        if listen {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    /// Replace the configuration, rebuilding the registry from scratch
    ///
    /// The stale handler is detached. An active hook with manual activation
    /// stays active with the new handler; otherwise `should_listen` decides.
    /// Invalid props are rejected and the current configuration is kept.
    pub fn set_props(&mut self, props: KeyboardProps) -> Result<(), KeyboardError> {
        let props = props.validate()?;
        let was_active = self.is_active();

        self.deactivate();
        self.listener = build_listener(&props);
        self.props = props;
        debug!(was_active, "keyboard props replaced");

        let listen = match &self.props.should_listen {
            Some(should_listen) => should_listen.evaluate(),
            None => was_active,
        };
        self.reconcile_to(listen);
        Ok(())
    }

    /// Unconditionally detach, regardless of `should_listen`
    pub fn teardown(&mut self) {
        self.deactivate();
    }

    fn resolve_target(&self) -> Rc<dyn EventTarget> {
        match &self.props.target {
            Some(target) => Rc::clone(target),
            None => document(),
        }
    }
}

impl Drop for Keyboard {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyboard")
            .field("props", &self.props)
            .field("active", &self.is_active())
            .finish()
    }
}

fn build_listener(props: &KeyboardProps) -> EventListener {
    let registry = Registry::build(&props.listeners);
    info!(keys = registry.len(), "keyboard registry rebuilt");
    Dispatcher::new(registry, props.prevent_default).into_listener()
}

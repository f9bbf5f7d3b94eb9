//! Keyboard event types
//!
//! Provides the runtime key event delivered by a target, and the event-type
//! channels (keydown, keyup, keypress) a handler can be attached to.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::key::Modifiers;

/// Event-type channel a handler can be attached to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Key pressed down
    #[default]
    KeyDown,
    /// Key released
    KeyUp,
    /// Character-producing key pressed
    KeyPress,
}

impl EventType {
    /// Every supported channel, in declaration order
    pub const ALL: [EventType; 3] = [EventType::KeyDown, EventType::KeyUp, EventType::KeyPress];

    /// Name of the element prop this channel is wired through
    pub fn handler_prop(&self) -> HandlerProp {
        match self {
            EventType::KeyDown => HandlerProp::OnKeyDown,
            EventType::KeyUp => HandlerProp::OnKeyUp,
            EventType::KeyPress => HandlerProp::OnKeyPress,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::KeyDown => write!(f, "keydown"),
            EventType::KeyUp => write!(f, "keyup"),
            EventType::KeyPress => write!(f, "keypress"),
        }
    }
}

/// Element prop names, used as keys of [`crate::KeyboardHandlers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandlerProp {
    #[serde(rename = "onKeyDown")]
    OnKeyDown,
    #[serde(rename = "onKeyUp")]
    OnKeyUp,
    #[serde(rename = "onKeyPress")]
    OnKeyPress,
}

impl std::fmt::Display for HandlerProp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerProp::OnKeyDown => write!(f, "onKeyDown"),
            HandlerProp::OnKeyUp => write!(f, "onKeyUp"),
            HandlerProp::OnKeyPress => write!(f, "onKeyPress"),
        }
    }
}

/// A key event observed on a target
///
/// On the wire the modifier fields are `altKey`, `ctrlKey`, `shiftKey` and
/// `metaKey`; missing fields are `false` and a missing `type` is `keydown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    pub key: String,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(skip)]
    default_prevented: Cell<bool>,
}

impl KeyEvent {
    /// Create an event with no modifiers held
    pub fn new(event_type: EventType, key: impl Into<String>) -> Self {
        Self {
            event_type,
            key: key.into(),
            ..Default::default()
        }
    }

    /// Replace the modifier state of this event
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.alt_key = modifiers.alt;
        self.ctrl_key = modifiers.ctrl;
        self.shift_key = modifiers.shift;
        self.meta_key = modifiers.meta;
        self
    }

    /// Modifier state carried by this event
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            alt: self.alt_key,
            ctrl: self.ctrl_key,
            shift: self.shift_key,
            meta: self.meta_key,
        }
    }

    /// Suppress the default action. Calling this more than once has no further effect.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization_defaults() {
        let event: KeyEvent = serde_json::from_str(r#"{"key":"Enter"}"#).unwrap();
        assert_eq!(event.event_type, EventType::KeyDown);
        assert_eq!(event.key, "Enter");
        assert!(event.modifiers().is_empty());
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_event_deserialization_modifiers() {
        let json = r#"{"type":"keyup","key":"ArrowUp","ctrlKey":true,"metaKey":true}"#;
        let event: KeyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::KeyUp);
        assert!(event.ctrl_key);
        assert!(event.meta_key);
        assert!(!event.alt_key);
    }

    #[test]
    fn test_event_serialization_skips_prevented_flag() {
        let event = KeyEvent::new(EventType::KeyPress, "a");
        event.prevent_default();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"keypress\""));
        assert!(!json.contains("prevented"));
    }

    #[test]
    fn test_prevent_default_is_idempotent() {
        let event = KeyEvent::new(EventType::KeyDown, "a");
        event.prevent_default();
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_handler_props() {
        assert_eq!(EventType::KeyDown.handler_prop().to_string(), "onKeyDown");
        assert_eq!(EventType::KeyUp.handler_prop().to_string(), "onKeyUp");
        assert_eq!(EventType::KeyPress.handler_prop().to_string(), "onKeyPress");
    }
}

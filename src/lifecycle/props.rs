//! Hook configuration

use std::fmt;
use std::rc::Rc;

use crate::error::KeyboardError;
use crate::events::EventType;
use crate::registry::Listeners;
use crate::target::EventTarget;

/// Automatic activation input, evaluated on every configuration change
#[derive(Clone)]
pub enum ShouldListen {
    Flag(bool),
    Predicate(Rc<dyn Fn() -> bool>),
}

impl ShouldListen {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        ShouldListen::Predicate(Rc::new(f))
    }

    pub fn evaluate(&self) -> bool {
        match self {
            ShouldListen::Flag(flag) => *flag,
            ShouldListen::Predicate(predicate) => predicate(),
        }
    }
}

impl From<bool> for ShouldListen {
    fn from(flag: bool) -> Self {
        ShouldListen::Flag(flag)
    }
}

impl fmt::Debug for ShouldListen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShouldListen::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            ShouldListen::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Everything a [`Keyboard`](super::Keyboard) hook is built from
#[derive(Clone)]
pub struct KeyboardProps {
    pub listeners: Listeners,
    /// Channels the handler is attached to; must not be empty
    pub event_types: Vec<EventType>,
    /// `None` leaves activation to explicit `activate`/`deactivate` calls
    pub should_listen: Option<ShouldListen>,
    /// `None` attaches to the thread's [`document`](crate::target::document)
    pub target: Option<Rc<dyn EventTarget>>,
    /// Suppress the default action of every matched event
    pub prevent_default: bool,
}

impl KeyboardProps {
    /// Listen on keydown only, manual activation, default target
    pub fn new(listeners: impl Into<Listeners>) -> Self {
        Self {
            listeners: listeners.into(),
            event_types: vec![EventType::KeyDown],
            should_listen: None,
            target: None,
            prevent_default: false,
        }
    }

    pub fn with_event_types(mut self, event_types: impl Into<Vec<EventType>>) -> Self {
        self.event_types = event_types.into();
        self
    }

    pub fn with_should_listen(mut self, should_listen: impl Into<ShouldListen>) -> Self {
        self.should_listen = Some(should_listen.into());
        self
    }

    pub fn with_target(mut self, target: Rc<dyn EventTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = prevent_default;
        self
    }

    /// Reject configurations that would attach nothing; drop repeated channels
    pub(crate) fn validate(mut self) -> Result<Self, KeyboardError> {
        if self.event_types.is_empty() {
            return Err(KeyboardError::NoEventTypes);
        }
        let mut seen = Vec::with_capacity(self.event_types.len());
        self.event_types.retain(|event_type| {
            if seen.contains(event_type) {
                false
            } else {
                seen.push(*event_type);
                true
            }
        });
        Ok(self)
    }
}

impl fmt::Debug for KeyboardProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardProps")
            .field("listeners", &self.listeners)
            .field("event_types", &self.event_types)
            .field("should_listen", &self.should_listen)
            .field("target", &self.target.as_ref().map(|_| ".."))
            .field("prevent_default", &self.prevent_default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_defaults() {
        let props = KeyboardProps::new(Listeners::default());
        assert_eq!(props.event_types, vec![EventType::KeyDown]);
        assert!(props.should_listen.is_none());
        assert!(props.target.is_none());
        assert!(!props.prevent_default);
    }

    #[test]
    fn test_empty_event_types_rejected() {
        let err = KeyboardProps::new(Listeners::default())
            .with_event_types(Vec::<EventType>::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, KeyboardError::NoEventTypes));
    }

    #[test]
    fn test_repeated_event_types_collapse() {
        let props = KeyboardProps::new(Listeners::default())
            .with_event_types([EventType::KeyUp, EventType::KeyDown, EventType::KeyUp])
            .validate()
            .unwrap();
        assert_eq!(props.event_types, vec![EventType::KeyUp, EventType::KeyDown]);
    }

    #[test]
    fn test_predicate_is_evaluated_each_time() {
        let flag = Rc::new(Cell::new(false));
        let source = Rc::clone(&flag);
        let should_listen = ShouldListen::predicate(move || source.get());
        assert!(!should_listen.evaluate());
        flag.set(true);
        assert!(should_listen.evaluate());
    }
}

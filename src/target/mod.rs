//! Event targets
//!
//! A target is anything handlers can be attached to per event-type channel.
//! [`ListenerTarget`] is the in-process implementation; [`document`] returns
//! the thread's default target, used when a hook names no target of its own.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dispatch::EventListener;
use crate::error::KeyboardError;
use crate::events::{EventType, KeyEvent};

/// Something key handlers can be attached to
///
/// Handlers are identified by pointer identity of the shared [`EventListener`].
pub trait EventTarget {
    fn add_event_listener(&self, event_type: EventType, listener: &EventListener);
    fn remove_event_listener(&self, event_type: EventType, listener: &EventListener);
}

/// In-process target that fans events out to its attached handlers
#[derive(Default)]
pub struct ListenerTarget {
    listeners: RefCell<Vec<(EventType, EventListener)>>,
}

impl ListenerTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to the handlers attached for its type, in attachment order
    ///
    /// Handlers attached while the event is in flight do not see it; handlers
    /// detached by an earlier handler are skipped. Stops at the first handler
    /// error and returns it.
    pub fn dispatch_event(&self, event: &KeyEvent) -> Result<(), KeyboardError> {
        // Snapshot so handlers may attach or detach while running
        let handlers: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(event_type, _)| *event_type == event.event_type)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        trace!(key = %event.key, event_type = %event.event_type, handlers = handlers.len(), "delivering event");

        for handler in handlers {
            if !self.is_attached(event.event_type, &handler) {
                trace!(key = %event.key, "handler detached mid-dispatch, skipping");
                continue;
            }
            handler(event)?;
        }
        Ok(())
    }

    fn is_attached(&self, event_type: EventType, listener: &EventListener) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(kind, existing)| *kind == event_type && Rc::ptr_eq(existing, listener))
    }

    /// Number of handlers attached for a channel
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == event_type)
            .count()
    }
}

impl EventTarget for ListenerTarget {
    fn add_event_listener(&self, event_type: EventType, listener: &EventListener) {
        let mut listeners = self.listeners.borrow_mut();
        let exists = listeners
            .iter()
            .any(|(kind, existing)| *kind == event_type && Rc::ptr_eq(existing, listener));
        if !exists {
            listeners.push((event_type, Rc::clone(listener)));
        }
    }

    fn remove_event_listener(&self, event_type: EventType, listener: &EventListener) {
        self.listeners
            .borrow_mut()
            .retain(|(kind, existing)| !(*kind == event_type && Rc::ptr_eq(existing, listener)));
    }
}

impl fmt::Debug for ListenerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTarget")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

thread_local! {
    static DOCUMENT: Rc<ListenerTarget> = Rc::new(ListenerTarget::new());
}

/// The default target shared by every hook on this thread
pub fn document() -> Rc<ListenerTarget> {
    DOCUMENT.with(Rc::clone)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counting_listener(calls: &Rc<Cell<u32>>) -> EventListener {
        let calls = Rc::clone(calls);
        Rc::new(move |_: &KeyEvent| {
            calls.set(calls.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_delivers_by_event_type() {
        let target = ListenerTarget::new();
        let calls = Rc::new(Cell::new(0));
        let listener = counting_listener(&calls);
        target.add_event_listener(EventType::KeyUp, &listener);

        target
            .dispatch_event(&KeyEvent::new(EventType::KeyDown, "a"))
            .unwrap();
        assert_eq!(calls.get(), 0);

        target
            .dispatch_event(&KeyEvent::new(EventType::KeyUp, "a"))
            .unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_add_same_listener_twice_attaches_once() {
        let target = ListenerTarget::new();
        let calls = Rc::new(Cell::new(0));
        let listener = counting_listener(&calls);
        target.add_event_listener(EventType::KeyDown, &listener);
        target.add_event_listener(EventType::KeyDown, &listener);
        assert_eq!(target.listener_count(EventType::KeyDown), 1);

        target.remove_event_listener(EventType::KeyDown, &listener);
        assert_eq!(target.listener_count(EventType::KeyDown), 0);
    }

    #[test]
    fn test_remove_only_matches_identity() {
        let target = ListenerTarget::new();
        let calls = Rc::new(Cell::new(0));
        let kept = counting_listener(&calls);
        let other = counting_listener(&calls);
        target.add_event_listener(EventType::KeyDown, &kept);
        target.remove_event_listener(EventType::KeyDown, &other);
        assert_eq!(target.listener_count(EventType::KeyDown), 1);
    }

    #[test]
    fn test_handler_error_propagates() {
        let target = ListenerTarget::new();
        let failing: EventListener =
            Rc::new(|_: &KeyEvent| Err(KeyboardError::from(anyhow::anyhow!("nope"))));
        target.add_event_listener(EventType::KeyDown, &failing);

        let err = target
            .dispatch_event(&KeyEvent::new(EventType::KeyDown, "a"))
            .unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_handler_detached_mid_dispatch_is_skipped() {
        let target = Rc::new(ListenerTarget::new());
        let calls = Rc::new(Cell::new(0));
        let later = counting_listener(&calls);

        let remover_target = Rc::clone(&target);
        let remover_victim = Rc::clone(&later);
        let remover: EventListener = Rc::new(move |_: &KeyEvent| {
            remover_target.remove_event_listener(EventType::KeyDown, &remover_victim);
            Ok(())
        });

        target.add_event_listener(EventType::KeyDown, &remover);
        target.add_event_listener(EventType::KeyDown, &later);

        target
            .dispatch_event(&KeyEvent::new(EventType::KeyDown, "Escape"))
            .unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(target.listener_count(EventType::KeyDown), 1);
    }

    #[test]
    fn test_handler_attached_mid_dispatch_waits_for_next_event() {
        let target = Rc::new(ListenerTarget::new());
        let calls = Rc::new(Cell::new(0));
        let late = counting_listener(&calls);

        let adder_target = Rc::clone(&target);
        let adder_late = Rc::clone(&late);
        let adder: EventListener = Rc::new(move |_: &KeyEvent| {
            adder_target.add_event_listener(EventType::KeyDown, &adder_late);
            Ok(())
        });
        target.add_event_listener(EventType::KeyDown, &adder);

        let event = KeyEvent::new(EventType::KeyDown, "a");
        target.dispatch_event(&event).unwrap();
        assert_eq!(calls.get(), 0);

        target.dispatch_event(&event).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_document_is_shared_per_thread() {
        assert!(Rc::ptr_eq(&document(), &document()));
    }
}

//! Listener registry
//!
//! Indexes callbacks by canonical key. Each key maps to an ordered list of
//! callbacks and a parallel, index-aligned list of their options. Entries
//! accumulate in declaration order and are only dropped by a full rebuild.

mod listeners;

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::key::{CanonicalKey, KeyDecl};

pub use listeners::{
    callback, Callback, ListenerEntry, ListenerMap, ListenerOptions, Listeners, MapListener,
};

/// Canonical key to ordered callbacks and their options
#[derive(Clone, Default)]
pub struct Registry {
    callbacks: HashMap<CanonicalKey, Vec<Callback>>,
    options: HashMap<CanonicalKey, Vec<ListenerOptions>>,
}

impl Registry {
    /// Build a registry from a listener configuration
    ///
    /// List entries expand to one registration per key they name. Map
    /// entries are bare key names with no modifiers.
    pub fn build(listeners: &Listeners) -> Self {
        let mut registry = Self::default();

        match listeners {
            Listeners::List(entries) => {
                for entry in entries {
                    for key in entry.key.canonical_keys() {
                        registry.add(key, entry.callback.clone(), entry.options);
                    }
                }
            }
            Listeners::Map(map) => {
                for (name, listener) in map.iter() {
                    for key in KeyDecl::from(name).canonical_keys() {
                        registry.add(key, listener.callback().clone(), listener.options());
                    }
                }
            }
        }

        debug!(keys = registry.len(), "listener registry built");
        registry
    }

    fn add(&mut self, key: CanonicalKey, callback: Callback, options: ListenerOptions) {
        self.callbacks.entry(key.clone()).or_default().push(callback);
        self.options.entry(key).or_default().push(options);
    }

    /// Callbacks and their options registered for a key, in declaration order
    pub fn get(&self, key: &CanonicalKey) -> Option<(&[Callback], &[ListenerOptions])> {
        let callbacks = self.callbacks.get(key)?;
        let options = self.options.get(key)?;
        Some((callbacks.as_slice(), options.as_slice()))
    }

    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.callbacks.contains_key(key)
    }

    /// Number of distinct canonical keys
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.callbacks.keys()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.options.iter().map(|(key, options)| (key.as_str(), options)))
            .finish()
    }
}

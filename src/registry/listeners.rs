//! Listener configuration as declared by the caller

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::events::KeyEvent;
use crate::key::KeyDecl;

/// A shortcut callback. Returning an error aborts the remaining callbacks for the event.
pub type Callback = Rc<dyn Fn(&KeyEvent) -> anyhow::Result<()>>;

/// Wrap a closure as a [`Callback`]
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&KeyEvent) -> anyhow::Result<()> + 'static,
{
    Rc::new(f)
}

/// Per-callback options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListenerOptions {
    /// Suppress the event's default action before this callback runs
    pub prevent_default: bool,
}

impl ListenerOptions {
    pub fn preventing_default() -> Self {
        Self {
            prevent_default: true,
        }
    }
}

/// One declared (key, callback, options) association
#[derive(Clone)]
pub struct ListenerEntry {
    pub key: KeyDecl,
    pub callback: Callback,
    pub options: ListenerOptions,
}

impl ListenerEntry {
    pub fn new<F>(key: impl Into<KeyDecl>, f: F) -> Self
    where
        F: Fn(&KeyEvent) -> anyhow::Result<()> + 'static,
    {
        Self {
            key: key.into(),
            callback: Rc::new(f),
            options: ListenerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ListenerOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("key", &self.key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Value side of the map shorthand
#[derive(Clone)]
pub enum MapListener {
    /// Bare callback, default options
    Callback(Callback),
    /// Callback with explicit options
    WithOptions {
        callback: Callback,
        options: ListenerOptions,
    },
}

impl MapListener {
    pub fn callback(&self) -> &Callback {
        match self {
            MapListener::Callback(callback) => callback,
            MapListener::WithOptions { callback, .. } => callback,
        }
    }

    pub fn options(&self) -> ListenerOptions {
        match self {
            MapListener::Callback(_) => ListenerOptions::default(),
            MapListener::WithOptions { options, .. } => *options,
        }
    }
}

impl From<Callback> for MapListener {
    fn from(callback: Callback) -> Self {
        MapListener::Callback(callback)
    }
}

/// Map shorthand: bare key name to callback, in insertion order
///
/// Names are unique; inserting an existing name replaces its value but keeps
/// its original position.
#[derive(Clone, Default)]
pub struct ListenerMap {
    entries: Vec<(String, MapListener)>,
}

impl ListenerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, listener: impl Into<MapListener>) {
        let name = name.into();
        let listener = listener.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = listener,
            None => self.entries.push((name, listener)),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, listener: impl Into<MapListener>) -> Self {
        self.insert(name, listener);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MapListener)> {
        self.entries.iter().map(|(name, listener)| (name.as_str(), listener))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ListenerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Listener configuration: an ordered list of entries or the map shorthand
#[derive(Debug, Clone)]
pub enum Listeners {
    List(Vec<ListenerEntry>),
    Map(ListenerMap),
}

impl Default for Listeners {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<Vec<ListenerEntry>> for Listeners {
    fn from(entries: Vec<ListenerEntry>) -> Self {
        Listeners::List(entries)
    }
}

impl From<ListenerMap> for Listeners {
    fn from(map: ListenerMap) -> Self {
        Listeners::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Callback {
        callback(|_| Ok(()))
    }

    #[test]
    fn test_options_deserialization() {
        let options: ListenerOptions = serde_json::from_str(r#"{"preventDefault":true}"#).unwrap();
        assert!(options.prevent_default);

        let options: ListenerOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.prevent_default);
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let map = ListenerMap::new()
            .with("Enter", noop())
            .with("Escape", noop())
            .with("ArrowDown", noop());
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Enter", "Escape", "ArrowDown"]);
    }

    #[test]
    fn test_map_replace_keeps_position() {
        let mut map = ListenerMap::new().with("a", noop()).with("b", noop());
        map.insert(
            "a",
            MapListener::WithOptions {
                callback: noop(),
                options: ListenerOptions::preventing_default(),
            },
        );
        assert_eq!(map.len(), 2);
        let (name, listener) = map.iter().next().unwrap();
        assert_eq!(name, "a");
        assert!(listener.options().prevent_default);
    }

    #[test]
    fn test_bare_map_listener_has_default_options() {
        let listener = MapListener::from(noop());
        assert_eq!(listener.options(), ListenerOptions::default());
    }
}

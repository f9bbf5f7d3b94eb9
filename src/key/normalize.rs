//! Shortcut declarations and their canonical form
//!
//! Every declaration shape (bare name, list of names, key+modifier combo)
//! and every runtime event resolves to one or more [`CanonicalKey`]s. Two
//! inputs naming the same key with the same modifier truth values always
//! produce equal canonical keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Modifiers;
use crate::error::KeyboardError;
use crate::events::KeyEvent;

/// Object fields that only runtime events carry
const EVENT_FIELDS: [&str; 4] = ["altKey", "ctrlKey", "shiftKey", "metaKey"];

/// Lookup key encoding a key name plus its full modifier state
///
/// Rendered as `key,alt,ctrl,shift,meta`, e.g. `ArrowUp,false,true,false,false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self(format!(
            "{},{},{},{},{}",
            key, modifiers.alt, modifiers.ctrl, modifiers.shift, modifiers.meta
        ))
    }

    /// Canonical key of an observed event
    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(&event.key, event.modifiers())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One key name or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyName {
    One(String),
    Many(Vec<String>),
}

impl KeyName {
    fn names(&self) -> &[String] {
        match self {
            KeyName::One(name) => std::slice::from_ref(name),
            KeyName::Many(names) => names,
        }
    }
}

impl From<&str> for KeyName {
    fn from(name: &str) -> Self {
        KeyName::One(name.to_string())
    }
}

impl From<String> for KeyName {
    fn from(name: String) -> Self {
        KeyName::One(name)
    }
}

impl<S: Into<String>> From<Vec<S>> for KeyName {
    fn from(names: Vec<S>) -> Self {
        KeyName::Many(names.into_iter().map(Into::into).collect())
    }
}

/// Key name(s) with required modifier state; unset modifiers are `false`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    pub key: KeyName,
    #[serde(flatten)]
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: impl Into<KeyName>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }
}

/// A shortcut declaration as written by the caller
///
/// A bare string is always a literal key name; strings like `"ctrl+k"` are
/// not parsed into modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyDecl {
    /// A single key, no modifiers
    Name(String),
    /// Several keys, no modifiers
    Names(Vec<String>),
    /// One or more keys sharing a modifier state
    Combo(KeyCombo),
}

impl KeyDecl {
    /// One canonical key per key name in the declaration
    pub fn canonical_keys(&self) -> Vec<CanonicalKey> {
        let (names, modifiers) = match self {
            KeyDecl::Name(name) => (std::slice::from_ref(name), Modifiers::NONE),
            KeyDecl::Names(names) => (names.as_slice(), Modifiers::NONE),
            KeyDecl::Combo(combo) => (combo.key.names(), combo.modifiers),
        };
        names
            .iter()
            .map(|name| CanonicalKey::new(name, modifiers))
            .collect()
    }
}

impl From<&str> for KeyDecl {
    fn from(name: &str) -> Self {
        KeyDecl::Name(name.to_string())
    }
}

impl From<String> for KeyDecl {
    fn from(name: String) -> Self {
        KeyDecl::Name(name)
    }
}

impl<S: Into<String>> From<Vec<S>> for KeyDecl {
    fn from(names: Vec<S>) -> Self {
        KeyDecl::Names(names.into_iter().map(Into::into).collect())
    }
}

impl From<KeyCombo> for KeyDecl {
    fn from(combo: KeyCombo) -> Self {
        KeyDecl::Combo(combo)
    }
}

/// Canonical keys for a declaration
pub fn normalize(decl: &KeyDecl) -> Vec<CanonicalKey> {
    decl.canonical_keys()
}

/// Canonical key for an observed event
pub fn normalize_event(event: &KeyEvent) -> CanonicalKey {
    CanonicalKey::from_event(event)
}

/// Canonical keys for a dynamically shaped JSON value
///
/// An object carrying any of `altKey`, `ctrlKey`, `shiftKey` or `metaKey` is
/// read as an event and yields exactly one key, even if it also carries
/// declaration fields. Anything else must be a declaration.
pub fn normalize_value(value: &Value) -> Result<Vec<CanonicalKey>, KeyboardError> {
    let is_event = value
        .as_object()
        .is_some_and(|obj| EVENT_FIELDS.iter().any(|field| obj.contains_key(*field)));

    if is_event {
        let event: KeyEvent = serde_json::from_value(value.clone())
            .map_err(|e| KeyboardError::InvalidDeclaration(format!("{value}: {e}")))?;
        return Ok(vec![normalize_event(&event)]);
    }

    let decl: KeyDecl = serde_json::from_value(value.clone())
        .map_err(|e| KeyboardError::InvalidDeclaration(format!("{value}: {e}")))?;
    Ok(normalize(&decl))
}

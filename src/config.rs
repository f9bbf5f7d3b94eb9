//! Configuration loading and management
//!
//! The shortcut file binds key declarations to named actions. It mirrors
//! [`KeyboardProps`] field for field, with action names standing in for
//! callbacks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::events::{EventType, KeyEvent};
use crate::key::KeyDecl;
use crate::lifecycle::KeyboardProps;
use crate::registry::{
    Callback, ListenerEntry, ListenerMap, ListenerOptions, Listeners, MapListener,
};

/// Environment variable overriding the shortcut file location
pub const CONFIG_ENV: &str = "KEYHOOK_CONFIG";

const MAX_SHORTCUT_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("neither {} nor HOME is set", CONFIG_ENV)]
    NoConfigPath,

    #[error("refusing to read {}: file too large ({size} bytes, max {max})", .path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Demo configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON shortcut file
    pub shortcuts_path: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(Self {
                shortcuts_path: PathBuf::from(path),
            });
        }

        let home = std::env::var("HOME").map_err(|_| ConfigError::NoConfigPath)?;
        let shortcuts_path = PathBuf::from(home)
            .join(".config")
            .join("keyhook")
            .join("shortcuts.json");

        Ok(Self { shortcuts_path })
    }

    /// Read the shortcut file; a missing file yields an empty shortcut set
    pub fn load_shortcuts(&self) -> Result<ShortcutFile, ConfigError> {
        let path = &self.shortcuts_path;
        if !path.exists() {
            warn!(path = %path.display(), "shortcut file not found, no shortcuts bound");
            return Ok(ShortcutFile::default());
        }
        ShortcutFile::read(path)
    }
}

/// Parsed shortcut file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutFile {
    #[serde(default = "default_event_types")]
    pub event_types: Vec<EventType>,
    #[serde(default)]
    pub prevent_default: bool,
    #[serde(default)]
    pub should_listen: Option<bool>,
    #[serde(default)]
    pub listeners: ShortcutListeners,
}

fn default_event_types() -> Vec<EventType> {
    vec![EventType::KeyDown]
}

impl Default for ShortcutFile {
    fn default() -> Self {
        Self {
            event_types: default_event_types(),
            prevent_default: false,
            should_listen: None,
            listeners: ShortcutListeners::default(),
        }
    }
}

impl ShortcutFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > MAX_SHORTCUT_FILE_BYTES {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size,
                max: MAX_SHORTCUT_FILE_BYTES,
            });
        }

        let content = std::fs::read_to_string(path).map_err(io_err)?;
        let file = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), actions = file.listeners.len(), "shortcut file loaded");
        Ok(file)
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Build hook props whose callbacks report the bound action through `fire`
    pub fn to_props<F>(&self, fire: F) -> KeyboardProps
    where
        F: Fn(&str, &KeyEvent) -> anyhow::Result<()> + 'static,
    {
        let fire = Rc::new(fire);
        let bind = |action: &str| -> Callback {
            let fire = Rc::clone(&fire);
            let action = action.to_string();
            Rc::new(move |event: &KeyEvent| fire(action.as_str(), event))
        };

        let listeners = match &self.listeners {
            ShortcutListeners::List(entries) => Listeners::List(
                entries
                    .iter()
                    .map(|entry| ListenerEntry {
                        key: entry.key.clone(),
                        callback: bind(&entry.action),
                        options: entry.options,
                    })
                    .collect(),
            ),
            ShortcutListeners::Map(map) => {
                let mut listeners = ListenerMap::new();
                for (name, spec) in &map.0 {
                    let listener = match spec {
                        ActionSpec::Name(action) => MapListener::Callback(bind(action)),
                        ActionSpec::WithOptions { action, options } => MapListener::WithOptions {
                            callback: bind(action),
                            options: *options,
                        },
                    };
                    listeners.insert(name.clone(), listener);
                }
                Listeners::Map(listeners)
            }
        };

        let mut props = KeyboardProps::new(listeners)
            .with_event_types(self.event_types.clone())
            .with_prevent_default(self.prevent_default);
        if let Some(should_listen) = self.should_listen {
            props = props.with_should_listen(should_listen);
        }
        props
    }
}

/// Listener section of the shortcut file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShortcutListeners {
    List(Vec<ShortcutEntry>),
    Map(ActionMap),
}

impl ShortcutListeners {
    pub fn len(&self) -> usize {
        match self {
            ShortcutListeners::List(entries) => entries.len(),
            ShortcutListeners::Map(map) => map.0.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ShortcutListeners {
    fn default() -> Self {
        ShortcutListeners::List(Vec::new())
    }
}

/// `{"key": ..., "action": "...", "options": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ShortcutEntry {
    pub key: KeyDecl,
    pub action: String,
    #[serde(default)]
    pub options: ListenerOptions,
}

/// Map value: an action name, or an action with options
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActionSpec {
    Name(String),
    WithOptions {
        action: String,
        #[serde(default)]
        options: ListenerOptions,
    },
}

/// Key name to action, in document order
#[derive(Debug, Clone, Default)]
pub struct ActionMap(pub Vec<(String, ActionSpec)>);

impl<'de> Deserialize<'de> for ActionMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ActionMapVisitor;

        impl<'de> Visitor<'de> for ActionMapVisitor {
            type Value = ActionMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from key name to action")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, spec)) = access.next_entry::<String, ActionSpec>()? {
                    entries.push((name, spec));
                }
                Ok(ActionMap(entries))
            }
        }

        deserializer.deserialize_map(ActionMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::key::Modifiers;
    use crate::registry::Registry;

    #[test]
    fn test_config_load() {
        let config = Config::load().unwrap();
        assert!(config.shortcuts_path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let config = Config {
            shortcuts_path: PathBuf::from("/nonexistent/keyhook/shortcuts.json"),
        };
        let file = config.load_shortcuts().unwrap();
        assert!(file.listeners.is_empty());
        assert_eq!(file.event_types, vec![EventType::KeyDown]);
    }

    #[test]
    fn test_read_from_disk() {
        let path = std::env::temp_dir().join(format!("keyhook-test-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"listeners": {"Enter": "submit"}}"#).unwrap();

        let config = Config {
            shortcuts_path: path.clone(),
        };
        let file = config.load_shortcuts().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(file.listeners.len(), 1);
    }

    #[test]
    fn test_unparseable_file_reports_path() {
        let path = std::env::temp_dir().join(format!("keyhook-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = ShortcutFile::read(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("keyhook-bad-"));
    }

    #[test]
    fn test_parse_list_form() {
        let file = ShortcutFile::parse(
            r#"{
                "eventTypes": ["keydown", "keyup"],
                "preventDefault": true,
                "shouldListen": true,
                "listeners": [
                    {"key": {"key": ["ArrowUp", "ArrowDown"], "ctrl": true}, "action": "resize"},
                    {"key": "Escape", "action": "close", "options": {"preventDefault": true}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(file.event_types, vec![EventType::KeyDown, EventType::KeyUp]);
        assert!(file.prevent_default);
        assert_eq!(file.should_listen, Some(true));
        let ShortcutListeners::List(entries) = &file.listeners else {
            panic!("expected list form");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[1].options.prevent_default);
    }

    #[test]
    fn test_parse_map_form_keeps_document_order() {
        let file = ShortcutFile::parse(
            r#"{"listeners": {"z": "last-letter", "Enter": {"action": "submit", "options": {"preventDefault": true}}, "a": "first-letter"}}"#,
        )
        .unwrap();

        let ShortcutListeners::Map(map) = &file.listeners else {
            panic!("expected map form");
        };
        let names: Vec<&str> = map.0.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["z", "Enter", "a"]);
        assert!(matches!(
            &map.0[1].1,
            ActionSpec::WithOptions { action, options } if action == "submit" && options.prevent_default
        ));
    }

    #[test]
    fn test_demo_shortcuts_parse() {
        let file = ShortcutFile::parse(include_str!("../demos/shortcuts.json")).unwrap();
        assert_eq!(file.should_listen, Some(true));
        assert_eq!(file.listeners.len(), 5);

        let props = file.to_props(|_, _| Ok(()));
        let registry = Registry::build(&props.listeners);
        // four bare arrows plus four ctrl+arrow combos
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_parse_rejects_bad_event_type() {
        assert!(ShortcutFile::parse(r#"{"eventTypes": ["click"]}"#).is_err());
    }

    #[test]
    fn test_to_props_binds_actions() {
        let file = ShortcutFile::parse(
            r#"{"listeners": [{"key": {"key": "s", "ctrl": true}, "action": "save"}]}"#,
        )
        .unwrap();

        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let props = file.to_props(move |action, event| {
            sink.borrow_mut().push((action.to_string(), event.key.clone()));
            Ok(())
        });
        assert!(props.should_listen.is_none());

        let dispatcher = Dispatcher::new(Registry::build(&props.listeners), props.prevent_default);
        let event = KeyEvent::new(EventType::KeyDown, "s")
            .with_modifiers(Modifiers::NONE.with_ctrl(true));
        assert_eq!(dispatcher.dispatch(&event).unwrap(), 1);
        assert_eq!(*fired.borrow(), vec![("save".to_string(), "s".to_string())]);
    }
}

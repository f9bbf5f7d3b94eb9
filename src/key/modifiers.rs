//! Modifier key state
//!
//! A fixed four-field set (alt, ctrl, shift, meta) is used for both shortcut
//! declarations and runtime events, so canonical keys built from either
//! always agree on field order and count.

use serde::{Deserialize, Serialize};

/// Which modifier keys are held (events) or required (declarations)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Alt/Option key
    pub alt: bool,
    /// Control key
    pub ctrl: bool,
    /// Shift key
    pub shift: bool,
    /// Meta/Command/Windows key
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.alt && !self.ctrl && !self.shift && !self.meta
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }
}

//! Key normalization
//!
//! Turns shortcut declarations and observed key events into canonical keys
//! used for registry lookup.

mod modifiers;
mod normalize;

pub use modifiers::Modifiers;
pub use normalize::{
    normalize, normalize_event, normalize_value, CanonicalKey, KeyCombo, KeyDecl, KeyName,
};

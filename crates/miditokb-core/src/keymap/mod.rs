//! Key name tables and the action chord parser.
//!
//! Keymap actions name keys symbolically (`"CTRL+ALT+T"`).  This module turns
//! those names into Linux input-event key codes that the virtual keyboard can
//! emit.

pub mod chord;
pub mod linux_input;

pub use chord::{parse_action, Chord, MAX_CHORD_KEYS};
pub use linux_input::{KeyCode, KEY_NAME_TABLE};

/// Resolves a single key name to its [`KeyCode`].
///
/// Matching is exact and case-sensitive.  The table is scanned in order and
/// the first entry whose name equals `name` wins.
///
/// Returns `None` for names that are not in [`KEY_NAME_TABLE`].
///
/// # Examples
///
/// ```rust
/// use miditokb_core::keymap::{resolve_key_name, KeyCode};
///
/// assert_eq!(resolve_key_name("CTRL"), Some(KeyCode::LeftCtrl));
/// assert_eq!(resolve_key_name("ctrl"), None);
/// ```
pub fn resolve_key_name(name: &str) -> Option<KeyCode> {
    KEY_NAME_TABLE
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|&(_, code)| code)
}

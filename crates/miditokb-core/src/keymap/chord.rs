//! Parsing of `+`-separated action strings into key chords.
//!
//! # What is a chord? (for beginners)
//!
//! A *chord* is a set of keys that are held down together and then released
//! together, like `CTRL+C`.  The receiving application only sees the
//! combination if every key is down at the same moment, which is why the
//! emitter presses all keys of a chord before releasing any of them.
//!
//! # Bounded size
//!
//! A chord holds at most [`MAX_CHORD_KEYS`] keys.  Tokens beyond that limit
//! are dropped silently while parsing; this is a fixed policy, not an error.

use tracing::warn;

use super::{resolve_key_name, KeyCode};

/// Maximum number of keys a single chord can hold.
pub const MAX_CHORD_KEYS: usize = 10;

/// Token separator inside an action string.
const KEY_SEPARATOR: char = '+';

/// An ordered, bounded list of keys pressed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chord {
    keys: Vec<KeyCode>,
}

impl Chord {
    /// Creates an empty chord.
    pub fn new() -> Self {
        Self {
            keys: Vec::with_capacity(MAX_CHORD_KEYS),
        }
    }

    /// Appends `key` if the chord still has room.
    ///
    /// Returns `false` (and leaves the chord unchanged) once
    /// [`MAX_CHORD_KEYS`] keys are held.
    pub fn try_push(&mut self, key: KeyCode) -> bool {
        if self.is_full() {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Returns `true` when no further key can be added.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= MAX_CHORD_KEYS
    }

    /// Keys in press order.
    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Parses an action string such as `"CTRL+ALT+DEL"` into a [`Chord`].
///
/// Each `+`-separated token is resolved independently and in order via
/// [`resolve_key_name`].  Unknown tokens are logged at `warn` level and
/// omitted; they never abort the rest of the action.  Empty tokens (from
/// `"A++B"` or a leading/trailing `+`) are skipped without a warning.
///
/// An empty or fully unresolved action yields an empty chord.
///
/// # Examples
///
/// ```rust
/// use miditokb_core::keymap::{parse_action, KeyCode};
///
/// let chord = parse_action("CTRL+ALT+T");
/// assert_eq!(chord.keys(), &[KeyCode::LeftCtrl, KeyCode::LeftAlt, KeyCode::T]);
/// ```
pub fn parse_action(action: &str) -> Chord {
    let mut chord = Chord::new();

    for token in action.split(KEY_SEPARATOR).filter(|t| !t.is_empty()) {
        let Some(code) = resolve_key_name(token) else {
            warn!("unrecognized key name: {token:?}");
            continue;
        };
        if !chord.try_push(code) {
            // Full: everything after the tenth resolved key is dropped.
            break;
        }
    }

    chord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_key() {
        assert_eq!(parse_action("A").keys(), &[KeyCode::A]);
    }

    #[test]
    fn test_parse_modifier_combination_preserves_order() {
        // Arrange / Act
        let chord = parse_action("CTRL+SHIFT+ESC");

        // Assert
        assert_eq!(
            chord.keys(),
            &[KeyCode::LeftCtrl, KeyCode::LeftShift, KeyCode::Esc]
        );
    }

    #[test]
    fn test_parse_skips_unresolved_tokens() {
        let chord = parse_action("CTRL+BOGUS+C");
        assert_eq!(chord.keys(), &[KeyCode::LeftCtrl, KeyCode::C]);
    }

    #[test]
    fn test_parse_empty_action_yields_empty_chord() {
        assert!(parse_action("").is_empty());
    }

    #[test]
    fn test_parse_all_unresolved_yields_empty_chord() {
        assert!(parse_action("foo+BAR+Baz").is_empty());
    }

    #[test]
    fn test_parse_space_alias() {
        assert_eq!(parse_action("SHIFT+ ").keys(), &[KeyCode::LeftShift, KeyCode::Space]);
    }

    #[test]
    fn test_parse_ignores_empty_tokens() {
        assert_eq!(parse_action("+A++B+").keys(), &[KeyCode::A, KeyCode::B]);
    }

    #[test]
    fn test_parse_truncates_to_first_ten_resolved_keys() {
        // Arrange – 12 resolvable tokens, with an unknown one in between
        let action = "1+2+3+NOPE+4+5+6+7+8+9+0+A+B";

        // Act
        let chord = parse_action(action);

        // Assert
        assert_eq!(chord.len(), MAX_CHORD_KEYS);
        assert_eq!(
            chord.keys(),
            &[
                KeyCode::Digit1,
                KeyCode::Digit2,
                KeyCode::Digit3,
                KeyCode::Digit4,
                KeyCode::Digit5,
                KeyCode::Digit6,
                KeyCode::Digit7,
                KeyCode::Digit8,
                KeyCode::Digit9,
                KeyCode::Digit0,
            ]
        );
    }

    #[test]
    fn test_try_push_rejects_when_full() {
        // Arrange
        let mut chord = Chord::new();
        for _ in 0..MAX_CHORD_KEYS {
            assert!(chord.try_push(KeyCode::A));
        }

        // Act
        let accepted = chord.try_push(KeyCode::B);

        // Assert
        assert!(!accepted);
        assert!(chord.is_full());
        assert_eq!(chord.len(), MAX_CHORD_KEYS);
        assert!(!chord.keys().contains(&KeyCode::B));
    }
}

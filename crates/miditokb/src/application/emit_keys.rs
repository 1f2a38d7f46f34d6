//! KeyEmitter: presses and releases a chord on the virtual keyboard.
//!
//! # Two-phase emission
//!
//! A chord such as `CTRL+ALT+T` must reach the desktop as *one* combination,
//! not as three separate taps.  Every key is therefore pressed first, then a
//! single synchronisation report is written, then every key is released in the
//! same order, followed by a second report:
//!
//! ```text
//! down(CTRL) down(ALT) down(T) SYN  up(CTRL) up(ALT) up(T) SYN
//! ```
//!
//! The kernel delivers everything between two `SYN` reports as one atomic
//! input frame, so the receiving application sees all three keys held at the
//! same moment.  An empty chord still produces the two reports.

use miditokb_core::{Chord, KeyCode};
use thiserror::Error;

/// Error type for virtual keyboard writes.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The device node rejected the write.
    #[error("virtual keyboard write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A non-I/O device failure (used by test doubles).
    #[error("virtual keyboard error: {0}")]
    Device(String),
}

/// Output port for synthetic key events.
///
/// The production implementation writes to a `uinput` device; tests use the
/// recording mock from the infrastructure layer or a `mockall` mock.
#[cfg_attr(test, mockall::automock)]
pub trait VirtualKeyboard {
    /// Queues a key-down event for `key`.
    fn key_down(&mut self, key: KeyCode) -> Result<(), EmitError>;

    /// Queues a key-up event for `key`.
    fn key_up(&mut self, key: KeyCode) -> Result<(), EmitError>;

    /// Writes a synchronisation report, delivering every queued event.
    fn sync(&mut self) -> Result<(), EmitError>;
}

/// Owns the virtual keyboard and emits chords on it.
pub struct KeyEmitter<K> {
    keyboard: K,
}

impl<K: VirtualKeyboard> KeyEmitter<K> {
    /// Creates an emitter writing to `keyboard`.
    pub fn new(keyboard: K) -> Self {
        Self { keyboard }
    }

    /// Presses every key of `chord`, syncs, releases them in the same order,
    /// and syncs again.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmitError`] reported by the keyboard; the rest of
    /// the chord is abandoned.
    pub fn emit(&mut self, chord: &Chord) -> Result<(), EmitError> {
        for &key in chord.keys() {
            self.keyboard.key_down(key)?;
        }
        self.keyboard.sync()?;

        for &key in chord.keys() {
            self.keyboard.key_up(key)?;
        }
        self.keyboard.sync()
    }

    /// Borrows the underlying keyboard.
    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    /// Consumes the emitter and returns the keyboard.
    pub fn into_keyboard(self) -> K {
        self.keyboard
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

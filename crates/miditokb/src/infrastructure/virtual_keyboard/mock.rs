//! Recording virtual keyboard for tests.
//!
//! # Why a mock keyboard?
//!
//! The real [`UinputKeyboard`](super::uinput::UinputKeyboard) needs write
//! access to `/dev/uinput` and actually types on the test machine.  The
//! `RecordingKeyboard` replaces every device write with in-memory
//! recording, so tests can assert exactly which events were emitted and in
//! which order.
//!
//! The recorded events live behind an `Arc<Mutex<..>>`.  Cloning the mock
//! shares the recording, so a test can keep one handle while the event loop
//! owns the other:
//!
//! ```ignore
//! let keyboard = RecordingKeyboard::new();
//! let recording = keyboard.clone();
//! let mut event_loop = EventLoop::new(reader, translator_with(keyboard), ..);
//! event_loop.run().await;
//! assert_eq!(recording.events(), vec![KeyboardEvent::Down(KeyCode::A), ..]);
//! ```
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return an error.  This lets
//! tests exercise the "report and keep going" path without a broken device.

use std::sync::{Arc, Mutex, MutexGuard};

use miditokb_core::KeyCode;

use crate::application::emit_keys::{EmitError, VirtualKeyboard};

/// One event written to the mock keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    Down(KeyCode),
    Up(KeyCode),
    Sync,
}

/// A keyboard that records events instead of writing to a device.
#[derive(Debug, Clone, Default)]
pub struct RecordingKeyboard {
    events: Arc<Mutex<Vec<KeyboardEvent>>>,
    /// When `true`, every method returns [`EmitError::Device`].
    pub should_fail: bool,
}

impl RecordingKeyboard {
    /// Creates a mock with an empty recording and `should_fail = false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every write fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Returns a snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<KeyboardEvent> {
        self.lock().clone()
    }

    /// Number of sync reports recorded so far.
    pub fn sync_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, KeyboardEvent::Sync))
            .count()
    }

    /// Number of live clones sharing this recording.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.events)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<KeyboardEvent>> {
        // A panicking test thread must not hide the recording from the others.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&mut self, event: KeyboardEvent) -> Result<(), EmitError> {
        if self.should_fail {
            return Err(EmitError::Device("mock failure".into()));
        }
        self.lock().push(event);
        Ok(())
    }
}

impl VirtualKeyboard for RecordingKeyboard {
    fn key_down(&mut self, key: KeyCode) -> Result<(), EmitError> {
        self.record(KeyboardEvent::Down(key))
    }

    fn key_up(&mut self, key: KeyCode) -> Result<(), EmitError> {
        self.record(KeyboardEvent::Up(key))
    }

    fn sync(&mut self) -> Result<(), EmitError> {
        self.record(KeyboardEvent::Sync)
    }
}

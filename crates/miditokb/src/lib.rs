//! miditokb library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does miditokb do? (for beginners)
//!
//! A MIDI controller sends a few bytes every time a pad or key is hit: a
//! status byte ("note on, channel 1"), the note number, and the velocity.
//! miditokb reads those bytes straight from the raw ALSA MIDI device, looks
//! the note number up in a keymap file, and types the configured key chord on
//! a virtual keyboard created through Linux `uinput`.  To every other program
//! on the machine the chord looks like it came from a real USB keyboard.
//!
//! The application:
//!
//! 1. Loads the keymap (`0x3C,CTRL+C` style lines) into a `MappingTable`.
//! 2. Opens the MIDI port (`hw:1,0` or `/dev/snd/midiC1D0`) non-blocking.
//! 3. Creates the `uinput` virtual keyboard.
//! 4. Runs the event loop: wait for bytes, a shutdown signal, or the idle
//!    timeout; filter and match each batch; press and release each chord.

/// Application layer: key emission, batch translation and the event loop.
pub mod application;

/// Infrastructure layer: uinput, raw MIDI port, and config storage adapters.
pub mod infrastructure;

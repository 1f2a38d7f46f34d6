//! Infrastructure layer.
//!
//! Contains OS-facing adapters: the `uinput` virtual keyboard, the raw ALSA
//! MIDI port, and TOML configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `miditokb_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`virtual_keyboard`** – Implementations of `VirtualKeyboard`.  On Linux
//!   a `UinputKeyboard` writes real input events; a `RecordingKeyboard`
//!   records them for tests.
//!
//! - **`midi_port`** – Resolves `hw:<card>,<device>` names to device nodes,
//!   lists available raw MIDI ports, and opens a port as a non-blocking
//!   async byte reader.
//!
//! - **`storage`** – Loads the optional `config.toml`.

pub mod midi_port;
pub mod storage;
pub mod virtual_keyboard;

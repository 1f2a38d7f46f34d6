//! # miditokb-core
//!
//! Shared library for miditokb containing the MIDI byte-stream matcher, the
//! trigger→action mapping table, and the key name → Linux key code tables.
//!
//! It has zero dependencies on OS APIs, device files, or async runtimes, so
//! every rule that decides *whether* a key chord fires can be tested without a
//! MIDI port or a `/dev/uinput` node.
//!
//! # Architecture overview (for beginners)
//!
//! miditokb turns a MIDI controller into a macro keyboard.  Pressing a pad or
//! key on the controller sends a short burst of MIDI bytes; miditokb looks the
//! note number up in a user-supplied keymap and types the configured key
//! combination (for example `CTRL+ALT+T`) on a virtual keyboard.
//!
//! This crate (`miditokb-core`) is the pure part of that pipeline:
//!
//! - **`protocol`** – How the MIDI byte stream is interpreted.  Transport bytes
//!   (clock ticks, active sensing) are filtered out, and the remaining bytes are
//!   scanned for "note value followed by a non-zero velocity" pairs.
//!
//! - **`domain`** – The mapping table: an ordered list of
//!   `trigger byte → action string` rules loaded from the keymap file.
//!
//! - **`keymap`** – The fixed table of key names (`"CTRL"`, `"A"`, `"F5"`, …)
//!   and the chord parser that turns `"CTRL+ALT+T"` into key codes.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::mapping::{KeymapFileError, MappingEntry, MappingTable};
pub use keymap::chord::{parse_action, Chord, MAX_CHORD_KEYS};
pub use keymap::linux_input::KeyCode;
pub use keymap::resolve_key_name;
pub use protocol::filter::TransportFilter;
pub use protocol::matcher::{match_triggers, TriggerMatch};
pub use protocol::status::{ByteClass, StatusClassifier};

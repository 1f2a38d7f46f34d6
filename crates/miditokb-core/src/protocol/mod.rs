//! MIDI byte-stream handling: transport filtering, trigger matching, and the
//! diagnostic running-status classifier.
//!
//! # MIDI bytes in one paragraph (for beginners)
//!
//! A MIDI stream is a sequence of bytes.  Bytes `>= 0x80` are *status* bytes
//! that start a message (`0x90` = "note on, channel 1").  Bytes `< 0x80` are
//! *data* bytes belonging to the most recent status byte.  A note-on carries
//! two data bytes: the note number and the velocity.  Senders may omit a
//! repeated status byte ("running status"), so a long run of notes can arrive
//! as bare `note, velocity, note, velocity, …` pairs.  Finally, single-byte
//! real-time messages such as the clock tick (`0xF8`) and active sensing
//! (`0xFE`) may appear anywhere, even between the data bytes of another
//! message.

pub mod filter;
pub mod matcher;
pub mod status;

pub use filter::{TransportFilter, MIDI_ACTIVE_SENSING, MIDI_CLOCK};
pub use matcher::{match_triggers, TriggerMatch};
pub use status::{ByteClass, StatusClassifier};

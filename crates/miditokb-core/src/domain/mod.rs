//! Domain entities for miditokb.
//!
//! This module contains pure rules with no infrastructure dependencies beyond
//! reading a text file.
//!
//! # What is "domain" here? (for beginners)
//!
//! The domain is the part of the program that would stay the same if the MIDI
//! port were replaced by a network socket and the virtual keyboard by a log
//! file.  For miditokb that is the *mapping*: which MIDI value means which key
//! combination.  Everything else (where the bytes come from, where the key
//! events go) lives in the application crate's infrastructure layer.

/// Trigger → action mapping table and the keymap file parser.
///
/// See [`mapping::MappingTable`] for the main type.
pub mod mapping;

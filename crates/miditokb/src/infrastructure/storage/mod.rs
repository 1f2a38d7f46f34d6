//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the optional TOML configuration file and
//! supplies defaults when it does not exist.  The keymap file itself is parsed
//! by `miditokb_core::MappingTable::load_file`.

pub mod config;

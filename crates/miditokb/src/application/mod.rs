//! Application layer use cases.
//!
//! # What use cases does miditokb have?
//!
//! - **`emit_keys`** – Presses and releases a [`Chord`](miditokb_core::Chord)
//!   on a [`VirtualKeyboard`](emit_keys::VirtualKeyboard).  The actual device
//!   is injected at construction time, so the event ordering can be tested
//!   with a recording mock instead of `/dev/uinput`.
//!
//! - **`translate`** – Runs one raw read batch through the transport filter
//!   and the trigger matcher, and hands each matched action to the emitter.
//!
//! - **`event_loop`** – The single-threaded wait loop that ties the MIDI
//!   reader, the shutdown signal, and the idle timer together.

pub mod emit_keys;
pub mod event_loop;
pub mod translate;

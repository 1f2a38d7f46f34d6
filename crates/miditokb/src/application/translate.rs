//! Translator: turns one raw read batch into emitted key chords.
//!
//! For every batch the event loop hands over:
//!
//! 1. The running-status classifier renders the raw bytes at `trace` level.
//! 2. The [`TransportFilter`] removes clock / active-sensing bytes.
//! 3. [`match_triggers`] finds every `trigger, non-zero velocity` pair with a
//!    rule in the [`MappingTable`].
//! 4. Each matched action is parsed into a chord and emitted.
//!
//! A failed emission is logged and counted; the remaining matches in the
//! batch are still emitted.

use miditokb_core::{match_triggers, parse_action, MappingTable, StatusClassifier, TransportFilter};
use tracing::{debug, enabled, info, trace, warn, Level};

use super::emit_keys::{KeyEmitter, VirtualKeyboard};

/// What happened to one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Bytes received from the port.
    pub received: usize,
    /// Bytes left after transport filtering.
    pub forwarded: usize,
    /// Actions emitted successfully.
    pub dispatched: usize,
    /// Actions whose emission failed.
    pub failed: usize,
}

/// Owns the session's mapping table, filter, classifier and key emitter.
pub struct Translator<K> {
    table: MappingTable,
    filter: TransportFilter,
    emitter: KeyEmitter<K>,
    classifier: StatusClassifier,
    scratch: Vec<u8>,
}

impl<K: VirtualKeyboard> Translator<K> {
    /// Creates a translator emitting on `keyboard`.
    pub fn new(table: MappingTable, filter: TransportFilter, keyboard: K) -> Self {
        Self {
            table,
            filter,
            emitter: KeyEmitter::new(keyboard),
            classifier: StatusClassifier::new(),
            scratch: Vec::with_capacity(256),
        }
    }

    /// Filters, matches and emits one raw batch.
    pub fn process_batch(&mut self, raw: &[u8]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            received: raw.len(),
            ..BatchOutcome::default()
        };
        debug!("received {} bytes", raw.len());
        self.trace_stream(raw);

        self.scratch.clear();
        self.scratch.extend_from_slice(raw);
        self.filter.apply(&mut self.scratch);
        outcome.forwarded = self.scratch.len();

        for hit in match_triggers(&self.table, &self.scratch) {
            info!("Input: {}", hit.action);
            let chord = parse_action(hit.action);
            if chord.is_empty() {
                debug!("action '{}' names no known keys", hit.action);
            }

            match self.emitter.emit(&chord) {
                Ok(()) => outcome.dispatched += 1,
                Err(e) => {
                    warn!(
                        "failed to emit '{}' (trigger {:#04x}): {e}",
                        hit.action, hit.trigger
                    );
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    fn trace_stream(&mut self, raw: &[u8]) {
        // The classifier is fed every byte so its state stays correct even
        // while trace output is off.
        if enabled!(Level::TRACE) {
            trace!("stream:{}", self.classifier.format_stream(raw));
        } else {
            for &byte in raw {
                self.classifier.classify(byte);
            }
        }
    }

    /// The mapping table this translator matches against.
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// The active transport filter.
    pub fn filter(&self) -> TransportFilter {
        self.filter
    }

    /// Borrows the virtual keyboard.
    pub fn keyboard(&self) -> &K {
        self.emitter.keyboard()
    }

    /// Consumes the translator and returns the virtual keyboard.
    pub fn into_keyboard(self) -> K {
        self.emitter.into_keyboard()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

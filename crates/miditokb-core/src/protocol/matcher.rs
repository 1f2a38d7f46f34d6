//! Two-byte lookahead matcher over a filtered batch.
//!
//! # Matching rule
//!
//! The batch is walked with a read cursor.  At each position the current
//! byte `v` is examined:
//!
//! 1. `v >= 0x80` is a status byte.  It is never dispatched; the cursor moves
//!    on by one.
//! 2. Otherwise `v` is looked up in the [`MappingTable`].  If a rule exists
//!    *and* the next byte in the batch is present and non-zero, the rule
//!    fires and the cursor skips both bytes, so the velocity byte cannot be
//!    matched as a trigger of its own.
//! 3. In every other case the cursor moves on by one.
//!
//! A non-zero lookahead is the note-on velocity ("key went down"); a zero
//! lookahead is the running-status spelling of note-off and never fires.
//!
//! # Batch boundaries
//!
//! Matching is stateless across batches.  A trigger that is the *last* byte
//! of a batch has no lookahead and is dropped, even if its velocity arrives
//! at the start of the next read.
//!
//! ```text
//!  batch:   3C 40 3D 00 3E
//!           ^^^^^            3C mapped, lookahead 40 → fire, skip 2
//!                 ^^         3D mapped, lookahead 00 → no fire, skip 1
//!                    ^^      00 unmapped             → skip 1
//!                       ^^   3E mapped, no lookahead → dropped
//! ```

use crate::domain::mapping::MappingTable;

/// Lowest status byte value; everything below is a data byte.
const STATUS_BIT: u8 = 0x80;

/// One rule that fired inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMatch<'a> {
    /// Offset of the trigger byte inside the filtered batch.
    pub offset: usize,
    /// The trigger (note) value.
    pub trigger: u8,
    /// The non-zero lookahead (velocity) byte that gated the match.
    pub velocity: u8,
    /// Action string of the first matching rule.
    pub action: &'a str,
}

/// Scans `batch` and returns every rule that fires, in stream order.
///
/// # Examples
///
/// ```rust
/// use miditokb_core::{match_triggers, MappingTable};
///
/// let mut table = MappingTable::new();
/// table.insert(0x3C, "A");
/// table.insert(0x3D, "B");
///
/// let matches = match_triggers(&table, &[0x3C, 0x40, 0x3D, 0x00]);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].action, "A");
/// ```
pub fn match_triggers<'a>(table: &'a MappingTable, batch: &[u8]) -> Vec<TriggerMatch<'a>> {
    let mut matches = Vec::new();
    let mut cursor = 0;

    while cursor < batch.len() {
        let value = batch[cursor];
        let lookahead = batch.get(cursor + 1).copied();
        cursor += 1;

        if value >= STATUS_BIT {
            continue;
        }

        let Some(action) = table.lookup(value) else {
            continue;
        };

        match lookahead {
            Some(velocity) if velocity != 0 => {
                matches.push(TriggerMatch {
                    offset: cursor - 1,
                    trigger: value,
                    velocity,
                    action,
                });
                cursor += 1;
            }
            _ => {}
        }
    }

    matches
}

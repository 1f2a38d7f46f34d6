//! Removal of real-time transport bytes from a raw read batch.

/// MIDI timing clock (System Real-Time, 24 per quarter note).
pub const MIDI_CLOCK: u8 = 0xF8;

/// MIDI active sensing keep-alive (System Real-Time, every ~300 ms).
pub const MIDI_ACTIVE_SENSING: u8 = 0xFE;

/// Drops clock and/or active-sensing bytes before matching.
///
/// Both are dropped by default; either can be kept independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportFilter {
    /// Remove [`MIDI_CLOCK`] bytes.
    pub drop_clock: bool,
    /// Remove [`MIDI_ACTIVE_SENSING`] bytes.
    pub drop_active_sensing: bool,
}

impl Default for TransportFilter {
    fn default() -> Self {
        Self {
            drop_clock: true,
            drop_active_sensing: true,
        }
    }
}

impl TransportFilter {
    /// A filter that forwards every byte unchanged.
    pub fn pass_through() -> Self {
        Self {
            drop_clock: false,
            drop_active_sensing: false,
        }
    }

    /// Returns `true` if `byte` survives the filter.
    pub fn keeps(&self, byte: u8) -> bool {
        match byte {
            MIDI_CLOCK => !self.drop_clock,
            MIDI_ACTIVE_SENSING => !self.drop_active_sensing,
            _ => true,
        }
    }

    /// Removes filtered bytes from `batch` in place, keeping the relative
    /// order of everything else.
    pub fn apply(&self, batch: &mut Vec<u8>) {
        batch.retain(|&byte| self.keeps(byte));
    }
}

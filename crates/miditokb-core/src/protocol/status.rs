//! Running-status classifier used to render the incoming stream for
//! diagnostics.
//!
//! The classifier tracks which kind of message the most recent status byte
//! started and how many of its data bytes have been seen.  With that state
//! every byte can be labelled as the start of a message, a continuation, or a
//! data byte that implicitly starts a *new* message under running status.
//!
//! This interpretation is only used for trace-level output.  Which bytes fire
//! actions is decided by [`crate::protocol::matcher`], not by this state
//! machine.
//!
//! State persists across calls, so a message split over two reads is still
//! labelled correctly.

use std::fmt::Write as _;

/// What a single byte means in the context of the stream so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// System real-time byte (`0xF8..=0xFF`); does not affect message state.
    RealTime,
    /// A status byte that starts a new message.
    Status,
    /// `0xF7` closing an open system-exclusive message.
    EndOfExclusive,
    /// A data byte continuing the current message.
    Data,
    /// A data byte that starts a new message by reusing the previous status.
    RunningStatus,
    /// A data byte seen before any usable status byte.
    Orphan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unknown,
    OneParam,
    OneParamContinue,
    TwoParamFirst,
    TwoParamSecond,
    TwoParamFirstContinue,
    SysEx,
}

/// Stateful byte classifier; one instance per input session.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    state: State,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusClassifier {
    /// Creates a classifier that has not seen any status byte yet.
    pub fn new() -> Self {
        Self {
            state: State::Unknown,
        }
    }

    /// Classifies `byte` and advances the running-status state.
    pub fn classify(&mut self, byte: u8) -> ByteClass {
        match byte {
            0xF8..=0xFF => ByteClass::RealTime,
            0xF0..=0xF7 => self.system_common(byte),
            0x80..=0xEF => {
                // Program change and channel pressure carry one data byte.
                self.state = if (0xC0..=0xDF).contains(&byte) {
                    State::OneParam
                } else {
                    State::TwoParamFirst
                };
                ByteClass::Status
            }
            _ => self.data(),
        }
    }

    fn system_common(&mut self, byte: u8) -> ByteClass {
        match byte {
            0xF0 => self.state = State::SysEx,
            0xF1 | 0xF3 => self.state = State::OneParam,
            0xF2 => self.state = State::TwoParamFirst,
            0xF7 => {
                let closes = self.state == State::SysEx;
                self.state = State::Unknown;
                return if closes {
                    ByteClass::EndOfExclusive
                } else {
                    ByteClass::Status
                };
            }
            _ => self.state = State::Unknown,
        }
        ByteClass::Status
    }

    fn data(&mut self) -> ByteClass {
        match self.state {
            State::Unknown => ByteClass::Orphan,
            State::SysEx => ByteClass::Data,
            State::OneParam => {
                self.state = State::OneParamContinue;
                ByteClass::Data
            }
            State::OneParamContinue => ByteClass::RunningStatus,
            State::TwoParamFirst => {
                self.state = State::TwoParamSecond;
                ByteClass::Data
            }
            State::TwoParamSecond => {
                self.state = State::TwoParamFirstContinue;
                ByteClass::Data
            }
            State::TwoParamFirstContinue => {
                self.state = State::TwoParamSecond;
                ByteClass::RunningStatus
            }
        }
    }

    /// Renders `bytes` as hex, one MIDI message per line.
    ///
    /// Status, real-time and orphan bytes start a new line; running-status
    /// messages start an indented line; everything else is appended to the
    /// current line.
    ///
    /// ```text
    /// 90 3C 40
    ///    3E 40
    /// F8
    /// ```
    pub fn format_stream(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len() * 4);
        for &byte in bytes {
            let separator = match self.classify(byte) {
                ByteClass::RealTime | ByteClass::Status | ByteClass::Orphan => "\n",
                ByteClass::RunningStatus => "\n   ",
                ByteClass::Data | ByteClass::EndOfExclusive => " ",
            };
            let _ = write!(out, "{separator}{byte:02X}");
        }
        out
    }
}

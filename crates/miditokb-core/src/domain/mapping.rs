//! The trigger → action mapping table.
//!
//! A keymap file holds one rule per line:
//!
//! ```text
//! # note value, action
//! 0x3C,CTRL+C
//! 0x3E,CTRL+V
//! 64,ALT+TAB
//! ```
//!
//! # Trigger syntax
//!
//! The trigger is read the way C's `strtol(s, NULL, 0)` reads it: optional
//! leading whitespace and sign, then `0x`/`0X` for hexadecimal, a leading `0`
//! for octal, or plain decimal.  Parsing stops at the first character that is
//! not a digit of the detected base, and the result is truncated to a byte.
//! A line whose trigger evaluates to `0` is skipped, as is a line without an
//! action.
//!
//! # Lookup order
//!
//! Entries keep file order.  When a trigger appears on several lines the
//! first line wins; later duplicates are stored but never returned.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Field separator between trigger and action.
const FIELD_SEPARATOR: char = ',';

/// Lines starting with this character are comments.
const COMMENT_PREFIX: char = '#';

/// Error type for keymap file loading.
#[derive(Debug, Error)]
pub enum KeymapFileError {
    /// The keymap file could not be read.
    #[error("failed to open keymap {path} for reading: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single `trigger → action` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// MIDI data value that fires the action.
    pub trigger: u8,
    /// `+`-separated key names, e.g. `"CTRL+ALT+T"`.
    pub action: String,
}

/// Ordered list of mapping rules with first-match-wins lookup.
///
/// The table is built once at startup and is read-only afterwards; there is
/// no removal API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one rule after all existing rules.
    pub fn insert(&mut self, trigger: u8, action: impl Into<String>) {
        self.entries.push(MappingEntry {
            trigger,
            action: action.into(),
        });
    }

    /// Appends every `(trigger, action)` pair, preserving iteration order.
    pub fn load<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (u8, S)>,
        S: Into<String>,
    {
        for (trigger, action) in entries {
            self.insert(trigger, action);
        }
    }

    /// Returns the action of the first rule whose trigger equals `trigger`.
    ///
    /// Any byte value can be looked up, including status bytes `>= 0x80`.
    pub fn lookup(&self, trigger: u8) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.trigger == trigger)
            .map(|entry| entry.action.as_str())
    }

    /// All rules in insertion order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a table from keymap file text.
    ///
    /// Comment lines, lines whose trigger evaluates to `0`, and lines with no
    /// action are skipped silently.  Every accepted rule is logged at `debug`.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for line in text.lines() {
            if let Some((trigger, action)) = parse_line(line) {
                debug!("loaded key={trigger:#x}, action={action}");
                table.insert(trigger, action);
            }
        }
        table
    }

    /// Reads and parses the keymap file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapFileError::Io`] if the file cannot be read.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, KeymapFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| KeymapFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }
}

/// Parses one keymap line into `(trigger, action)`.
///
/// Fields are split on `,` with empty fields ignored, so `",,60,,A"` still
/// reads as trigger `60` and action `"A"`.  Anything after the second field
/// is discarded.
fn parse_line(line: &str) -> Option<(u8, &str)> {
    if line.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let mut fields = line.split(FIELD_SEPARATOR).filter(|f| !f.is_empty());
    let trigger = parse_c_integer(fields.next()?) as u8;
    let action = fields.next()?;

    if trigger == 0 {
        return None;
    }
    Some((trigger, action))
}

/// Parses a leading integer with `strtol(s, NULL, 0)` semantics.
///
/// Returns `0` when no digits are present.  Values outside `i64` saturate.
fn parse_c_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let bytes = s.as_bytes();
    let has_hex_prefix = bytes.len() > 2
        && bytes[0] == b'0'
        && (bytes[1] == b'x' || bytes[1] == b'X')
        && bytes[2].is_ascii_hexdigit();

    let (radix, digits) = if has_hex_prefix {
        (16, &s[2..])
    } else if bytes.first() == Some(&b'0') {
        (8, s)
    } else {
        (10, s)
    };

    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(digit));
    }

    if negative {
        value.saturating_neg()
    } else {
        value
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Lookup ────────────────────────────────────────────────────────────────

    #[test]
    fn test_lookup_returns_inserted_action() {
        // Arrange
        let mut table = MappingTable::new();
        table.insert(0x3C, "CTRL+C");

        // Act / Assert
        assert_eq!(table.lookup(0x3C), Some("CTRL+C"));
    }

    #[test]
    fn test_lookup_missing_trigger_returns_none() {
        let mut table = MappingTable::new();
        table.insert(0x3C, "A");
        assert_eq!(table.lookup(0x3D), None);
    }

    #[test]
    fn test_lookup_on_empty_table_returns_none() {
        assert_eq!(MappingTable::new().lookup(0x3C), None);
    }

    #[test]
    fn test_lookup_first_inserted_duplicate_wins() {
        // Arrange
        let mut table = MappingTable::new();
        table.load([(0x3C, "FIRST"), (0x3D, "OTHER"), (0x3C, "SECOND")]);

        // Act
        let action = table.lookup(0x3C);

        // Assert
        assert_eq!(action, Some("FIRST"));
        assert_eq!(table.len(), 3, "duplicates are stored, just never returned");
    }

    #[test]
    fn test_lookup_supports_status_range_triggers() {
        let mut table = MappingTable::new();
        table.insert(0x90, "A");
        table.insert(0xFF, "B");
        assert_eq!(table.lookup(0x90), Some("A"));
        assert_eq!(table.lookup(0xFF), Some("B"));
    }

    #[test]
    fn test_load_preserves_order() {
        let mut table = MappingTable::new();
        table.load(vec![(3u8, "C".to_string()), (1, "A".to_string()), (2, "B".to_string())]);

        let triggers: Vec<u8> = table.entries().iter().map(|e| e.trigger).collect();
        assert_eq!(triggers, vec![3, 1, 2]);
    }

    // ── Keymap text parsing ───────────────────────────────────────────────────

    #[test]
    fn test_parse_reads_hex_octal_and_decimal_triggers() {
        // Arrange
        let text = "0x3C,A\n074,B\n62,C\n";

        // Act
        let table = MappingTable::parse(text);

        // Assert – 074 octal == 60 decimal == 0x3C, so the hex line wins
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup(0x3C), Some("A"));
        assert_eq!(table.lookup(62), Some("C"));
    }

    #[test]
    fn test_parse_skips_comment_lines() {
        let table = MappingTable::parse("# 60,A\n61,B\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(60), None);
        assert_eq!(table.lookup(61), Some("B"));
    }

    #[test]
    fn test_parse_skips_zero_and_unparsable_triggers() {
        let table = MappingTable::parse("0,A\nabc,B\n0x,C\n61,D\n");
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.lookup(61), Some("D"));
    }

    #[test]
    fn test_parse_skips_lines_without_action() {
        let table = MappingTable::parse("60\n61,\n\n62,E\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(62), Some("E"));
    }

    #[test]
    fn test_parse_ignores_fields_after_action() {
        let table = MappingTable::parse("60,CTRL+C,extra\n");
        assert_eq!(table.lookup(60), Some("CTRL+C"));
    }

    #[test]
    fn test_parse_skips_empty_fields() {
        let table = MappingTable::parse(",60,,A\n");
        assert_eq!(table.lookup(60), Some("A"));
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let table = MappingTable::parse("60,A\r\n61,B\r\n");
        assert_eq!(table.lookup(60), Some("A"));
        assert_eq!(table.lookup(61), Some("B"));
    }

    #[test]
    fn test_parse_truncates_trigger_to_byte() {
        // 0x13C truncates to 0x3C; 256 truncates to 0 and is skipped
        let table = MappingTable::parse("0x13C,A\n256,B\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(0x3C), Some("A"));
    }

    // ── strtol emulation ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_c_integer_bases() {
        assert_eq!(parse_c_integer("60"), 60);
        assert_eq!(parse_c_integer("0x3c"), 0x3C);
        assert_eq!(parse_c_integer("0X3C"), 0x3C);
        assert_eq!(parse_c_integer("074"), 60);
        assert_eq!(parse_c_integer("0"), 0);
    }

    #[test]
    fn test_parse_c_integer_stops_at_first_invalid_digit() {
        assert_eq!(parse_c_integer("60abc"), 60);
        assert_eq!(parse_c_integer("078"), 7);
        assert_eq!(parse_c_integer("0x1g"), 1);
    }

    #[test]
    fn test_parse_c_integer_whitespace_and_sign() {
        assert_eq!(parse_c_integer("  42"), 42);
        assert_eq!(parse_c_integer("+42"), 42);
        assert_eq!(parse_c_integer("-1"), -1);
        assert_eq!(parse_c_integer("-1") as u8, 0xFF);
    }

    #[test]
    fn test_parse_c_integer_no_digits_is_zero() {
        assert_eq!(parse_c_integer(""), 0);
        assert_eq!(parse_c_integer("x"), 0);
        assert_eq!(parse_c_integer("0x"), 0);
    }

    #[test]
    fn test_parse_c_integer_saturates_on_overflow() {
        assert_eq!(parse_c_integer("99999999999999999999999"), i64::MAX);
    }

    // ── File loading ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_file_missing_returns_io_error() {
        let result = MappingTable::load_file("/nonexistent/path/keymap.txt");
        assert!(matches!(result, Err(KeymapFileError::Io { .. })));
    }
}

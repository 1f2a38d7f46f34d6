//! Linux input-event key codes and the key name table used by keymap actions.
//!
//! Values are the `KEY_*` constants from `linux/input-event-codes.h`.
//! Reference: https://github.com/torvalds/linux/blob/master/include/uapi/linux/input-event-codes.h
//!
//! # What is a Linux key code? (for beginners)
//!
//! The Linux input subsystem identifies every key by a small integer that
//! describes the *physical* key position on a US keyboard, not the character
//! it produces.  For example:
//!
//! | Constant       | Value | Key              |
//! |----------------|-------|------------------|
//! | `KEY_ESC`      | 1     | Escape           |
//! | `KEY_A`        | 30    | the A key        |
//! | `KEY_LEFTCTRL` | 29    | left Control     |
//! | `KEY_SPACE`    | 57    | space bar        |
//!
//! A virtual keyboard created through `/dev/uinput` reports these codes, and
//! the desktop's keyboard layout turns them into characters exactly as it
//! would for a physical keyboard.
//!
//! # Name aliasing
//!
//! [`KEY_NAME_TABLE`] may list the same code under several names: `" "` and
//! `"SPACE"` both mean the space bar, `"RETURN"` and `"ENTER"` both mean Enter,
//! and every letter is available in upper and lower case.  Lookups scan the
//! table in order and stop at the first exact name match.

/// A Linux input-event key code (`KEY_*`).
///
/// Only the keys that can appear in a keymap action are listed.  The numeric
/// value of each variant is its code in `linux/input-event-codes.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum KeyCode {
    Esc = 1,
    Digit1 = 2,
    Digit2 = 3,
    Digit3 = 4,
    Digit4 = 5,
    Digit5 = 6,
    Digit6 = 7,
    Digit7 = 8,
    Digit8 = 9,
    Digit9 = 10,
    Digit0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,
    Tab = 15,
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    Enter = 28,
    LeftCtrl = 29,
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    LeftShift = 42,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    LeftAlt = 56,
    Space = 57,
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    F11 = 87,
    F12 = 88,
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    End = 107,
    Down = 108,
    PageDown = 109,
    Insert = 110,
    Delete = 111,
}

impl KeyCode {
    /// Returns the raw `KEY_*` value written into `input_event.code`.
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Every key name an action may use, in lookup order.
///
/// The table is append-only by convention: aliases for an existing code go
/// *after* its canonical name so `first match wins` keeps resolving the
/// canonical entry first.
pub const KEY_NAME_TABLE: &[(&str, KeyCode)] = &[
    // Control keys
    ("ESC", KeyCode::Esc),
    ("ALT", KeyCode::LeftAlt),
    ("CTRL", KeyCode::LeftCtrl),
    ("BACKSPACE", KeyCode::Backspace),
    ("SHIFT", KeyCode::LeftShift),
    (" ", KeyCode::Space),
    ("SPACE", KeyCode::Space),
    ("RETURN", KeyCode::Enter),
    ("ENTER", KeyCode::Enter),
    ("TAB", KeyCode::Tab),
    ("DEL", KeyCode::Delete),
    ("INSERT", KeyCode::Insert),
    ("HOME", KeyCode::Home),
    ("END", KeyCode::End),
    ("PG_UP", KeyCode::PageUp),
    ("PG_DOWN", KeyCode::PageDown),
    ("MINUS", KeyCode::Minus),
    ("EQUAL", KeyCode::Equal),
    // Arrow keys
    ("UP", KeyCode::Up),
    ("DOWN", KeyCode::Down),
    ("LEFT", KeyCode::Left),
    ("RIGHT", KeyCode::Right),
    // Letters
    ("A", KeyCode::A),
    ("B", KeyCode::B),
    ("C", KeyCode::C),
    ("D", KeyCode::D),
    ("E", KeyCode::E),
    ("F", KeyCode::F),
    ("G", KeyCode::G),
    ("H", KeyCode::H),
    ("I", KeyCode::I),
    ("J", KeyCode::J),
    ("K", KeyCode::K),
    ("L", KeyCode::L),
    ("M", KeyCode::M),
    ("N", KeyCode::N),
    ("O", KeyCode::O),
    ("P", KeyCode::P),
    ("Q", KeyCode::Q),
    ("R", KeyCode::R),
    ("S", KeyCode::S),
    ("T", KeyCode::T),
    ("U", KeyCode::U),
    ("V", KeyCode::V),
    ("W", KeyCode::W),
    ("X", KeyCode::X),
    ("Y", KeyCode::Y),
    ("Z", KeyCode::Z),
    // Lowercase letter aliases (older keymaps spell letters in lower case)
    ("a", KeyCode::A),
    ("b", KeyCode::B),
    ("c", KeyCode::C),
    ("d", KeyCode::D),
    ("e", KeyCode::E),
    ("f", KeyCode::F),
    ("g", KeyCode::G),
    ("h", KeyCode::H),
    ("i", KeyCode::I),
    ("j", KeyCode::J),
    ("k", KeyCode::K),
    ("l", KeyCode::L),
    ("m", KeyCode::M),
    ("n", KeyCode::N),
    ("o", KeyCode::O),
    ("p", KeyCode::P),
    ("q", KeyCode::Q),
    ("r", KeyCode::R),
    ("s", KeyCode::S),
    ("t", KeyCode::T),
    ("u", KeyCode::U),
    ("v", KeyCode::V),
    ("w", KeyCode::W),
    ("x", KeyCode::X),
    ("y", KeyCode::Y),
    ("z", KeyCode::Z),
    // Digits (top row)
    ("1", KeyCode::Digit1),
    ("2", KeyCode::Digit2),
    ("3", KeyCode::Digit3),
    ("4", KeyCode::Digit4),
    ("5", KeyCode::Digit5),
    ("6", KeyCode::Digit6),
    ("7", KeyCode::Digit7),
    ("8", KeyCode::Digit8),
    ("9", KeyCode::Digit9),
    ("0", KeyCode::Digit0),
    // Function keys
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
];

/// Returns every distinct key code in [`KEY_NAME_TABLE`], sorted by code.
///
/// The virtual keyboard advertises exactly this set to the kernel, so any
/// chord the resolver can produce is accepted by the device.
pub fn supported_key_codes() -> Vec<KeyCode> {
    let mut codes: Vec<KeyCode> = KEY_NAME_TABLE.iter().map(|&(_, code)| code).collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}

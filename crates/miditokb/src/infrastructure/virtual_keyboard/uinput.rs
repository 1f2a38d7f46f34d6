//! Linux virtual keyboard via `/dev/uinput`.
//!
//! # What is uinput? (for beginners)
//!
//! `uinput` is a kernel module that lets a user-space process create an input
//! device.  Events written to it are routed through the normal input stack
//! (evdev → libinput → X11/Wayland), exactly as if a USB keyboard had sent
//! them.  The receiving application cannot tell the difference.
//!
//! The device is created once at startup and advertises every key the keymap
//! can name.  Keys that are not advertised are silently dropped by the kernel,
//! so the full key table is registered even if the loaded keymap uses only a
//! few of them.
//!
//! # Batching
//!
//! [`evdev::uinput::VirtualDevice::emit`] writes a slice of events and then a
//! `SYN_REPORT`.  `key_down`/`key_up` therefore only queue events; `sync`
//! writes the queue in one call, which produces exactly one report per phase.
//!
//! # Permissions
//!
//! Opening `/dev/uinput` normally needs root or membership of the `input`
//! group (or a udev rule granting access).  Without it, [`UinputKeyboard::create`]
//! fails with [`KeyboardError::Create`].

use evdev::{
    uinput::VirtualDevice, AttributeSet, BusType, EventType, InputEvent, InputId,
    KeyCode as EvdevKey,
};
use miditokb_core::{keymap::linux_input::supported_key_codes, KeyCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::emit_keys::{EmitError, VirtualKeyboard};

/// Name shown by `evtest`, `libinput list-devices`, etc.
pub const DEVICE_NAME: &str = "MIDI virtual keyboard device";
const VENDOR_ID: u16 = 0x1234;
const PRODUCT_ID: u16 = 0x5678;
const VERSION: u16 = 1;

const KEY_PRESS: i32 = 1;
const KEY_RELEASE: i32 = 0;

/// Error type for virtual keyboard creation.
#[derive(Debug, Error)]
pub enum KeyboardError {
    /// `/dev/uinput` could not be opened or the device could not be registered.
    #[error("could not create uinput device (is /dev/uinput writable?): {0}")]
    Create(#[source] std::io::Error),
}

/// A `uinput` keyboard that advertises every key in the key table.
///
/// The kernel device is destroyed when the value is dropped.
pub struct UinputKeyboard {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

impl UinputKeyboard {
    /// Registers the virtual keyboard with the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Create`] if `/dev/uinput` cannot be opened or
    /// the device cannot be registered.
    pub fn create() -> Result<Self, KeyboardError> {
        let mut keys = AttributeSet::<EvdevKey>::new();
        for key in supported_key_codes() {
            keys.insert(EvdevKey::new(key.code()));
        }

        let device = VirtualDevice::builder()
            .and_then(|builder| {
                builder
                    .name(DEVICE_NAME)
                    .input_id(InputId::new(BusType::BUS_USB, VENDOR_ID, PRODUCT_ID, VERSION))
                    .with_keys(&keys)
            })
            .and_then(|builder| builder.build())
            .map_err(KeyboardError::Create)?;

        info!("created virtual keyboard \"{DEVICE_NAME}\"");
        Ok(Self {
            device,
            pending: Vec::with_capacity(16),
        })
    }

    fn queue(&mut self, key: KeyCode, value: i32) {
        self.pending
            .push(InputEvent::new(EventType::KEY.0, key.code(), value));
    }
}

impl VirtualKeyboard for UinputKeyboard {
    fn key_down(&mut self, key: KeyCode) -> Result<(), EmitError> {
        self.queue(key, KEY_PRESS);
        Ok(())
    }

    fn key_up(&mut self, key: KeyCode) -> Result<(), EmitError> {
        self.queue(key, KEY_RELEASE);
        Ok(())
    }

    fn sync(&mut self) -> Result<(), EmitError> {
        // A failed phase is dropped, never replayed before the next chord.
        let result = self.device.emit(&self.pending);
        self.pending.clear();
        result.map_err(EmitError::Io)
    }
}

impl Drop for UinputKeyboard {
    fn drop(&mut self) {
        debug!("destroying virtual keyboard \"{DEVICE_NAME}\"");
    }
}

//! Raw ALSA MIDI ports.
//!
//! # Port names (for beginners)
//!
//! ALSA exposes every hardware MIDI port as a character device under
//! `/dev/snd`, named `midiC<card>D<device>`.  Reading from that file returns
//! the raw MIDI bytes the controller sends, with no sequencer in between.
//!
//! Users usually know the ALSA name instead (`amidi -l` prints it):
//!
//! | Name          | Device node              |
//! |---------------|--------------------------|
//! | `hw:1,0`      | `/dev/snd/midiC1D0`      |
//! | `hw:2,0,0`    | `/dev/snd/midiC2D0`      |
//! | `/dev/snd/midiC1D0` | used as-is         |
//!
//! The raw device node delivers every sub-device of a port, so the optional
//! third (`subdevice`) field is accepted but does not change the path.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(target_os = "linux")]
pub mod rawmidi;

/// Directory holding the ALSA device nodes.
pub const SND_DEVICE_DIR: &str = "/dev/snd";

/// Directory holding per-card ALSA information.
pub const PROC_ASOUND_DIR: &str = "/proc/asound";

/// Error type for MIDI port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The port name is neither `hw:<card>,<device>[,<sub>]` nor an absolute path.
    #[error("invalid MIDI port name '{0}' (expected hw:<card>,<device> or a device path)")]
    InvalidName(String),

    /// The device node could not be opened.
    #[error("cannot open MIDI port {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The opened device could not be registered with the async reactor.
    #[error("cannot watch MIDI port {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The device directory could not be read while listing ports.
    #[error("cannot list MIDI ports in {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One raw MIDI port found on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub card: u32,
    pub device: u32,
    /// Device node path.
    pub path: PathBuf,
    /// Card identifier from `/proc/asound/card<N>/id`, if readable.
    pub card_id: Option<String>,
}

impl PortInfo {
    /// The ALSA name of this port, e.g. `hw:1,0`.
    pub fn hw_name(&self) -> String {
        format!("hw:{},{}", self.card, self.device)
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<10} {}", self.hw_name(), self.path.display())?;
        if let Some(id) = &self.card_id {
            write!(f, "  ({id})")?;
        }
        Ok(())
    }
}

/// Resolves a port name to its device node under [`SND_DEVICE_DIR`].
///
/// # Errors
///
/// Returns [`PortError::InvalidName`] for anything that is neither an ALSA
/// `hw:` name nor an absolute path.
pub fn resolve_port_path(name: &str) -> Result<PathBuf, PortError> {
    resolve_port_path_in(name, Path::new(SND_DEVICE_DIR))
}

/// Like [`resolve_port_path`], with an explicit device directory.
pub fn resolve_port_path_in(name: &str, snd_dir: &Path) -> Result<PathBuf, PortError> {
    let name = name.trim();
    if name.starts_with('/') {
        return Ok(PathBuf::from(name));
    }

    let invalid = || PortError::InvalidName(name.to_string());
    let rest = name.strip_prefix("hw:").ok_or_else(invalid)?;

    let mut fields = rest.split(',').map(|f| f.trim().parse::<u32>());
    let card = fields.next().and_then(Result::ok).ok_or_else(invalid)?;
    let device = match fields.next() {
        None => 0,
        Some(field) => field.map_err(|_| invalid())?,
    };
    if let Some(sub) = fields.next() {
        sub.map_err(|_| invalid())?;
    }
    if fields.next().is_some() {
        return Err(invalid());
    }

    Ok(snd_dir.join(format!("midiC{card}D{device}")))
}

/// Lists the raw MIDI ports present on this machine, sorted by card and device.
///
/// # Errors
///
/// Returns [`PortError::List`] if [`SND_DEVICE_DIR`] cannot be read.
pub fn list_ports() -> Result<Vec<PortInfo>, PortError> {
    list_ports_in(Path::new(SND_DEVICE_DIR), Path::new(PROC_ASOUND_DIR))
}

/// Like [`list_ports`], with explicit device and `/proc/asound` directories.
pub fn list_ports_in(snd_dir: &Path, proc_dir: &Path) -> Result<Vec<PortInfo>, PortError> {
    let entries = std::fs::read_dir(snd_dir).map_err(|source| PortError::List {
        path: snd_dir.to_path_buf(),
        source,
    })?;

    let mut ports: Vec<PortInfo> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let file_name = entry.file_name();
            let (card, device) = parse_node_name(file_name.to_str()?)?;
            Some(PortInfo {
                card,
                device,
                path: entry.path(),
                card_id: read_card_id(proc_dir, card),
            })
        })
        .collect();

    ports.sort_by_key(|p| (p.card, p.device));
    Ok(ports)
}

/// Parses `midiC<card>D<device>` into its two numbers.
fn parse_node_name(name: &str) -> Option<(u32, u32)> {
    let rest = name.strip_prefix("midiC")?;
    let (card, device) = rest.split_once('D')?;
    Some((card.parse().ok()?, device.parse().ok()?))
}

fn read_card_id(proc_dir: &Path, card: u32) -> Option<String> {
    let id = std::fs::read_to_string(proc_dir.join(format!("card{card}")).join("id")).ok()?;
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("miditokb_ports_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ── resolve_port_path ─────────────────────────────────────────────────────

    #[test]
    fn test_hw_name_resolves_to_device_node() {
        // Arrange / Act
        let path = resolve_port_path("hw:1,0").unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/dev/snd/midiC1D0"));
    }

    #[test]
    fn test_hw_name_with_subdevice_ignores_subdevice() {
        let path = resolve_port_path("hw:2,1,3").unwrap();
        assert_eq!(path, PathBuf::from("/dev/snd/midiC2D1"));
    }

    #[test]
    fn test_hw_name_without_device_defaults_to_zero() {
        let path = resolve_port_path("hw:3").unwrap();
        assert_eq!(path, PathBuf::from("/dev/snd/midiC3D0"));
    }

    #[test]
    fn test_absolute_path_is_used_as_is() {
        let path = resolve_port_path("/tmp/fake-midi").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/fake-midi"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for name in ["", "hw:", "hw:x,0", "hw:1,y", "hw:1,0,z", "hw:1,0,0,0", "default", "midiC1D0"] {
            assert!(
                matches!(resolve_port_path(name), Err(PortError::InvalidName(_))),
                "'{name}' must be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_in_custom_directory() {
        let path = resolve_port_path_in("hw:0,0", Path::new("/run/snd")).unwrap();
        assert_eq!(path, PathBuf::from("/run/snd/midiC0D0"));
    }

    // ── list_ports ────────────────────────────────────────────────────────────

    #[test]
    fn test_list_ports_finds_midi_nodes_sorted_with_card_ids() {
        // Arrange
        let snd = temp_dir();
        let proc_dir = temp_dir();
        for name in ["midiC2D0", "controlC1", "midiC1D1", "pcmC0D0p", "midiC1D0"] {
            std::fs::write(snd.join(name), b"").unwrap();
        }
        std::fs::create_dir_all(proc_dir.join("card1")).unwrap();
        std::fs::write(proc_dir.join("card1").join("id"), "UMONE\n").unwrap();

        // Act
        let ports = list_ports_in(&snd, &proc_dir).unwrap();

        // Assert
        let names: Vec<String> = ports.iter().map(PortInfo::hw_name).collect();
        assert_eq!(names, vec!["hw:1,0", "hw:1,1", "hw:2,0"]);
        assert_eq!(ports[0].card_id.as_deref(), Some("UMONE"));
        assert_eq!(ports[2].card_id, None);

        // Cleanup
        std::fs::remove_dir_all(&snd).ok();
        std::fs::remove_dir_all(&proc_dir).ok();
    }

    #[test]
    fn test_list_ports_missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join(format!("miditokb_missing_{}", Uuid::new_v4()));
        let result = list_ports_in(&missing, &missing);
        assert!(matches!(result, Err(PortError::List { .. })));
    }

    #[test]
    fn test_port_info_display() {
        let info = PortInfo {
            card: 1,
            device: 0,
            path: PathBuf::from("/dev/snd/midiC1D0"),
            card_id: Some("UMONE".into()),
        };
        assert_eq!(info.to_string(), "hw:1,0     /dev/snd/midiC1D0  (UMONE)");
    }

    #[test]
    fn test_parse_node_name_rejects_other_nodes() {
        assert_eq!(parse_node_name("midiC10D2"), Some((10, 2)));
        assert_eq!(parse_node_name("midiCxD0"), None);
        assert_eq!(parse_node_name("hwC0D0"), None);
    }
}

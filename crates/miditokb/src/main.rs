//! miditokb entry point.
//!
//! Wires together the keymap, the raw MIDI port, the `uinput` virtual
//! keyboard and the event loop, then runs the loop on a single-threaded
//! Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::parse() + load_config()   -- CLI values override config.toml
//!  └─ MappingTable::load_file()      -- unreadable keymap → empty table
//!  └─ RawMidiInput::open()           -- hw:1,0 → /dev/snd/midiC1D0
//!  └─ UinputKeyboard::create()       -- input is closed if this fails
//!  └─ EventLoop::run()
//!       ├─ bytes      → Translator → KeyEmitter → uinput
//!       ├─ idle timer → stop
//!       └─ Ctrl+C / SIGTERM → ShutdownSignal → stop
//! ```
//!
//! # Exit status
//!
//! `0` when the session ends on Ctrl+C / SIGTERM or the idle timeout;
//! non-zero for startup failures and when the MIDI input fails or
//! disappears mid-session.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use miditokb::application::event_loop::{ExitReason, SessionSummary, ShutdownSignal};
use miditokb::infrastructure::midi_port::{list_ports, resolve_port_path};
use miditokb::infrastructure::storage::config::{
    idle_timeout_from_secs, load_config, load_config_from, AppConfig,
};
use miditokb_core::{MappingTable, TransportFilter};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Turn a MIDI controller into a macro keyboard.
///
/// Every note in the keymap file types a key combination on a virtual
/// keyboard when the note is played with a non-zero velocity.
#[derive(Debug, Parser)]
#[command(name = "miditokb", version)]
struct Cli {
    /// Keymap file: one `<note>,<KEY+KEY...>` rule per line.
    #[arg(short = 'k', long, env = "MIDITOKB_KEYMAP")]
    keymap: Option<PathBuf>,

    /// MIDI input port, `hw:<card>,<device>[,<sub>]` or a device path.
    #[arg(short = 'p', long, env = "MIDITOKB_PORT")]
    port: Option<String>,

    /// Stop after this many seconds without MIDI input (0 disables).
    #[arg(short = 't', long, value_name = "SECONDS", env = "MIDITOKB_TIMEOUT")]
    timeout: Option<f64>,

    /// Keep active-sensing (0xFE) bytes instead of filtering them out.
    #[arg(short = 'a', long)]
    active_sensing: bool,

    /// Keep clock (0xF8) bytes instead of filtering them out.
    #[arg(short = 'c', long)]
    clock: bool,

    /// List the raw MIDI ports and exit.
    #[arg(short = 'l', long, short_alias = 'L', alias = "list-rawmidis")]
    list_devices: bool,

    /// Config file (default: $XDG_CONFIG_HOME/miditokb/config.toml).
    #[arg(long, value_name = "FILE", env = "MIDITOKB_CONFIG")]
    config: Option<PathBuf>,
}

/// Fully resolved settings for one session.
#[derive(Debug)]
struct Settings {
    port: String,
    keymap: PathBuf,
    filter: TransportFilter,
    idle_timeout: Option<Duration>,
}

impl Cli {
    /// Loads the config file this invocation points at.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let config = match &self.config {
            Some(path) => load_config_from(path, true)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => load_config().context("loading config")?,
        };
        Ok(config)
    }

    /// Applies the command-line values on top of `config`.
    fn merge_into(&self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = &self.port {
            config.input.port = Some(port.clone());
        }
        if let Some(keymap) = &self.keymap {
            config.keymap.path = Some(keymap.clone());
        }
        if let Some(timeout) = self.timeout {
            config.input.idle_timeout_secs = timeout;
        }
        config.input.include_clock |= self.clock;
        config.input.include_active_sensing |= self.active_sensing;
        config
    }
}

impl Settings {
    /// Validates the merged configuration.
    fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(port) = config.input.port.clone() else {
            bail!("no MIDI port given (use -p/--port or [input] port in the config file)");
        };
        let Some(keymap) = config.keymap.path.clone() else {
            bail!("no keymap file given (use -k/--keymap or [keymap] path in the config file)");
        };
        let idle_timeout = idle_timeout_from_secs(config.input.idle_timeout_secs)?;

        Ok(Self {
            port,
            keymap,
            filter: config.input.transport_filter(),
            idle_timeout,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.merge_into(cli.load_config()?);

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    if cli.list_devices {
        return print_ports();
    }

    let settings = Settings::from_config(&config)?;
    info!(
        "miditokb starting: port={}, keymap={}, idle timeout={:?}",
        settings.port,
        settings.keymap.display(),
        settings.idle_timeout
    );

    let table = match MappingTable::load_file(&settings.keymap) {
        Ok(table) => table,
        Err(e) => {
            error!("{e}; continuing with an empty keymap");
            MappingTable::new()
        }
    };
    if table.is_empty() {
        warn!("keymap has no entries; MIDI input will not type anything");
    } else {
        info!("loaded {} keymap entries", table.len());
    }

    let shutdown = ShutdownSignal::new();
    spawn_signal_handlers(shutdown.clone());

    let summary = run_session(&settings, table, shutdown).await?;

    if std::io::stdout().is_terminal() {
        println!("{} bytes read", summary.bytes_processed);
    }
    info!(
        "miditokb stopped: {} batches ({} raw bytes), {} actions, {} failed",
        summary.batches, summary.bytes_received, summary.actions_dispatched, summary.actions_failed
    );

    match summary.exit {
        ExitReason::Shutdown | ExitReason::IdleTimeout => Ok(()),
        ExitReason::InputClosed => bail!("MIDI input {} closed", settings.port),
        ExitReason::InputError(e) => {
            Err(anyhow::Error::new(e).context(format!("reading MIDI input {}", settings.port)))
        }
    }
}

/// Opens the port and the virtual keyboard, then runs the event loop.
#[cfg(target_os = "linux")]
async fn run_session(
    settings: &Settings,
    table: MappingTable,
    shutdown: ShutdownSignal,
) -> anyhow::Result<SessionSummary> {
    use miditokb::application::event_loop::EventLoop;
    use miditokb::application::translate::Translator;
    use miditokb::infrastructure::midi_port::rawmidi::RawMidiInput;
    use miditokb::infrastructure::virtual_keyboard::uinput::UinputKeyboard;

    let path = resolve_port_path(&settings.port)?;
    let input = RawMidiInput::open(&path)?;
    // `input` is dropped (closed) if this fails.
    let keyboard = UinputKeyboard::create()?;

    let translator = Translator::new(table, settings.filter, keyboard);
    let event_loop = EventLoop::new(input, translator, settings.idle_timeout, shutdown);
    Ok(event_loop.run().await)
}

#[cfg(not(target_os = "linux"))]
async fn run_session(
    settings: &Settings,
    _table: MappingTable,
    _shutdown: ShutdownSignal,
) -> anyhow::Result<SessionSummary> {
    resolve_port_path(&settings.port)?;
    bail!("miditokb requires Linux (ALSA raw MIDI and uinput)")
}

fn print_ports() -> anyhow::Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("no raw MIDI ports found");
    }
    for port in ports {
        println!("{port}");
    }
    Ok(())
}

/// Triggers `shutdown` on Ctrl+C, and on SIGTERM where available.
fn spawn_signal_handlers(shutdown: ShutdownSignal) {
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C");
                on_ctrl_c.trigger();
            }
            Err(e) => error!("failed to listen for Ctrl+C: {e}"),
        }
    });

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                if term.recv().await.is_some() {
                    info!("received SIGTERM");
                    shutdown.trigger();
                }
            }
            Err(e) => error!("failed to listen for SIGTERM: {e}"),
        }
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! EventLoop: the single-threaded wait / translate cycle.
//!
//! # State machine
//!
//! ```text
//!            ┌──────────── bytes read ────────────┐
//!            ▼                                     │
//!        WAITING ──── input ready ────▶ PROCESSING ┘
//!            │
//!            ├── shutdown signal ──┐
//!            ├── idle timeout ─────┼──▶ SHUTTING_DOWN ──▶ TERMINATED
//!            ├── EOF / read error ─┘
//! ```
//!
//! `WAITING` is a single `tokio::select!` over three sources: the shutdown
//! signal, the idle timer (only when configured), and one read from the MIDI
//! port.  The select is `biased` in that order, so when a shutdown request
//! and input become ready together the input is discarded.
//!
//! # Idle timer (for beginners)
//!
//! The idle timeout is a watchdog, not a deadline.  Every non-empty read
//! restarts the full countdown, even when the batch turned out to contain
//! only clock ticks that the transport filter removed.  Only `T` seconds of
//! complete silence end the session.
//!
//! # Resources
//!
//! The loop owns the reader and the translator (and with it the virtual
//! keyboard).  [`EventLoop::run`] consumes the loop and drops both before
//! returning, so the port and the `uinput` device are closed on every exit
//! path.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Notify;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use super::emit_keys::VirtualKeyboard;
use super::translate::Translator;

/// Size of a single read from the MIDI port.
pub const READ_BUFFER_SIZE: usize = 256;

/// Where the loop currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Waiting,
    Processing,
    ShuttingDown,
    Terminated,
}

/// Why the loop stopped.
#[derive(Debug)]
pub enum ExitReason {
    /// The shutdown signal was triggered (Ctrl+C, SIGTERM).
    Shutdown,
    /// No input arrived within the idle timeout.
    IdleTimeout,
    /// The port reported end of file (device gone).
    InputClosed,
    /// A read failed with an unrecoverable error.
    InputError(io::Error),
}

/// Totals reported when the loop terminates.
#[derive(Debug)]
pub struct SessionSummary {
    /// Bytes left after transport filtering; clock-only reads add nothing.
    pub bytes_processed: u64,
    /// Raw bytes read from the port, transport bytes included.
    pub bytes_received: u64,
    pub batches: u64,
    pub actions_dispatched: u64,
    pub actions_failed: u64,
    pub exit: ExitReason,
    /// Lifecycle state the loop finished in; always `Terminated`.
    pub state: LoopState,
}

impl SessionSummary {
    /// `true` if the session ended on request or by the idle timeout.
    pub fn is_success(&self) -> bool {
        matches!(self.exit, ExitReason::Shutdown | ExitReason::IdleTimeout)
    }
}

/// A cloneable, async-aware shutdown request flag.
///
/// Signal handlers call [`trigger`](Self::trigger); the event loop awaits
/// [`triggered`](Self::triggered) as one of its wake sources.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown and wakes every waiter.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Completes once shutdown has been requested.
    pub async fn triggered(&self) {
        loop {
            // Registered before the flag check so a trigger in between is not lost.
            let notified = self.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

/// The wait loop for one input session.
pub struct EventLoop<R, K> {
    reader: R,
    translator: Translator<K>,
    idle_timeout: Option<Duration>,
    shutdown: ShutdownSignal,
    state: LoopState,
}

impl<R, K> EventLoop<R, K>
where
    R: AsyncRead + Unpin,
    K: VirtualKeyboard,
{
    /// Creates a loop in the `Waiting` state.
    ///
    /// `idle_timeout` of `None` disables the idle timer.
    pub fn new(
        reader: R,
        translator: Translator<K>,
        idle_timeout: Option<Duration>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            reader,
            translator,
            idle_timeout,
            shutdown,
            state: LoopState::Waiting,
        }
    }

    /// Runs until shutdown, idle timeout, EOF or a read error, then releases
    /// the reader and the keyboard.
    pub async fn run(mut self) -> SessionSummary {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let mut bytes_processed = 0u64;
        let mut bytes_received = 0u64;
        let mut batches = 0u64;
        let mut actions_dispatched = 0u64;
        let mut actions_failed = 0u64;

        let idle_timeout = self.idle_timeout;
        let idle = sleep(idle_timeout.unwrap_or(Duration::ZERO));
        tokio::pin!(idle);

        let exit = loop {
            self.set_state(LoopState::Waiting);

            tokio::select! {
                biased;

                () = self.shutdown.triggered() => {
                    info!("shutdown requested");
                    break ExitReason::Shutdown;
                }

                () = &mut idle, if idle_timeout.is_some() => {
                    info!("no MIDI input for {:?}; stopping", idle_timeout.unwrap_or_default());
                    break ExitReason::IdleTimeout;
                }

                read = self.reader.read(&mut buf) => match read {
                    Ok(0) => {
                        info!("MIDI input closed");
                        break ExitReason::InputClosed;
                    }
                    Ok(n) => {
                        self.set_state(LoopState::Processing);
                        if let Some(timeout) = idle_timeout {
                            idle.as_mut().reset(Instant::now() + timeout);
                        }

                        let outcome = self.translator.process_batch(&buf[..n]);
                        bytes_received += n as u64;
                        bytes_processed += outcome.forwarded as u64;
                        batches += 1;
                        actions_dispatched += outcome.dispatched as u64;
                        actions_failed += outcome.failed as u64;
                    }
                    Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                        continue;
                    }
                    Err(e) => {
                        error!("MIDI input read failed: {e}");
                        break ExitReason::InputError(e);
                    }
                },
            }
        };

        self.set_state(LoopState::ShuttingDown);
        let EventLoop {
            reader,
            translator,
            state,
            ..
        } = self;
        drop(reader);
        drop(translator);
        let state = Self::terminate(state);

        SessionSummary {
            bytes_processed,
            bytes_received,
            batches,
            actions_dispatched,
            actions_failed,
            exit,
            state,
        }
    }

    fn terminate(from: LoopState) -> LoopState {
        debug!(
            "input port and virtual keyboard released; state {from:?} -> {:?}",
            LoopState::Terminated
        );
        LoopState::Terminated
    }

    fn set_state(&mut self, state: LoopState) {
        if self.state != state {
            debug!("state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

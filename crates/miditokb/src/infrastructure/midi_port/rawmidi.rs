//! Non-blocking reader for a raw MIDI device node.
//!
//! The device is opened with `O_NONBLOCK` and registered with the tokio
//! reactor through [`AsyncFd`].  The event loop then awaits it like any other
//! [`AsyncRead`], which is what lets a single `select!` wait on the port, the
//! idle timer, and the shutdown signal at the same time.
//!
//! A read that would block clears the readiness flag and waits again; it is
//! never surfaced to the caller.  When the controller is unplugged the kernel
//! reports the node readable and the next read fails, which ends the session.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::unix::AsyncFd;
use tokio::io::{AsyncRead, Interest, ReadBuf};
use tracing::{debug, info};

use super::PortError;

/// An open raw MIDI input port.
///
/// The file descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct RawMidiInput {
    inner: AsyncFd<File>,
    path: PathBuf,
}

impl RawMidiInput {
    /// Opens `path` read-only and non-blocking.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Open`] if the node cannot be opened and
    /// [`PortError::Register`] if it cannot be watched for readiness.
    pub fn open(path: &Path) -> Result<Self, PortError> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| PortError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let inner =
            AsyncFd::with_interest(file, Interest::READABLE).map_err(|source| {
                PortError::Register {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        info!("opened MIDI input {}", path.display());
        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Device node this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsyncRead for RawMidiInput {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            let mut guard = ready!(self.inner.poll_read_ready(cx))?;

            let unfilled = buf.initialize_unfilled();
            match guard.try_io(|inner| {
                let mut file: &File = inner.get_ref();
                file.read(unfilled)
            }) {
                Ok(Ok(len)) => {
                    buf.advance(len);
                    return Poll::Ready(Ok(()));
                }
                Ok(Err(err)) => return Poll::Ready(Err(err)),
                Err(_would_block) => continue,
            }
        }
    }
}

impl Drop for RawMidiInput {
    fn drop(&mut self) {
        debug!("closing MIDI input {}", self.path.display());
    }
}

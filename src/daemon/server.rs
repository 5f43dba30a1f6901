//! Daemon server — owns the datagram socket and runs the receive loop.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::net::UnixDatagram;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DiskwatchError, Result};
use crate::report::Reporter;

use super::protocol::{decode, MAX_DATAGRAM};

/// Outcome of clearing the bind address before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleCleanup {
    /// Nothing was there
    Absent,
    /// A leftover file was removed
    Removed,
}

/// Remove whatever a previous run left at `path`.
///
/// A missing file is the normal case. Any other failure is fatal: running
/// against a path we cannot clear would leave the bind in an unknown state.
pub fn clear_stale(path: &Path) -> Result<StaleCleanup> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(socket = %path.display(), "removed stale socket");
            Ok(StaleCleanup::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(StaleCleanup::Absent),
        Err(source) => Err(DiskwatchError::StaleRemoval {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Per-run receive counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Datagrams read from the socket
    pub received: u64,
    /// Datagrams decoded and reported
    pub decoded: u64,
    /// Datagrams dropped for not being exactly one message long
    pub skipped: u64,
}

/// A bound datagram socket at a filesystem path.
///
/// Dropping the endpoint logs its counters, unlinks the path, then closes the
/// socket. That is the only teardown, so it runs once on every exit path.
#[derive(Debug)]
pub struct Endpoint {
    socket: UnixDatagram,
    path: PathBuf,
    buf: Box<[u8; MAX_DATAGRAM]>,
    stats: ListenerStats,
}

impl Endpoint {
    /// Clear any stale file at `path`, then bind. Must run inside a tokio
    /// runtime.
    pub fn bind(path: &Path) -> Result<Self> {
        clear_stale(path)?;

        let socket = UnixDatagram::bind(path).map_err(|source| DiskwatchError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
        info!(socket = %path.display(), "starting up");

        Ok(Self {
            socket,
            path: path.to_path_buf(),
            buf: Box::new([0u8; MAX_DATAGRAM]),
            stats: ListenerStats::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counters accumulated by [`serve`] over the endpoint's lifetime.
    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    /// Wait for the next datagram and return its bytes.
    ///
    /// Datagrams longer than [`MAX_DATAGRAM`] come back truncated.
    pub async fn recv(&mut self) -> Result<&[u8]> {
        loop {
            match self.socket.recv(&mut self.buf[..]).await {
                Ok(n) => return Ok(&self.buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DiskwatchError::Receive(e)),
            }
        }
    }

    /// Tear down now instead of at end of scope.
    pub fn close(self) {}
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        info!(
            socket = %self.path.display(),
            received = self.stats.received,
            decoded = self.stats.decoded,
            skipped = self.stats.skipped,
            "closing socket"
        );
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(socket = %self.path.display(), error = %e, "failed to unlink socket"),
        }
    }
}

/// Receive, decode and report datagrams until `shutdown` completes.
///
/// Ranges are reported in arrival order. Payloads that are not exactly one
/// message long are counted and dropped without a report. Returns the
/// endpoint's counters.
pub async fn serve<R, F>(endpoint: &mut Endpoint, reporter: &mut R, shutdown: F) -> Result<ListenerStats>
where
    R: Reporter,
    F: Future,
{
    tokio::pin!(shutdown);

    loop {
        debug!("waiting to receive message");
        let payload = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            received = endpoint.recv() => received?,
        };
        let decoded = decode(payload);
        let len = payload.len();
        endpoint.stats.received += 1;

        match decoded {
            Some(range) => {
                reporter.report(&range)?;
                endpoint.stats.decoded += 1;
            }
            None => {
                endpoint.stats.skipped += 1;
                debug!(len, "ignoring payload of unexpected length");
            }
        }
    }

    Ok(endpoint.stats)
}

/// Bind the configured socket and serve until `shutdown` completes.
///
/// The endpoint is torn down before this returns, whether it returns `Ok`
/// or `Err`.
pub async fn run_daemon<R, F>(config: &Config, reporter: &mut R, shutdown: F) -> Result<ListenerStats>
where
    R: Reporter,
    F: Future,
{
    config.validate()?;
    let mut endpoint = Endpoint::bind(&config.socket_path)?;
    serve(&mut endpoint, reporter, shutdown).await
}

/// Resolves on SIGINT or SIGTERM.
///
/// A signal that cannot be listened for is logged and never fires, so a
/// registration failure does not stop the daemon.
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                if term.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => debug!("SIGINT received"),
        _ = terminate => debug!("SIGTERM received"),
    }
}

//! # Diskwatch
//!
//! Receiving end of a changed-sector notification channel.
//!
//! A watcher on a block device emits one datagram per write, naming the first
//! sector touched and how many sectors follow. Diskwatch binds the Unix
//! datagram socket those notifications arrive on, decodes them and reports
//! each range.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diskwatch::{run_daemon, shutdown_signal, Config, LogReporter};
//!
//! # async fn demo() -> diskwatch::Result<()> {
//! let config = Config::default();
//! let stats = run_daemon(&config, &mut LogReporter, shutdown_signal()).await?;
//! println!("decoded {} ranges", stats.decoded);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod daemon;
pub mod error;
pub mod report;

// Re-exports for convenience
pub use config::{Config, Overrides, ReportFormat};
pub use daemon::{
    decode, encode, run_daemon, serve, shutdown_signal, Endpoint, ListenerStats, SectorRange,
    StaleCleanup,
};
pub use error::{DiskwatchError, Result};
pub use report::{JsonReporter, LogReporter, Reporter, VecReporter};

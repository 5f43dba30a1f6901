//! Daemon module — receives changed-sector notifications.
//!
//! A producer watching a block device sends one datagram per change to a
//! well-known Unix socket path. The daemon decodes each datagram into a
//! sector range and hands it to a [`Reporter`](crate::report::Reporter).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        producer (block-device hook)      │
//! │  - one 16-byte datagram per change      │
//! └─────────────────────────────────────────┘
//!           │
//!           │ /var/run/diskwatch (SOCK_DGRAM)
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │           diskwatch daemon               │
//! │  - single reader, arrival order         │
//! │  - decode (bit-reflected u64 pair)      │
//! │  - report (log or JSON lines)           │
//! └─────────────────────────────────────────┘
//! ```

pub mod protocol;
pub mod server;

pub use protocol::{decode, encode, reflect_bits, SectorRange, MAX_DATAGRAM, MESSAGE_LEN};
pub use server::{clear_stale, run_daemon, serve, shutdown_signal, Endpoint, ListenerStats, StaleCleanup};

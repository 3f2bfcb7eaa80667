//! # Global runtime configuration.
//!
//! [`Config`] holds what the supervisor core needs from the external
//! configuration layer — the deployment [`Mode`] and the probe host — plus
//! the timing knobs: readiness probing, liveness polling, shutdown grace,
//! and event bus capacity.
//!
//! Service ports are **not** configured here; each
//! [`ServiceDescriptor`](crate::ServiceDescriptor) carries its own expected
//! listening port, supplied by the calling environment.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use servisor::{Config, Mode};
//!
//! let mut cfg = Config::default();
//! cfg.mode = Mode::from_packaged(false);
//! cfg.grace = Duration::from_secs(5);
//!
//! assert_eq!(cfg.mode, Mode::Process);
//! assert_eq!(cfg.host, "127.0.0.1");
//! ```

use std::fmt;
use std::time::Duration;

/// Deployment mode, fixed for the supervisor's whole lifetime.
///
/// Selected once at start from the packaging flag resolved by the external
/// configuration layer; never mutated at runtime. After launch the
/// supervisor holds only mode-agnostic handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Each service runs as an isolated child process with captured output.
    Process,
    /// Each service runs as a concurrent worker inside the supervisor's own
    /// process, invoking a provided entry point directly.
    InProcess,
}

impl Mode {
    /// Maps the deployment-time "running from a self-contained packaged
    /// binary" flag to a mode: packaged builds run services in-process,
    /// source-tree runs spawn child processes.
    pub fn from_packaged(packaged: bool) -> Self {
        if packaged {
            Mode::InProcess
        } else {
            Mode::Process
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Process => f.write_str("process"),
            Mode::InProcess => f.write_str("in-process"),
        }
    }
}

/// Global configuration for the supervisor runtime.
///
/// Controls deployment mode, readiness probing, liveness polling, graceful
/// shutdown, and event bus capacity.
#[derive(Clone, Debug)]
pub struct Config {
    /// Deployment mode (process vs. in-process workers).
    pub mode: Mode,
    /// Host the readiness probe connects to.
    pub host: String,
    /// Overall time to wait for a service's port to accept connections.
    pub ready_timeout: Duration,
    /// Delay between readiness probe attempts; also the per-attempt connect
    /// timeout.
    pub probe_interval: Duration,
    /// Delay between liveness checks in the monitoring loop.
    pub poll_interval: Duration,
    /// Maximum time to wait for services to confirm stopped during shutdown.
    pub grace: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `mode = Mode::Process`
    /// - `host = "127.0.0.1"`
    /// - `ready_timeout = 30s`, `probe_interval = 1s`
    /// - `poll_interval = 2s`
    /// - `grace = 10s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            mode: Mode::Process,
            host: "127.0.0.1".to_string(),
            ready_timeout: Duration::from_secs(30),
            probe_interval: Duration::from_secs(1),
            poll_interval: Duration::from_secs(2),
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
        }
    }
}

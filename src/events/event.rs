//! # Runtime events emitted by the supervisor, runners, and relays.
//!
//! [`EventKind`] classifies events across the service lifecycle:
//! - **Launch events**: starting, started, launch failure
//! - **Readiness events**: waiting, ready, timeout
//! - **Run events**: relayed output lines, relay errors, unexpected exits,
//!   entry-point failures, clean stops
//! - **Shutdown events**: shutdown requested, all stopped, grace exceeded
//!
//! The [`Event`] struct carries the metadata the kind calls for: service
//! name, PID, port, reason, output line.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically in publish order. Per-service output lines are published by
//! a single relay task per stream, so their `seq` order matches the order
//! the service produced them.
//!
//! ## Example
//! ```rust
//! use servisor::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::ReadinessTimeout)
//!     .with_service("api")
//!     .with_port(9988);
//!
//! assert_eq!(ev.kind, EventKind::ReadinessTimeout);
//! assert_eq!(ev.service.as_deref(), Some("api"));
//! assert_eq!(ev.port, Some(9988));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Launch events ===
    /// A service is about to be launched.
    ///
    /// Sets: `service`.
    ServiceStarting,

    /// A service was launched.
    ///
    /// Sets: `service`; `pid` in process mode.
    ServiceStarted,

    /// A service could not be launched; the start sequence continues with
    /// the next descriptor.
    ///
    /// Sets: `service`, `reason`.
    LaunchFailed,

    // === Readiness events ===
    /// The supervisor started polling a service's port.
    ///
    /// Sets: `service`, `port`.
    WaitingReady,

    /// The service's port accepted a connection.
    ///
    /// Sets: `service`, `port`.
    ServiceReady,

    /// The service did not open its port within the configured timeout.
    /// Warning only; startup proceeds.
    ///
    /// Sets: `service`, `port`.
    ReadinessTimeout,

    /// The start sequence finished with at least one service running.
    AllServicesUp,

    // === Run events ===
    /// One line of a service's output.
    ///
    /// Sets: `service`, `line`.
    ServiceOutput,

    /// A relay failed to read from its stream and exited. Does not affect
    /// the service's liveness tracking.
    ///
    /// Sets: `service`, `reason`.
    RelayError,

    /// A previously live service was found dead during monitoring.
    ///
    /// Sets: `service`; `pid` in process mode.
    ServiceExited,

    /// An in-process entry point returned an error or panicked. The failure
    /// is service-level; the supervisor keeps running.
    ///
    /// Sets: `service`, `reason`.
    ServiceFailed,

    /// An in-process entry point returned cleanly (or confirmed a
    /// cooperative stop).
    ///
    /// Sets: `service`.
    ServiceStopped,

    // === Shutdown events ===
    /// Shutdown requested (OS signal observed or explicit request).
    ShutdownRequested,

    /// Every service confirmed stopped within the grace period.
    AllStopped,

    /// Grace period elapsed with services still running.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (rendered by log subscribers)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the service, if applicable.
    pub service: Option<Arc<str>>,
    /// OS process id (process-backed services only).
    pub pid: Option<u32>,
    /// TCP port involved (readiness events).
    pub port: Option<u16>,
    /// Human-readable reason (launch/relay/entry failures).
    pub reason: Option<Arc<str>>,
    /// One relayed output line (`ServiceOutput` only).
    pub line: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            pid: None,
            port: None,
            reason: None,
            line: None,
        }
    }

    /// Attaches a service name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches an OS process id.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches a TCP port.
    #[inline]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches one output line.
    #[inline]
    pub fn with_line(mut self, line: impl Into<Arc<str>>) -> Self {
        self.line = Some(line.into());
        self
    }
}

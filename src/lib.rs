//! # servisor
//!
//! **Servisor** is a local multi-service supervisor: it brings up a fixed
//! set of long-running services, waits for each to become network-reachable,
//! relays their output into one timestamped log stream, monitors liveness,
//! and performs coordinated shutdown on interrupt or when every service has
//! stopped.
//!
//! Each service runs in one of two mutually exclusive deployment modes,
//! chosen once at start: **process mode** (spawned child processes with
//! captured output) or **in-process mode** (concurrent workers invoking a
//! provided entry point inside the supervisor's address space). Both sit
//! behind the same handle contract, so everything after launch — readiness
//! gating, monitoring, shutdown — is mode-agnostic.
//!
//! ## Architecture
//! ```text
//!     ┌───────────────────┐      ┌───────────────────┐
//!     │ ServiceDescriptor │      │ ServiceDescriptor │
//!     │  (api, port 9988) │      │  (web, port 9989) │
//!     └─────────┬─────────┘      └─────────┬─────────┘
//!               ▼                          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                 │
//! │  - mode fixed at start: Process | InProcess                 │
//! │  - launch → readiness probe → next (strictly sequential)    │
//! │  - monitoring loop (liveness poll, shutdown flag)           │
//! │  - graceful shutdown with bounded grace                     │
//! └───────┬──────────────────────────────┬──────────────────────┘
//!         ▼                              ▼
//!  ProcessRunner                   WorkerRunner
//!  (child process,                 (tokio task running the
//!   piped stdout/stderr)            service's entry point)
//!         │                              │
//!         └──── Box<dyn ServiceHandle> ◄─┘
//!                     {name, pid, is_alive, terminate}
//!
//!  output relays ──► Bus (broadcast) ──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ## Lifecycle
//! ```text
//! run(descriptors)
//!   ├─► fatal if descriptors is empty
//!   ├─► for each descriptor, in order:
//!   │     launch (failure: logged, skipped)
//!   │     wait for port (timeout: warning, continue)
//!   ├─► AllServicesUp
//!   ├─► loop every poll_interval:
//!   │     dead handle  → ServiceExited, removed
//!   │     set empty    → AllStopped, done
//!   │     shutdown flag→ break
//!   └─► terminate remaining handles, poll up to `grace`
//!         all confirmed → AllStopped, Ok
//!         still running → GraceExceeded { stuck }
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use servisor::{Config, LogWriter, Mode, ServiceDescriptor, Subscribe, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), servisor::SupervisorError> {
//!     let mut cfg = Config::default();
//!     cfg.mode = Mode::from_packaged(false);
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::new(cfg, subs);
//!
//!     sup.run(vec![
//!         ServiceDescriptor::command(
//!             "api",
//!             9988,
//!             "python3",
//!             ["-m", "uvicorn", "api.main:app", "--port", "9988"],
//!             ".",
//!         ),
//!         ServiceDescriptor::command("web", 9989, "python3", ["start.py"], "./web"),
//!     ])
//!     .await
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod service;
mod subscribers;

// ---- Public re-exports ----

pub use crate::config::{Config, Mode};
pub use crate::core::{
    probe, ProcessHandle, ProcessRunner, ServiceHandle, Supervisor, WorkerHandle, WorkerRunner,
};
pub use crate::error::{LaunchError, ServiceError, SupervisorError};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::service::{EntryFn, EntryRef, Launch, ServiceDescriptor, ServiceEntry};
pub use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};

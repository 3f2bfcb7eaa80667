//! Runtime core: launch, readiness, monitoring, and shutdown.
//!
//! The public API from this module is [`Supervisor`] plus the handle/runner
//! types it hands out. One lifecycle contract covers both execution models:
//!
//! ```text
//! ServiceDescriptor ──► Supervisor::run()
//!        │                    │ mode selected once at start
//!        │          ┌─────────┴──────────┐
//!        ▼          ▼                    ▼
//!   Launch::Command / ProcessRunner  Launch::Entry / WorkerRunner
//!        │                    │
//!        └──── Box<dyn ServiceHandle> ◄──┘
//!                     │
//!        probe gate ─► monitoring loop ─► graceful shutdown
//! ```
//!
//! Internal modules:
//! - [`probe`]: TCP readiness gate;
//! - [`relay`]: per-stream output forwarding into the bus;
//! - [`process`]: child-process runner and handle;
//! - [`worker`]: in-process worker runner and handle;
//! - [`supervisor`]: start sequence, monitoring loop, shutdown;
//! - [`shutdown`]: cross-platform signal waiting.

mod handle;
pub mod probe;
mod process;
pub(crate) mod relay;
pub(crate) mod shutdown;
mod supervisor;
mod worker;

pub use handle::ServiceHandle;
pub use process::{ProcessHandle, ProcessRunner};
pub use supervisor::Supervisor;
pub use worker::{WorkerHandle, WorkerRunner};

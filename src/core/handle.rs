//! # Runtime handle to a launched service.
//!
//! [`ServiceHandle`] is the capability interface the supervisor holds after
//! launch: liveness, termination, identity. It erases the process/worker
//! split — after the launch-time choice of runner, the supervisor never
//! branches on deployment mode again.
//!
//! ## Rules
//! - `is_alive` is non-blocking in spirit: it may take a short internal
//!   lock but never waits on the service itself.
//! - `terminate` requests a **graceful** stop and is idempotent: a second
//!   call on an already-stopped handle is a no-op, never an error.
//! - A handle stays in the supervisor's active set until its liveness
//!   check confirms the service stopped.

use async_trait::async_trait;

/// Capability interface over a launched service.
///
/// Two implementations exist: [`ProcessHandle`](crate::ProcessHandle)
/// (child process) and [`WorkerHandle`](crate::WorkerHandle) (in-process
/// worker).
#[async_trait]
pub trait ServiceHandle: Send + Sync {
    /// Returns the service name from its descriptor.
    fn name(&self) -> &str;

    /// Returns the OS process id for process-backed handles, `None` for
    /// in-process workers.
    fn pid(&self) -> Option<u32>;

    /// Reports whether the underlying process/worker is still running.
    async fn is_alive(&self) -> bool;

    /// Requests a graceful stop. Idempotent; completion is observed through
    /// [`ServiceHandle::is_alive`], not awaited here.
    async fn terminate(&self);
}

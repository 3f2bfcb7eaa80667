//! # In-process service entry points.
//!
//! A [`ServiceEntry`] is the serve loop of a service run inside the
//! supervisor's own process. It receives a [`CancellationToken`] and should
//! check it to stop cooperatively during shutdown — the supervisor never
//! interrupts a worker forcibly, so an entry that ignores its token can only
//! be stopped by exiting the whole process.
//!
//! [`EntryFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing
//! a fresh future per launch; shared state goes through an explicit `Arc`
//! inside the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use servisor::{EntryFn, EntryRef, ServiceError};
//!
//! let entry: EntryRef = EntryFn::arc(|ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok::<(), ServiceError>(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;

/// Shared reference to an entry point.
pub type EntryRef = Arc<dyn ServiceEntry>;

/// # Asynchronous, cancelable serve loop.
///
/// Implementations should bind their port early (the readiness probe gates
/// on it) and then serve until `ctx` is cancelled.
#[async_trait]
pub trait ServiceEntry: Send + Sync + 'static {
    /// Runs the service until completion or cancellation.
    ///
    /// Return [`ServiceError::Canceled`] (or `Ok(())`) after observing
    /// cancellation; any other error is reported as a service-level failure.
    async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError>;
}

/// Closure-backed entry point implementation.
pub struct EntryFn<F> {
    f: F,
}

impl<F> EntryFn<F> {
    /// Creates a new closure-backed entry point.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the entry and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> ServiceEntry for EntryFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        (self.f)(ctx).await
    }
}

//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging custom event handlers
//! into the runtime. Each subscriber gets a dedicated worker task and a
//! bounded queue; a slow subscriber affects only itself, and a panicking
//! one is isolated and reported without touching the supervisor.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Events arrive in FIFO order per subscriber.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's dedicated worker task, never in the
    /// publisher's context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in drop/panic diagnostics.
    ///
    /// Prefer short names ("console", "metrics"); the default is the type
    /// name, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// When the queue is full the new event is dropped **for this
    /// subscriber only** and a diagnostic is written to stderr. Clamped to
    /// a minimum of 1. Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

//! # Worker runner: services as in-process concurrent workers.
//!
//! [`WorkerRunner::launch`] runs a descriptor's entry point as a tokio task
//! sharing the supervisor's address space. The returned [`WorkerHandle`]
//! reports liveness through worker-completion signaling and terminates by
//! cancelling the worker's token.
//!
//! ## Rules
//! - Termination is **cooperative only**: the entry runs the service's own
//!   serve loop, and if that loop never checks its token the worker cannot
//!   be interrupted short of exiting the whole process. The supervisor's
//!   shutdown path bounds its wait and then reports the worker stuck rather
//!   than aborting it.
//! - An error returned by the entry, or a panic escaping it, is caught at
//!   the worker boundary and published as a service-level failure — never a
//!   supervisor-level crash.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::handle::ServiceHandle;
use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::service::{EntryRef, ServiceDescriptor};

/// Launches services as in-process workers.
pub struct WorkerRunner;

impl WorkerRunner {
    /// Starts `entry` as a concurrently-scheduled worker.
    ///
    /// Launch itself cannot fail: the entry's own startup problems surface
    /// as a `ServiceFailed` event followed by worker completion.
    pub fn launch(desc: &ServiceDescriptor, entry: EntryRef, bus: &Bus) -> WorkerHandle {
        let name = desc.name_arc();
        let stop = CancellationToken::new();
        let worker = tokio::spawn(run_entry(
            Arc::clone(&name),
            entry,
            stop.clone(),
            bus.clone(),
        ));

        WorkerHandle { name, stop, worker }
    }
}

/// Drives one entry point and publishes its terminal outcome.
async fn run_entry(name: Arc<str>, entry: EntryRef, ctx: CancellationToken, bus: Bus) {
    let outcome = std::panic::AssertUnwindSafe(entry.run(ctx)).catch_unwind().await;
    match outcome {
        Ok(Ok(())) | Ok(Err(ServiceError::Canceled)) => {
            bus.publish(Event::now(EventKind::ServiceStopped).with_service(name));
        }
        Ok(Err(e)) => {
            bus.publish(
                Event::now(EventKind::ServiceFailed)
                    .with_service(name)
                    .with_reason(e.to_string()),
            );
        }
        Err(panic) => {
            let info = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "entry point panicked".to_string());
            bus.publish(
                Event::now(EventKind::ServiceFailed)
                    .with_service(name)
                    .with_reason(info),
            );
        }
    }
}

/// Handle to a service running as an in-process worker.
pub struct WorkerHandle {
    name: Arc<str>,
    stop: CancellationToken,
    worker: JoinHandle<()>,
}

#[async_trait]
impl ServiceHandle for WorkerHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn pid(&self) -> Option<u32> {
        None
    }

    async fn is_alive(&self) -> bool {
        !self.worker.is_finished()
    }

    async fn terminate(&self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    use crate::service::EntryFn;

    fn desc(name: &str) -> ServiceDescriptor {
        // entry attached per-test through WorkerRunner::launch
        ServiceDescriptor::command(name.to_string(), 0, "unused", Vec::<String>::new(), ".")
    }

    async fn wait_until_dead(handle: &WorkerHandle, within: Duration) -> bool {
        let deadline = time::Instant::now() + within;
        while time::Instant::now() < deadline {
            if !handle.is_alive().await {
                return true;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn worker_is_alive_until_entry_returns() {
        let bus = Bus::new(16);
        let entry = EntryFn::arc(|_ctx: CancellationToken| async {
            time::sleep(Duration::from_millis(200)).await;
            Ok::<(), ServiceError>(())
        });
        let handle = WorkerRunner::launch(&desc("api"), entry, &bus);

        assert!(handle.is_alive().await);
        assert!(handle.pid().is_none());
        assert!(wait_until_dead(&handle, Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn cancel_stops_a_cooperative_entry() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let entry = EntryFn::arc(|ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), ServiceError>(ServiceError::Canceled)
        });
        let handle = WorkerRunner::launch(&desc("web"), entry, &bus);
        assert!(handle.is_alive().await);

        handle.terminate().await;
        assert!(wait_until_dead(&handle, Duration::from_secs(2)).await);

        // cooperative stop is a clean stop, not a failure
        let ev = time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event in time")
            .expect("event");
        assert_eq!(ev.kind, EventKind::ServiceStopped);

        // second request is a no-op
        handle.terminate().await;
    }

    #[tokio::test]
    async fn entry_error_is_a_service_level_failure() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let entry = EntryFn::arc(|_ctx: CancellationToken| async {
            Err::<(), ServiceError>(ServiceError::Fail {
                error: "bind refused".into(),
            })
        });
        let handle = WorkerRunner::launch(&desc("api"), entry, &bus);
        assert!(wait_until_dead(&handle, Duration::from_secs(2)).await);

        let ev = time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event in time")
            .expect("event");
        assert_eq!(ev.kind, EventKind::ServiceFailed);
        assert!(ev.reason.as_deref().unwrap_or_default().contains("bind refused"));
    }

    async fn exploding(_ctx: CancellationToken) -> Result<(), ServiceError> {
        panic!("entry blew up")
    }

    #[tokio::test]
    async fn panic_is_caught_at_the_worker_boundary() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let entry = EntryFn::arc(|ctx: CancellationToken| exploding(ctx));
        let handle = WorkerRunner::launch(&desc("web"), entry, &bus);
        assert!(wait_until_dead(&handle, Duration::from_secs(2)).await);

        let ev = time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event in time")
            .expect("event");
        assert_eq!(ev.kind, EventKind::ServiceFailed);
        assert!(ev.reason.as_deref().unwrap_or_default().contains("entry blew up"));
    }
}

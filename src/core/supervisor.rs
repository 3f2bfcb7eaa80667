//! # Supervisor: sequential launch, liveness monitoring, graceful shutdown.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], the fixed
//! deployment mode, and the collection of active service handles. It drives
//! one lifecycle:
//!
//! ```text
//! Idle ──► Launching(0..N) ──► Ready ──► Monitoring ──► ShuttingDown ──► Stopped
//!
//! Launching(i):
//!   - select runner by mode (ProcessRunner | WorkerRunner)
//!   - launch descriptor i   → failure: LaunchFailed event, continue with i+1
//!   - block on readiness probe for descriptor i's port
//!        → timeout: ReadinessTimeout warning, continue with i+1
//!
//! Monitoring (every poll_interval):
//!   - poll each handle's liveness; dead handles → ServiceExited, removed
//!   - exit when: shutdown flag raised (signal / request_shutdown)
//!                or zero live handles remain
//!
//! ShuttingDown:
//!   - terminate every remaining handle (graceful signal / cooperative cancel)
//!   - poll liveness until the set empties or `grace` elapses
//!        → AllStopped + Ok, or GraceExceeded + Err { stuck }
//! ```
//!
//! Partial failure is tolerated: one dead service is logged and dropped, and
//! monitoring continues while at least one handle remains live.
//!
//! ## Concurrency
//! Output relays and entry-point workers outlive the calls that started
//! them and end on their own when their stream/serve loop closes; the
//! supervisor never cancels relays. The active-handle collection sits
//! behind an async mutex — appends happen only during the strictly
//! sequential launch phase, removals only in monitoring/shutdown, and every
//! mutation is a critical section.
//!
//! ## Example
//! ```no_run
//! use servisor::{Config, Mode, ServiceDescriptor, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), servisor::SupervisorError> {
//!     let mut cfg = Config::default();
//!     cfg.mode = Mode::from_packaged(false);
//!
//!     let services = vec![
//!         ServiceDescriptor::command("api", 9988, "python3", ["api.py"], "."),
//!         ServiceDescriptor::command("web", 9989, "python3", ["web.py"], "."),
//!     ];
//!
//!     let sup = Supervisor::new(cfg, vec![]);
//!     sup.run(services).await
//! }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, Mode};
use crate::core::{probe, shutdown, ProcessRunner, ServiceHandle, WorkerRunner};
use crate::error::{LaunchError, SupervisorError};
use crate::events::{Bus, Event, EventKind};
use crate::service::{Launch, ServiceDescriptor};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Coordinates service launch, readiness gating, liveness monitoring, and
/// graceful shutdown over a fixed set of descriptors.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    handles: Mutex<Vec<Box<dyn ServiceHandle>>>,
    shutdown: CancellationToken,
}

impl Supervisor {
    /// Creates a new supervisor with the given config and subscribers.
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(subscribers));
        Self {
            cfg,
            bus,
            subs,
            handles: Mutex::new(Vec::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns the event bus (for extra subscribers or test assertions).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Raises the shutdown flag, exactly as an OS signal would.
    ///
    /// The monitoring loop observes it within one poll interval. Safe to
    /// call more than once.
    pub fn request_shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            self.bus.publish(Event::now(EventKind::ShutdownRequested));
            self.shutdown.cancel();
        }
    }

    /// Names of services currently held in the active set.
    pub async fn active(&self) -> Vec<String> {
        self.handles
            .lock()
            .await
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    /// Runs the full lifecycle over the given descriptors until every
    /// service has stopped or a shutdown request completes.
    ///
    /// Launch failures and readiness timeouts are logged and skipped; the
    /// only fatal startup condition is an empty descriptor list.
    pub async fn run(&self, services: Vec<ServiceDescriptor>) -> Result<(), SupervisorError> {
        if services.is_empty() {
            return Err(SupervisorError::NoServices);
        }

        self.subscriber_listener();
        self.watch_signals();

        self.launch_all(&services).await;
        self.monitor().await;
        self.shutdown_all().await
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Turns OS signal delivery into the shutdown flag.
    fn watch_signals(&self) {
        let bus = self.bus.clone();
        let token = self.shutdown.clone();
        tokio::spawn(async move {
            if shutdown::wait_for_signal().await.is_ok() && !token.is_cancelled() {
                bus.publish(Event::now(EventKind::ShutdownRequested));
                token.cancel();
            }
        });
    }

    /// Launching(0..N): launch each descriptor in order, gating on its
    /// readiness probe before starting the next.
    async fn launch_all(&self, services: &[ServiceDescriptor]) {
        for desc in services {
            // an interrupt mid-sequence aborts the remaining launches
            if self.shutdown.is_cancelled() {
                return;
            }

            self.bus
                .publish(Event::now(EventKind::ServiceStarting).with_service(desc.name_arc()));

            let handle = match self.launch(desc) {
                Ok(handle) => handle,
                Err(e) => {
                    self.bus.publish(
                        Event::now(EventKind::LaunchFailed)
                            .with_service(desc.name_arc())
                            .with_reason(e.to_string()),
                    );
                    continue;
                }
            };

            let mut started = Event::now(EventKind::ServiceStarted).with_service(desc.name_arc());
            if let Some(pid) = handle.pid() {
                started = started.with_pid(pid);
            }
            self.bus.publish(started);
            self.handles.lock().await.push(handle);

            self.bus.publish(
                Event::now(EventKind::WaitingReady)
                    .with_service(desc.name_arc())
                    .with_port(desc.port()),
            );
            let ready = probe::wait(
                &self.cfg.host,
                desc.port(),
                self.cfg.ready_timeout,
                self.cfg.probe_interval,
            )
            .await;
            let kind = if ready {
                EventKind::ServiceReady
            } else {
                EventKind::ReadinessTimeout
            };
            self.bus.publish(
                Event::now(kind)
                    .with_service(desc.name_arc())
                    .with_port(desc.port()),
            );
        }

        if !self.handles.lock().await.is_empty() {
            self.bus.publish(Event::now(EventKind::AllServicesUp));
        }
    }

    /// Selects the runner variant for the supervisor's fixed mode. This is
    /// the only point where deployment mode is consulted after startup.
    fn launch(&self, desc: &ServiceDescriptor) -> Result<Box<dyn ServiceHandle>, LaunchError> {
        match (self.cfg.mode, desc.launch()) {
            (Mode::Process, Launch::Command { .. }) => {
                ProcessRunner::launch(desc, &self.bus).map(|h| Box::new(h) as Box<dyn ServiceHandle>)
            }
            (Mode::InProcess, Launch::Entry(entry)) => Ok(Box::new(WorkerRunner::launch(
                desc,
                Arc::clone(entry),
                &self.bus,
            ))),
            (mode, _) => Err(LaunchError::Directive {
                service: desc.name().to_string(),
                mode,
            }),
        }
    }

    /// Monitoring: poll handle liveness until shutdown is requested or no
    /// live handle remains.
    async fn monitor(&self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return,
                _ = time::sleep(self.cfg.poll_interval) => {}
            }

            let mut handles = self.handles.lock().await;
            let mut live = Vec::with_capacity(handles.len());
            for handle in handles.drain(..) {
                if handle.is_alive().await {
                    live.push(handle);
                } else {
                    let mut ev =
                        Event::now(EventKind::ServiceExited).with_service(handle.name().to_string());
                    if let Some(pid) = handle.pid() {
                        ev = ev.with_pid(pid);
                    }
                    self.bus.publish(ev);
                }
            }
            *handles = live;

            if handles.is_empty() {
                self.bus.publish(Event::now(EventKind::AllStopped));
                return;
            }
        }
    }

    /// ShuttingDown: terminate every remaining handle, then poll liveness
    /// until the set empties or the grace period elapses.
    async fn shutdown_all(&self) -> Result<(), SupervisorError> {
        let mut handles = self.handles.lock().await;
        if handles.is_empty() {
            return Ok(());
        }

        for handle in handles.iter() {
            handle.terminate().await;
        }

        let deadline = Instant::now() + self.cfg.grace;
        loop {
            let mut still_running = Vec::with_capacity(handles.len());
            for handle in handles.drain(..) {
                if handle.is_alive().await {
                    still_running.push(handle);
                }
            }
            *handles = still_running;

            if handles.is_empty() {
                self.bus.publish(Event::now(EventKind::AllStopped));
                return Ok(());
            }
            if Instant::now() >= deadline {
                let stuck: Vec<String> =
                    handles.iter().map(|h| h.name().to_string()).collect();
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                return Err(SupervisorError::GraceExceeded {
                    grace: self.cfg.grace,
                    stuck,
                });
            }
            time::sleep(self.cfg.probe_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    use crate::error::ServiceError;
    use crate::service::EntryFn;

    /// Timings scaled down so a whole lifecycle fits in a test.
    fn test_cfg(mode: Mode) -> Config {
        Config {
            mode,
            host: "127.0.0.1".to_string(),
            ready_timeout: Duration::from_millis(200),
            probe_interval: Duration::from_millis(50),
            poll_interval: Duration::from_millis(50),
            grace: Duration::from_secs(2),
            bus_capacity: 256,
        }
    }

    async fn next_event_of(
        rx: &mut tokio::sync::broadcast::Receiver<Event>,
        kind: EventKind,
        within: Duration,
    ) -> Event {
        time::timeout(within, async {
            loop {
                let ev = rx.recv().await.expect("event stream open");
                if ev.kind == kind {
                    return ev;
                }
            }
        })
        .await
        .unwrap_or_else(|_| panic!("no {kind:?} event within {within:?}"))
    }

    #[tokio::test]
    async fn empty_descriptor_set_is_fatal() {
        let sup = Supervisor::new(test_cfg(Mode::Process), vec![]);
        let err = sup.run(vec![]).await.expect_err("must fail");
        assert!(matches!(err, SupervisorError::NoServices));
    }

    #[tokio::test]
    async fn directive_mismatch_is_logged_and_skipped() {
        let sup = Supervisor::new(test_cfg(Mode::Process), vec![]);
        let mut rx = sup.bus().subscribe();

        let entry =
            EntryFn::arc(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) });
        let services = vec![ServiceDescriptor::in_process("api", 9988, entry)];

        // nothing launches, so the run drains to Ok on its own
        sup.run(services).await.expect("run completes");
        let ev = next_event_of(&mut rx, EventKind::LaunchFailed, Duration::from_secs(1)).await;
        assert!(ev
            .reason
            .as_deref()
            .unwrap_or_default()
            .contains("does not match"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn single_early_exit_is_not_total_failure() {
        let sup = Arc::new(Supervisor::new(test_cfg(Mode::Process), vec![]));
        let mut rx = sup.bus().subscribe();

        let services = vec![
            ServiceDescriptor::command("flaky", 1, "sh", ["-c", "exit 1"], "."),
            ServiceDescriptor::command("steady", 2, "sh", ["-c", "sleep 30"], "."),
        ];

        let runner = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.run(services).await })
        };

        // the early exit is observed and logged...
        next_event_of(&mut rx, EventKind::ServiceExited, Duration::from_secs(5)).await;
        // ...but with one service still live the supervisor keeps monitoring
        time::sleep(Duration::from_millis(300)).await;
        assert!(!runner.is_finished(), "one live handle must keep the run going");
        assert_eq!(sup.active().await, vec!["steady".to_string()]);

        sup.request_shutdown();
        let res = time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run ends after shutdown request")
            .expect("join");
        assert!(res.is_ok(), "graceful stop within grace: {res:?}");
    }

    #[tokio::test]
    async fn all_exited_ends_the_run_without_interrupt() {
        let cfg = test_cfg(Mode::InProcess);
        let sup = Supervisor::new(cfg, vec![]);
        let mut rx = sup.bus().subscribe();

        let entry =
            EntryFn::arc(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) });
        let services = vec![ServiceDescriptor::in_process("oneshot", 1, entry)];

        time::timeout(Duration::from_secs(5), sup.run(services))
            .await
            .expect("run ends once the only worker stops")
            .expect("clean result");
        next_event_of(&mut rx, EventKind::AllStopped, Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn unresponsive_worker_exceeds_grace() {
        let mut cfg = test_cfg(Mode::InProcess);
        cfg.grace = Duration::from_millis(200);
        let sup = Arc::new(Supervisor::new(cfg, vec![]));

        // ignores its token: cooperative stop can never complete
        let entry = EntryFn::arc(|_ctx: CancellationToken| async {
            time::sleep(Duration::from_secs(30)).await;
            Ok::<(), ServiceError>(())
        });
        let services = vec![ServiceDescriptor::in_process("stubborn", 1, entry)];

        let runner = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.run(services).await })
        };
        time::sleep(Duration::from_millis(400)).await;
        sup.request_shutdown();

        let res = time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run ends at grace deadline")
            .expect("join");
        match res {
            Err(SupervisorError::GraceExceeded { stuck, .. }) => {
                assert_eq!(stuck, vec!["stubborn".to_string()]);
            }
            other => panic!("expected GraceExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn end_to_end_two_services_reach_monitoring_then_stop() {
        let sup = Arc::new(Supervisor::new(test_cfg(Mode::InProcess), vec![]));
        let mut rx = sup.bus().subscribe();

        // trivial stub services: bind the expected port, then idle until
        // cancelled
        let serve = |port: u16| {
            EntryFn::arc(move |ctx: CancellationToken| async move {
                let listener = TcpListener::bind(("127.0.0.1", port))
                    .await
                    .map_err(|e| ServiceError::Fail { error: e.to_string() })?;
                loop {
                    tokio::select! {
                        _ = ctx.cancelled() => return Ok(()),
                        _ = listener.accept() => {}
                    }
                }
            })
        };
        let services = vec![
            ServiceDescriptor::in_process("api", 9988, serve(9988)),
            ServiceDescriptor::in_process("web", 9989, serve(9989)),
        ];

        let runner = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.run(services).await })
        };

        let ready = next_event_of(&mut rx, EventKind::ServiceReady, Duration::from_secs(5)).await;
        assert_eq!(ready.service.as_deref(), Some("api"));
        let ready = next_event_of(&mut rx, EventKind::ServiceReady, Duration::from_secs(5)).await;
        assert_eq!(ready.service.as_deref(), Some("web"));
        next_event_of(&mut rx, EventKind::AllServicesUp, Duration::from_secs(5)).await;

        // both remain under supervision until the interrupt arrives
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sup.active().await.len(), 2);

        sup.request_shutdown();
        next_event_of(&mut rx, EventKind::ShutdownRequested, Duration::from_secs(1)).await;
        let res = time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("run ends")
            .expect("join");
        assert!(res.is_ok(), "cooperative stubs stop within grace: {res:?}");
        next_event_of(&mut rx, EventKind::AllStopped, Duration::from_secs(1)).await;
    }
}

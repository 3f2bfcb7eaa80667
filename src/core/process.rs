//! # Process runner: services as isolated child processes.
//!
//! [`ProcessRunner::launch`] spawns the descriptor's command with stdout and
//! stderr captured and immediately wires both streams into output relays, so
//! no early output is lost. The returned [`ProcessHandle`] tracks liveness
//! through non-blocking `try_wait` and terminates with a graceful stop
//! signal, giving the child a chance to clean up.
//!
//! ## Rules
//! - Spawn failure returns [`LaunchError::Spawn`]; there is no retry.
//! - `terminate` sends SIGTERM (via `kill <pid>` on unix) — never an
//!   unconditional hard kill. On non-unix targets the runtime falls back to
//!   `start_kill`, the only stop primitive available there.
//! - A handle that already observed the child's exit treats `terminate` as
//!   a no-op.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::core::handle::ServiceHandle;
use crate::core::relay;
use crate::error::LaunchError;
use crate::events::Bus;
use crate::service::{Launch, ServiceDescriptor};

/// Launches services as child processes.
pub struct ProcessRunner;

impl ProcessRunner {
    /// Spawns the descriptor's command and starts relaying its output.
    ///
    /// Returns an error if the descriptor carries no command directive or
    /// the process cannot be started (missing executable, bad working
    /// directory).
    pub fn launch(desc: &ServiceDescriptor, bus: &Bus) -> Result<ProcessHandle, LaunchError> {
        let Launch::Command { program, args, cwd } = desc.launch() else {
            return Err(LaunchError::Directive {
                service: desc.name().to_string(),
                mode: crate::config::Mode::Process,
            });
        };

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                service: desc.name().to_string(),
                source,
            })?;

        let pid = child.id();
        if let Some(stdout) = child.stdout.take() {
            relay::spawn(desc.name_arc(), stdout, bus.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            relay::spawn(desc.name_arc(), stderr, bus.clone());
        }

        Ok(ProcessHandle {
            name: desc.name_arc(),
            pid,
            child: Mutex::new(child),
            exited: AtomicBool::new(false),
        })
    }
}

/// Handle to a service running as a child process.
#[derive(Debug)]
pub struct ProcessHandle {
    name: Arc<str>,
    pid: Option<u32>,
    child: Mutex<Child>,
    exited: AtomicBool,
}

impl ProcessHandle {
    /// Checks the child's exit status without blocking; records a seen exit
    /// so later calls (and `terminate`) short-circuit.
    async fn poll_exit(&self) -> bool {
        if self.exited.load(Ordering::Acquire) {
            return true;
        }
        let mut child = self.child.lock().await;
        match child.try_wait() {
            Ok(Some(_status)) => {
                self.exited.store(true, Ordering::Release);
                true
            }
            Ok(None) => false,
            // status unavailable: treat as stopped rather than poll forever
            Err(_) => {
                self.exited.store(true, Ordering::Release);
                true
            }
        }
    }
}

#[async_trait]
impl ServiceHandle for ProcessHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn pid(&self) -> Option<u32> {
        self.pid
    }

    async fn is_alive(&self) -> bool {
        !self.poll_exit().await
    }

    async fn terminate(&self) {
        if self.poll_exit().await {
            return;
        }

        #[cfg(unix)]
        {
            if let Some(pid) = self.pid {
                // `kill` without -9 sends SIGTERM: graceful, the child may
                // clean up before exiting.
                let _ = Command::new("kill").arg(pid.to_string()).status().await;
                return;
            }
        }

        let mut child = self.child.lock().await;
        let _ = child.start_kill();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    use crate::events::{Event, EventKind};

    fn sh(name: &str, script: &str) -> ServiceDescriptor {
        ServiceDescriptor::command(name.to_string(), 0, "sh", ["-c", script], ".")
    }

    async fn wait_until_dead(handle: &ProcessHandle, within: Duration) -> bool {
        let deadline = time::Instant::now() + within;
        while time::Instant::now() < deadline {
            if !handle.is_alive().await {
                return true;
            }
            time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test]
    async fn launch_reports_alive_until_exit() {
        let bus = Bus::new(64);
        let handle = ProcessRunner::launch(&sh("short", "sleep 0.3"), &bus).expect("launch");

        assert!(handle.is_alive().await, "alive right after launch");
        assert!(handle.pid().is_some());
        assert!(
            wait_until_dead(&handle, Duration::from_secs(3)).await,
            "process should exit on its own"
        );
    }

    #[tokio::test]
    async fn bad_program_fails_to_launch() {
        let bus = Bus::new(8);
        let desc = ServiceDescriptor::command("ghost", 0, "servisor-no-such-binary", ["x"], ".");
        let err = ProcessRunner::launch(&desc, &bus).expect_err("must fail");
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert_eq!(err.as_label(), "launch_spawn_failed");
    }

    #[tokio::test]
    async fn entry_directive_is_rejected() {
        use crate::error::ServiceError;
        use crate::service::EntryFn;
        use tokio_util::sync::CancellationToken;

        let bus = Bus::new(8);
        let entry =
            EntryFn::arc(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) });
        let desc = ServiceDescriptor::in_process("api", 9988, entry);
        let err = ProcessRunner::launch(&desc, &bus).expect_err("must fail");
        assert!(matches!(err, LaunchError::Directive { .. }));
    }

    #[tokio::test]
    async fn stdout_is_relayed() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let _handle = ProcessRunner::launch(&sh("echoer", "echo hello-relay"), &bus).expect("launch");

        let line = time::timeout(Duration::from_secs(3), async {
            loop {
                let ev: Event = rx.recv().await.expect("event");
                if ev.kind == EventKind::ServiceOutput {
                    return ev.line.as_deref().unwrap_or_default().to_string();
                }
            }
        })
        .await
        .expect("relayed line");
        assert_eq!(line, "hello-relay");
    }

    #[tokio::test]
    async fn terminate_stops_a_long_runner_and_is_idempotent() {
        let bus = Bus::new(8);
        let handle = ProcessRunner::launch(&sh("long", "sleep 30"), &bus).expect("launch");
        assert!(handle.is_alive().await);

        handle.terminate().await;
        assert!(
            wait_until_dead(&handle, Duration::from_secs(3)).await,
            "SIGTERM should stop the sleeper"
        );

        // second request against a stopped handle is a no-op
        handle.terminate().await;
        assert!(!handle.is_alive().await);
    }
}

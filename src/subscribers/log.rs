//! # Console log subscriber.
//!
//! [`LogWriter`] renders every runtime event as one timestamped line on
//! stdout — the unified log stream with per-service attribution:
//!
//! ```text
//! 2026-08-06 12:00:01 [INFO] starting api
//! 2026-08-06 12:00:01 [SUCCESS] api started (pid 4242)
//! 2026-08-06 12:00:01 [INFO] waiting for api (port 9988)
//! 2026-08-06 12:00:02 [api] Uvicorn running on http://0.0.0.0:9988
//! 2026-08-06 12:00:02 [SUCCESS] api ready (port 9988)
//! 2026-08-06 12:00:30 [WARNING] stopping all services
//! 2026-08-06 12:00:31 [SUCCESS] all services stopped
//! ```
//!
//! Level tags and the `[service]` output tag are colored with plain ANSI
//! escapes; terminals that cannot render them (historically the Windows
//! console) get uncolored text via [`LogWriter::plain`].

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::events::{Event, EventKind};

use super::Subscribe;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const PURPLE: &str = "\x1b[35m";

/// Timestamped console rendering of the event stream.
pub struct LogWriter {
    color: bool,
}

impl LogWriter {
    /// Creates a writer with colors enabled where the terminal usually
    /// supports them.
    pub fn new() -> Self {
        Self {
            color: cfg!(not(windows)),
        }
    }

    /// Creates a writer that never emits color escapes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn stamp(at: std::time::SystemTime) -> String {
        DateTime::<Local>::from(at).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn info(&self, at: std::time::SystemTime, msg: &str) {
        println!("{} {}{}", Self::stamp(at), self.paint("[INFO] ", BLUE), msg);
    }

    fn success(&self, at: std::time::SystemTime, msg: &str) {
        println!("{} {}{}", Self::stamp(at), self.paint("[SUCCESS] ", GREEN), msg);
    }

    fn warning(&self, at: std::time::SystemTime, msg: &str) {
        println!("{} {}{}", Self::stamp(at), self.paint("[WARNING] ", YELLOW), msg);
    }

    fn error(&self, at: std::time::SystemTime, msg: &str) {
        println!("{} {}{}", Self::stamp(at), self.paint("[ERROR] ", RED), msg);
    }

    fn service_line(&self, at: std::time::SystemTime, service: &str, line: &str) {
        let tag = self.paint(&format!("[{service}]"), PURPLE);
        println!("{} {} {}", Self::stamp(at), tag, line);
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let service = e.service.as_deref().unwrap_or("?");
        let reason = e.reason.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::ServiceStarting => self.info(e.at, &format!("starting {service}")),
            EventKind::ServiceStarted => match e.pid {
                Some(pid) => self.success(e.at, &format!("{service} started (pid {pid})")),
                None => self.success(e.at, &format!("{service} started (worker)")),
            },
            EventKind::LaunchFailed => {
                self.error(e.at, &format!("failed to start {service}: {reason}"))
            }
            EventKind::WaitingReady => {
                let port = e.port.unwrap_or_default();
                self.info(e.at, &format!("waiting for {service} (port {port})"));
            }
            EventKind::ServiceReady => {
                let port = e.port.unwrap_or_default();
                self.success(e.at, &format!("{service} ready (port {port})"));
            }
            EventKind::ReadinessTimeout => {
                let port = e.port.unwrap_or_default();
                self.warning(e.at, &format!("{service} not ready in time (port {port})"));
            }
            EventKind::AllServicesUp => self.success(e.at, "all services up"),
            EventKind::ServiceOutput => {
                self.service_line(e.at, service, e.line.as_deref().unwrap_or_default())
            }
            EventKind::RelayError => {
                self.error(e.at, &format!("{service} output read error: {reason}"))
            }
            EventKind::ServiceExited => match e.pid {
                Some(pid) => {
                    self.warning(e.at, &format!("{service} stopped unexpectedly (pid {pid})"))
                }
                None => self.warning(e.at, &format!("{service} stopped unexpectedly")),
            },
            EventKind::ServiceFailed => self.error(e.at, &format!("{service} failed: {reason}")),
            EventKind::ServiceStopped => self.info(e.at, &format!("{service} stopped")),
            EventKind::ShutdownRequested => self.warning(e.at, "stopping all services"),
            EventKind::AllStopped => self.success(e.at, "all services stopped"),
            EventKind::GraceExceeded => {
                self.warning(e.at, "some services did not stop within the grace period")
            }
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_writer_adds_no_escapes() {
        let w = LogWriter::plain();
        assert_eq!(w.paint("[INFO] ", BLUE), "[INFO] ");
    }

    #[test]
    fn colored_writer_wraps_and_resets() {
        let w = LogWriter { color: true };
        let painted = w.paint("[x]", PURPLE);
        assert!(painted.starts_with(PURPLE));
        assert!(painted.ends_with(RESET));
    }
}

//! Error types used by the supervisor runtime and supervised services.
//!
//! Three enums, matching the three failure surfaces:
//!
//! - [`SupervisorError`] — errors raised by the orchestration runtime itself.
//! - [`LaunchError`] — a single service could not be launched.
//! - [`ServiceError`] — errors returned by in-process service entry points.
//!
//! Launch failures and readiness timeouts are non-fatal to the overall run:
//! the supervisor logs them through the event stream and keeps going. The
//! only startup error that aborts the run is an empty descriptor set.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the supervisor runtime.
///
/// These represent failures of the orchestration itself, not of any single
/// supervised service.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// The supervisor was started with no service descriptors.
    ///
    /// This is a precondition violation reported immediately at startup;
    /// everything else the supervisor tolerates.
    #[error("no services to supervise")]
    NoServices,

    /// Shutdown grace period elapsed with services still running.
    ///
    /// The stuck services were asked to stop (graceful signal or cooperative
    /// cancel) but did not confirm within `grace`. No forced kill is
    /// attempted; the caller decides whether to exit anyway.
    #[error("shutdown grace {grace:?} exceeded; still running: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of services that did not confirm stopped in time.
        stuck: Vec<String>,
    },
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::NoServices => "supervisor_no_services",
            SupervisorError::GraceExceeded { .. } => "supervisor_grace_exceeded",
        }
    }
}

/// # Errors produced while launching one service.
///
/// A launch error is scoped to its descriptor: the supervisor logs it and
/// moves on to the next service (best-effort startup, not all-or-nothing).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The child process could not be spawned (missing executable, bad
    /// working directory, permissions).
    #[error("failed to spawn {service}: {source}")]
    Spawn {
        /// Name of the service whose spawn failed.
        service: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor's launch directive does not fit the supervisor's
    /// deployment mode (command directive in in-process mode or entry-point
    /// directive in process mode).
    #[error("{service}: launch directive does not match {mode} mode")]
    Directive {
        /// Name of the mismatched service.
        service: String,
        /// The supervisor's fixed deployment mode.
        mode: crate::config::Mode,
    },
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::Spawn { .. } => "launch_spawn_failed",
            LaunchError::Directive { .. } => "launch_directive_mismatch",
        }
    }
}

/// # Errors returned by in-process service entry points.
///
/// Entry points run until stopped; these are their terminal outcomes short
/// of a clean return. A panic escaping an entry point is caught at the
/// worker boundary and reported like [`ServiceError::Fail`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service's serve loop failed.
    #[error("service failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The service observed cancellation and stopped cooperatively.
    ///
    /// Treated as a clean stop, not a failure.
    #[error("service canceled")]
    Canceled,
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Canceled => "service_canceled",
        }
    }

    /// True when the error represents a cooperative stop rather than a fault.
    pub fn is_graceful(&self) -> bool {
        matches!(self, ServiceError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let e = SupervisorError::GraceExceeded {
            grace: Duration::from_secs(5),
            stuck: vec!["api".into()],
        };
        assert_eq!(e.as_label(), "supervisor_grace_exceeded");
        assert_eq!(
            SupervisorError::NoServices.as_label(),
            "supervisor_no_services"
        );
        assert_eq!(ServiceError::Canceled.as_label(), "service_canceled");
    }

    #[test]
    fn canceled_is_graceful() {
        assert!(ServiceError::Canceled.is_graceful());
        assert!(!ServiceError::Fail {
            error: "boom".into()
        }
        .is_graceful());
    }
}

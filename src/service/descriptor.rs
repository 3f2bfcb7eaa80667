//! # Static definition of one supervised service.
//!
//! A [`ServiceDescriptor`] bundles everything the supervisor needs to bring
//! a service up and gate on it: a stable name, a launch directive, and the
//! TCP port the service is expected to bind. Descriptors are immutable and
//! built once at startup by the calling environment — the supervisor never
//! constructs command lines itself, it only executes what it is given.
//!
//! The [`Launch`] directive has one variant per deployment mode:
//! - [`Launch::Command`] — full command line plus working directory, run as
//!   an isolated child process;
//! - [`Launch::Entry`] — an in-process entry point invoked directly by a
//!   worker task.
//!
//! ## Example
//! ```rust
//! use servisor::ServiceDescriptor;
//!
//! let api = ServiceDescriptor::command(
//!     "api",
//!     9988,
//!     "python3",
//!     ["-m", "uvicorn", "api.main:app", "--port", "9988"],
//!     "/srv/app",
//! );
//! assert_eq!(api.name(), "api");
//! assert_eq!(api.port(), 9988);
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::service::entry::EntryRef;

/// How a service is brought up.
#[derive(Clone)]
pub enum Launch {
    /// Spawn an external command as a child process.
    Command {
        /// Program to execute.
        program: String,
        /// Arguments, in order.
        args: Vec<String>,
        /// Working directory for the child.
        cwd: PathBuf,
    },
    /// Invoke an entry point as a worker inside the supervisor's process.
    Entry(EntryRef),
}

/// Static definition of one supervised service.
///
/// Exactly one descriptor exists per service; the supervisor creates at most
/// one handle per descriptor.
#[derive(Clone)]
pub struct ServiceDescriptor {
    name: Arc<str>,
    port: u16,
    launch: Launch,
}

impl ServiceDescriptor {
    /// Defines a service launched as a child process.
    pub fn command(
        name: impl Into<Arc<str>>,
        port: u16,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            port,
            launch: Launch::Command {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
                cwd: cwd.into(),
            },
        }
    }

    /// Defines a service run in-process through the given entry point.
    pub fn in_process(name: impl Into<Arc<str>>, port: u16, entry: EntryRef) -> Self {
        Self {
            name: name.into(),
            port,
            launch: Launch::Entry(entry),
        }
    }

    /// Returns the service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the service name as a shared handle (cheap to clone into
    /// events and relays).
    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Returns the TCP port the service is expected to bind.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the launch directive.
    pub fn launch(&self) -> &Launch {
        &self.launch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::service::entry::EntryFn;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn command_descriptor_keeps_directive() {
        let d = ServiceDescriptor::command("web", 9989, "sh", ["-c", "true"], "/tmp");
        assert_eq!(d.name(), "web");
        assert_eq!(d.port(), 9989);
        match d.launch() {
            Launch::Command { program, args, cwd } => {
                assert_eq!(program, "sh");
                assert_eq!(args, &["-c".to_string(), "true".to_string()]);
                assert_eq!(cwd, &PathBuf::from("/tmp"));
            }
            Launch::Entry(_) => panic!("expected command directive"),
        }
    }

    #[test]
    fn in_process_descriptor_keeps_entry() {
        let entry = EntryFn::arc(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) });
        let d = ServiceDescriptor::in_process("api", 9988, entry);
        assert!(matches!(d.launch(), Launch::Entry(_)));
    }
}

//! # Demo: startall
//!
//! Brings up two services as child processes, waits for their ports, and
//! supervises them until Ctrl-C.
//!
//! Stock `python3 -m http.server` stands in for the real services so the
//! demo runs anywhere; replace the descriptors with your own command lines
//! and working directories.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Config { mode: Process, .. }
//!   ├─► Supervisor::new + LogWriter subscriber
//!   ├─► run([api @ 9988, web @ 9989])
//!   │     launch api ─► wait port 9988 ─► launch web ─► wait port 9989
//!   │     monitoring loop (liveness every 2s)
//!   └─► Ctrl-C ─► graceful stop ─► exit 0
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example startall
//! ```

use std::sync::Arc;

use servisor::{
    Config, LogWriter, Mode, ServiceDescriptor, Subscribe, Supervisor, SupervisorError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Configure: running from a source tree, so services get their own
    //    processes.
    let mut cfg = Config::default();
    cfg.mode = Mode::from_packaged(false);

    // 2. Console logging for the unified stream.
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    // 3. Create the supervisor.
    let sup = Supervisor::new(cfg, subs);

    // 4. Describe the services: name, expected port, command line, cwd.
    let services = vec![
        ServiceDescriptor::command("api", 9988, "python3", ["-m", "http.server", "9988"], "."),
        ServiceDescriptor::command("web", 9989, "python3", ["-m", "http.server", "9989"], "."),
    ];

    // 5. Run until interrupted. A grace overrun is reported but still exits
    //    cleanly — the remaining children got their stop signal.
    match sup.run(services).await {
        Ok(()) => {}
        Err(e @ SupervisorError::GraceExceeded { .. }) => {
            eprintln!("[startall] {e}");
        }
        Err(e) => return Err(e.into()),
    }

    println!("[startall] done");
    Ok(())
}

//! # Demo: embedded
//!
//! The packaged-binary deployment: both services run as in-process workers
//! inside the supervisor's own process, each invoking its entry point
//! directly. The entries here are trivial TCP listeners that bind their
//! port and idle until cancelled — the shape any embedded serve loop takes.
//!
//! ## Run
//! ```bash
//! cargo run --example embedded
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use servisor::{
    Config, EntryFn, EntryRef, LogWriter, Mode, ServiceDescriptor, ServiceError, Subscribe,
    Supervisor, SupervisorError,
};

/// Builds an entry point that binds `port` and serves until cancelled.
fn stub_service(port: u16) -> EntryRef {
    EntryFn::arc(move |ctx: CancellationToken| async move {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| ServiceError::Fail { error: e.to_string() })?;
        println!("listening on {port}");
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                accepted = listener.accept() => {
                    // accept-and-drop; a real service would serve the socket
                    drop(accepted);
                }
            }
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Packaged mode: workers share the supervisor's address space.
    let mut cfg = Config::default();
    cfg.mode = Mode::from_packaged(true);

    // 2. Console logging.
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sup = Supervisor::new(cfg, subs);

    // 3. Descriptors carry the entry points instead of command lines.
    let services = vec![
        ServiceDescriptor::in_process("api", 9988, stub_service(9988)),
        ServiceDescriptor::in_process("web", 9989, stub_service(9989)),
    ];

    // 4. Run until Ctrl-C. Cooperative entries stop within the grace; an
    //    entry that ignores its token would be reported stuck instead.
    match sup.run(services).await {
        Ok(()) => {}
        Err(e @ SupervisorError::GraceExceeded { .. }) => {
            eprintln!("[embedded] {e}");
        }
        Err(e) => return Err(e.into()),
    }

    println!("[embedded] done");
    Ok(())
}

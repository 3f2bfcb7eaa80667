//! # TCP readiness probe.
//!
//! A service is ready when its expected port accepts connections. The probe
//! attempts a short-timeout TCP connect in a loop with a fixed polling
//! interval until either a connection succeeds or the overall deadline
//! elapses. Connection failure is the expected steady state while a service
//! is still starting, so the probe never surfaces errors — it only answers
//! yes or no.
//!
//! The probe is used purely as a launch gate; once a service is up, its
//! liveness is tracked through its handle, not its port.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{self, Instant};

/// Polls `host:port` until it accepts a connection or `timeout` elapses.
///
/// `interval` is both the delay between attempts and the per-attempt
/// connect timeout. Returns `true` as soon as a connection succeeds,
/// `false` once the deadline passes.
pub async fn wait(host: &str, port: u16, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;

    loop {
        match time::timeout(interval, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => return true,
            // refused, unreachable, or connect attempt timed out: keep polling
            Ok(Err(_)) | Err(_) => {}
        }

        if Instant::now() >= deadline {
            return false;
        }
        time::sleep(interval).await;
    }
}

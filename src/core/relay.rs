//! # Output relay: forwards a service's output into the event stream.
//!
//! One relay task runs per captured stream, concurrently with everything
//! else — a slow or chatty service never blocks another service's relay.
//! Each complete line is published as a [`EventKind::ServiceOutput`] event
//! tagged with the service name; the log subscriber adds the timestamp when
//! rendering.
//!
//! ## Rules
//! - The relay ends when the stream reaches EOF (service exited); stream
//!   closure is the natural termination signal, nothing cancels a relay.
//! - A read error is published as [`EventKind::RelayError`] and ends the
//!   relay; it is never fatal to the supervisor and does not affect the
//!   service's liveness tracking.
//! - Lines from one stream are published in the order they were read.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

use crate::events::{Bus, Event, EventKind};

/// Spawns a relay task reading `stream` line-by-line until EOF.
pub(crate) fn spawn<R>(service: Arc<str>, stream: R, bus: Bus) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    bus.publish(
                        Event::now(EventKind::ServiceOutput)
                            .with_service(Arc::clone(&service))
                            .with_line(line),
                    );
                }
                Ok(None) => break,
                Err(e) => {
                    bus.publish(
                        Event::now(EventKind::RelayError)
                            .with_service(Arc::clone(&service))
                            .with_reason(e.to_string()),
                    );
                    break;
                }
            }
        }
    })
}

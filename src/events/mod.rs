//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** that carries
//! the unified log stream: every lifecycle transition, warning, error, and
//! relayed output line the supervisor produces flows through here.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor`, `ProcessRunner`/`WorkerRunner` launch
//!   paths, output relays, the signal watcher.
//! - **Consumers**: `Supervisor::subscriber_listener()`, which fans events
//!   out to the [`SubscriberSet`](crate::subscribers::SubscriberSet).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

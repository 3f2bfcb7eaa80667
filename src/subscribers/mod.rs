//! Event subscribers: the consumers of the unified log stream.
//!
//! Every event the runtime publishes is fanned out to the configured
//! subscribers by a [`SubscriberSet`] owned by the
//! [`Supervisor`](crate::Supervisor):
//!
//! ```text
//! runners / relays / monitor ── publish ──► Bus ──► subscriber_listener
//!                                                        │
//!                                                 SubscriberSet::emit
//!                                            ┌──────────┼──────────┐
//!                                            ▼          ▼          ▼
//!                                       [queue S1]  [queue S2] [queue SN]
//!                                         worker      worker     worker
//!                                            ▼          ▼          ▼
//!                                       on_event()  on_event() on_event()
//! ```
//!
//! - [`Subscribe`] — the extension point (logging, metrics, alerts)
//! - [`SubscriberSet`] — per-subscriber bounded queue + worker, panic
//!   isolation
//! - [`LogWriter`] — timestamped console rendering of every event

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;

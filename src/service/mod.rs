//! Service definitions.
//!
//! - [`ServiceDescriptor`] — static definition of one supervised service
//!   (name, launch directive, expected listening port)
//! - [`Launch`] — the directive: external command line or in-process entry
//! - [`ServiceEntry`] — trait for in-process, cancelable serve loops
//! - [`EntryFn`] — closure-backed entry implementation
//! - [`EntryRef`] — shared entry handle (`Arc<dyn ServiceEntry>`)

mod descriptor;
mod entry;

pub use descriptor::{Launch, ServiceDescriptor};
pub use entry::{EntryFn, EntryRef, ServiceEntry};

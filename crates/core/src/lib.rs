//! Typed DevTools session for one attached browser target.
//!
//! [`Session`] wraps a runtime [`Connection`](devtools_runtime::Connection)
//! with the handful of Page, Runtime, CSS and Debugger calls the editor
//! bridge needs, and keeps append-only records of what the target reported
//! through events.

mod session;

pub use devtools_protocol as protocol;
pub use devtools_runtime::{Endpoint, Error, Result, list_targets};
pub use session::Session;
pub use session::records::Records;

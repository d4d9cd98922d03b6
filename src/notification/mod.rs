//! Email notification dispatch.
//!
//! `EmailDispatcher::dispatch` runs one request through template lookup,
//! rendering, delivery and logging:
//!
//! 1. Validate the request (no I/O on failure)
//! 2. Look up the active template (no log entry when missing)
//! 3. Render subject, HTML and plaintext bodies
//! 4. Send once through the injected `EmailGateway`
//! 5. Append exactly one `DeliveryAttempt` describing the outcome

mod dispatcher;
mod types;

pub use dispatcher::{DispatcherStats, DispatcherStatsSnapshot, EmailDispatcher};
pub use types::{DispatchError, DispatchReceipt, NotificationRequest};

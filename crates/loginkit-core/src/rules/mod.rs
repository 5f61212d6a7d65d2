//! Form-side rules.
//!
//! `validate` holds the pure pre-submission checks; `messages` maps a failed
//! gateway call to the message the form should display, flagging the
//! session-expired class that additionally schedules a deferred logout.

pub mod messages;
pub mod validate;

pub use messages::{describe_failure, FailureDisposition, Operation};
pub use validate::ValidationError;

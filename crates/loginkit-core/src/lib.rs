//! Loginkit core - the session/credential management library behind the
//! Loginkit account screens.
//!
//! The UI layer drives three pieces:
//! - [`SessionStore`]: the cached authenticated identity (token, name, email)
//! - [`AuthClient`]: login, registration, profile and password operations
//! - [`rules`]: local validation and HTTP-failure-to-message mapping
//!
//! A form validates its input with [`rules::validate`] (an invalid submission
//! never reaches the network), calls the gateway, and on failure picks a
//! display message with [`rules::messages::describe_failure`]. Only the
//! session-expired failure class takes a corrective action: the form
//! schedules a [`DeferredLogout`] that clears the store and redirects to the
//! login entry point two seconds later.

pub mod api;
pub mod auth;
pub mod config;
pub mod rules;

pub use api::{AuthClient, AuthError, ProfileUpdate};
pub use auth::{DeferredLogout, Session, SessionStore, SessionUpdate};
pub use config::Config;

//! Gateway module for the remote authentication API.
//!
//! This module provides the `AuthClient` for the login, registration,
//! profile-update and password-change exchanges, and the `AuthError` type
//! that classifies failed calls for the message-mapping rules.
//!
//! Authenticated requests carry the cached session token as a bearer
//! credential.

pub mod client;
pub mod error;

pub use client::{AuthClient, ProfileUpdate};
pub use error::AuthError;

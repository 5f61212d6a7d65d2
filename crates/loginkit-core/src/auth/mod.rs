//! Session state owned by the client.
//!
//! This module provides:
//! - `SessionStore`: the cached authenticated identity, persisted between
//!   launches as three independent keys (token, user name, user email)
//! - `DeferredLogout`: one-shot teardown of an expired session after a
//!   short grace delay
//!
//! There is no token expiry tracking and no encryption; the token is opaque
//! to the client and stays valid until the server rejects it.

pub mod logout;
pub mod session;

pub use logout::{DeferredLogout, LOGOUT_DELAY};
pub use session::{Session, SessionStore, SessionUpdate};

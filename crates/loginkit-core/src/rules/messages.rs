//! Mapping from failed gateway calls to user-facing messages.
//!
//! One table across the four operations, keyed on the HTTP status of the
//! failure (0 when the server was never reached). Most classes are terminal
//! for the attempt; the session-expired class instructs the caller to
//! schedule the deferred logout.

use crate::api::AuthError;

const MSG_BAD_CREDENTIALS: &str = "Incorrect email or password";
const MSG_USER_NOT_FOUND: &str = "User not found";
const MSG_LOGIN_RETRY: &str = "Could not log in. Please try again.";
const MSG_EMAIL_TAKEN: &str = "This email is already registered";
const MSG_EMAIL_IN_USE: &str = "This email is already in use";
const MSG_INVALID_EMAIL_FORMAT: &str = "Invalid email. Check the email format.";
const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
const MSG_INVALID_DATA: &str = "Invalid data. Check the fields and try again.";
const MSG_UNREACHABLE: &str =
    "Could not connect to the server. Check that the backend is running.";
const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const MSG_WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";
const MSG_SERVER_RETRY: &str = "Server error. Please try again later.";
const MSG_REGISTER_RETRY: &str = "Could not create your account. Please try again.";
const MSG_UPDATE_RETRY: &str = "Could not update your profile. Please try again.";
const MSG_PASSWORD_RETRY: &str = "Could not change your password. Please try again.";

/// Which gateway operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    UpdateProfile,
    ChangePassword,
}

/// What the form should do with a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Show the message; the user may retry.
    Message(String),
    /// Show the message, then schedule the deferred logout and redirect.
    SessionExpired(String),
}

impl FailureDisposition {
    pub fn message(&self) -> &str {
        match self {
            FailureDisposition::Message(m) | FailureDisposition::SessionExpired(m) => m,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, FailureDisposition::SessionExpired(_))
    }
}

/// Pick the user-facing outcome for a failed gateway call.
pub fn describe_failure(op: Operation, error: &AuthError) -> FailureDisposition {
    let status = error.status();
    let server_message = error.server_message().map(str::to_string);

    match op {
        Operation::Login => login_failure(status),
        Operation::Register => register_failure(status, server_message),
        Operation::UpdateProfile => update_failure(status, server_message),
        Operation::ChangePassword => password_failure(status, server_message),
    }
}

fn login_failure(status: u16) -> FailureDisposition {
    let message = match status {
        401 | 403 => MSG_BAD_CREDENTIALS,
        404 => MSG_USER_NOT_FOUND,
        _ => MSG_LOGIN_RETRY,
    };
    FailureDisposition::Message(message.to_string())
}

fn register_failure(status: u16, server_message: Option<String>) -> FailureDisposition {
    let message = match status {
        409 => server_message.unwrap_or_else(|| MSG_EMAIL_TAKEN.to_string()),
        400 => sniff_invalid_data(server_message),
        s if s == 0 || s >= 500 => MSG_UNREACHABLE.to_string(),
        _ => server_message.unwrap_or_else(|| MSG_REGISTER_RETRY.to_string()),
    };
    FailureDisposition::Message(message)
}

fn update_failure(status: u16, server_message: Option<String>) -> FailureDisposition {
    match status {
        401 | 403 => FailureDisposition::SessionExpired(MSG_SESSION_EXPIRED.to_string()),
        400 => FailureDisposition::Message(
            server_message.unwrap_or_else(|| MSG_INVALID_DATA.to_string()),
        ),
        409 => FailureDisposition::Message(MSG_EMAIL_IN_USE.to_string()),
        0 => FailureDisposition::Message(MSG_UNREACHABLE.to_string()),
        s if s >= 500 => FailureDisposition::Message(MSG_SERVER_RETRY.to_string()),
        _ => FailureDisposition::Message(MSG_UPDATE_RETRY.to_string()),
    }
}

fn password_failure(status: u16, server_message: Option<String>) -> FailureDisposition {
    match status {
        401 => FailureDisposition::Message(MSG_WRONG_CURRENT_PASSWORD.to_string()),
        403 => FailureDisposition::SessionExpired(MSG_SESSION_EXPIRED.to_string()),
        400 => FailureDisposition::Message(
            server_message.unwrap_or_else(|| MSG_INVALID_DATA.to_string()),
        ),
        0 => FailureDisposition::Message(MSG_UNREACHABLE.to_string()),
        s if s >= 500 => FailureDisposition::Message(MSG_SERVER_RETRY.to_string()),
        _ => FailureDisposition::Message(MSG_PASSWORD_RETRY.to_string()),
    }
}

/// Decide a 400 wording from the server's text: the API reports which field
/// failed only inside the message, so the wording is chosen by substring.
/// Fragile, but it matches the deployed behavior.
fn sniff_invalid_data(server_message: Option<String>) -> String {
    match server_message {
        Some(msg) => {
            let lower = msg.to_lowercase();
            if lower.contains("email") {
                MSG_INVALID_EMAIL_FORMAT.to_string()
            } else if lower.contains("password") || lower.contains("characters") {
                MSG_PASSWORD_TOO_SHORT.to_string()
            } else {
                msg
            }
        }
        None => MSG_INVALID_DATA.to_string(),
    }
}

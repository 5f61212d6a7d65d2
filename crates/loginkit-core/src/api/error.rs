use serde::Deserialize;
use thiserror::Error;

/// Failure of a gateway operation.
///
/// `Rejected` carries the HTTP status plus the server's message when the
/// error body supplied one. Transport failures never produced a status and
/// are reported as status 0 by [`AuthError::status`], mirroring how a
/// browser client sees an unreachable server.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("cannot reach server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("failed to persist session: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Error body shape used by the API: `{"message": ...}` or `{"error": ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl AuthError {
    /// Build the rejection variant from a non-success response body.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty());
        AuthError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status of the failure; 0 when no status was ever received.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::Rejected { status, .. } => *status,
            _ => 0,
        }
    }

    /// Server-supplied message, when the rejection body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AuthError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

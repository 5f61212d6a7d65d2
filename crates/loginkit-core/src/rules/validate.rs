//! Pre-submission validation rules.
//!
//! Pure checks the forms run before calling the gateway, so an invalid
//! submission never costs a network round trip. Each validator
//! short-circuits on the first failing check and reports a single
//! user-facing message.

use thiserror::Error;

use crate::auth::Session;

/// Minimum length for a display name
const MIN_NAME_LENGTH: usize = 2;

/// Minimum length for a password
const MIN_PASSWORD_LENGTH: usize = 6;

/// A failed local check; the `Display` output is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Name must be at least 2 characters")]
    NameTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter your current password")]
    MissingCurrentPassword,

    #[error("New password must be different from the current password")]
    PasswordUnchanged,

    #[error("No changes to save")]
    NoChanges,
}

/// Trim a submitted display name (submission policy, applied by the form
/// before handing the value to the gateway).
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Trim and lower-case a submitted email (submission policy).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Login form check: both fields present. Email shape is not validated at
/// login; a malformed address simply fails remotely.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)?;
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_password_change(
    current_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if current_password.is_empty() {
        return Err(ValidationError::MissingCurrentPassword);
    }
    validate_password(new_password)?;
    if new_password == current_password {
        return Err(ValidationError::PasswordUnchanged);
    }
    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Submission precondition for the profile form: both fields must be valid
/// and at least one trimmed value must differ from what the store holds.
pub fn validate_profile_update(
    name: &str,
    email: &str,
    current: &Session,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    if name.trim() == current.user_name && email.trim() == current.user_email {
        return Err(ValidationError::NoChanges);
    }
    Ok(())
}

/// Check the local-part@domain.tld shape: at least one non-whitespace,
/// non-`@` character before the `@`, and a domain containing a dot with at
/// least one such character on each side.
fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let run_ok =
        |part: &str| !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@');
    if !run_ok(local) || !run_ok(domain) {
        return false;
    }
    // The dot may sit anywhere inside the domain, but not at either end.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

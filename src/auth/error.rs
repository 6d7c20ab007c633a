//! Authentication error types
//!
//! Every variant's `Display` is the message shown to the user. There is no
//! separate user/system split; a storage failure is reported the same way
//! as a wrong password.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by the session store and credential directory
#[derive(Error, Debug)]
pub enum AuthError {
    /// No record matches the email/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credentials are valid but the account awaits manual approval
    #[error("Account pending approval")]
    ApprovalPending,

    /// Registration conflict on a case-insensitive email match
    #[error("Email already exists")]
    DuplicateEmail,

    /// Registration input rejected
    #[error("{0}")]
    Validation(String),

    /// Storage backend failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing failed or a stored hash could not be parsed
    #[error("Credential error: {0}")]
    Credential(String),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Credential(err.to_string())
    }
}

impl AuthError {
    /// Short machine-readable code, used by the CLI's JSON output
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::ApprovalPending => "approval_pending",
            AuthError::DuplicateEmail => "duplicate_email",
            AuthError::Validation(_) => "validation",
            AuthError::Storage(_) => "storage",
            AuthError::Credential(_) => "credential",
        }
    }
}

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

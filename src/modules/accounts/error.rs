//! Error types for account management.

use std::fmt;

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Errors that can occur during account operations.
#[derive(Debug)]
pub enum AccountError {
    /// Billing integration is not configured.
    NotConfigured,

    /// A subscriber with this credential already exists.
    DuplicateCredential(String),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "billing integration not configured"),
            Self::DuplicateCredential(credential) => {
                write!(f, "credential already exists: {credential}")
            },
        }
    }
}

impl std::error::Error for AccountError {}

impl AccountError {
    /// Check if the error is a server-side configuration problem.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

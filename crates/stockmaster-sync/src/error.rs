//! Error types for remote sync and the ledger engine.

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures from the remote store or the ledger engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Authentication or registration failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend could not be reached or returned a transport-level error.
    #[error("remote store unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    /// The backend rejected the request.
    #[error("remote store rejected request: {message}")]
    BadRequest { message: String },

    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// The backend replied with a body we could not decode.
    #[error("could not decode remote response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local persistence failed.
    #[error(transparent)]
    Store(#[from] stockmaster_store::StoreError),

    /// A business rule was violated before anything was sent.
    #[error(transparent)]
    Core(#[from] stockmaster_core::CoreError),
}

/// Authentication-specific failures, surfaced to the sign-in flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong email or password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The backend refused to create the account.
    #[error("registration rejected: {message}")]
    RegistrationRejected { message: String },

    /// Password and confirmation differ; caught locally, never sent.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A required credential field was empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// No active session to resume.
    #[error("no active session")]
    NotSignedIn,
}

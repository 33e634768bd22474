//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizError;
use store::{AuthError, StoreError};

/// Errors emitted by the interactive sign-in/sign-up flows.
///
/// Remote `AuthError` messages pass through untouched so the UI can show
/// them verbatim.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthFlowError {
    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted while starting or driving a quiz attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("no authenticated user")]
    NotSignedIn,

    #[error("no competency selected")]
    NoSelection,

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

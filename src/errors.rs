use thiserror::Error;
use uuid::Uuid;
use warp::reject;

use crate::validation::ValidationErrors;

/// Shown when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "There was an issue processing your request. Please try again later.";

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents a lookup of a pet that does not exist or is not
    /// listed.
    #[error("no such pet: {0}")]
    NonExistentId(Uuid),

    /// Represents an ID that could not be parsed.
    #[error("invalid ID {id:?}")]
    InvalidId { id: String, source: uuid::Error },

    /// Represents a write attempted without a session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Represents a write the record store refused.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    WriteRejected { message: Option<String> },

    /// Represents a submission body that is not valid JSON for its form.
    #[error("malformed submission: {0}")]
    MalformedSubmission(#[source] serde_json::Error),

    /// Represents a submission that failed field validation.
    #[error("invalid submission: {0}")]
    InvalidSubmission(#[source] ValidationErrors),

    /// Represents text that does not name a known variant.
    #[error("unknown {kind} {value:?}")]
    UnknownValue { kind: &'static str, value: String },
}

impl BackendError {
    /// The message to put in front of a user. Storage internals are
    /// replaced with the generic message.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Sqlx { .. } => GENERIC_FAILURE_MESSAGE.to_owned(),
            e => e.to_string(),
        }
    }
}

impl reject::Reject for BackendError {}

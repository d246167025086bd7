//! Error types for history operations.

use reqwest::StatusCode;
use thiserror::Error;

use super::entry::EntryId;

pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The request could not be sent or its body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error! status: {}", .status.as_u16())]
    Http { status: StatusCode },

    /// The body was not JSON; usually a login page served after the session expired.
    #[error("Invalid response format: {0}")]
    Format(String),

    /// The server answered with a JSON body whose status is not "success".
    #[error("{0}")]
    Application(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("No history entry at index {0}")]
    InvalidIndex(usize),

    #[error("History entry at index {0} has no server id")]
    MissingId(usize),

    /// The entry selected for an action is no longer in the history.
    #[error("History entry {0} is no longer present")]
    StaleSelection(EntryId),
}

impl HistoryError {
    /// Whether the failure points at an expired or missing session.
    pub fn is_session_problem(&self) -> bool {
        match self {
            HistoryError::Format(_) => true,
            HistoryError::Http { status } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}

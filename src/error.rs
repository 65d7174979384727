use thiserror::Error;

use crate::corpus::Difficulty;

/// Errors produced by the typing engine and its collaborators.
///
/// None of these are fatal; the caller fixes its state or arguments and retries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("no sentences configured for difficulty {0}")]
    InvalidDifficulty(Difficulty),

    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("stored history is unreadable: {0}")]
    CorruptPersistedHistory(String),
}

impl EngineError {
    pub(crate) fn invalid_state(operation: &'static str, state: &'static str) -> Self {
        EngineError::InvalidState { operation, state }
    }
}

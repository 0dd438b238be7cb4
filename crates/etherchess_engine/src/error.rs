//! Error types for the engine
//!
//! Every fallible operation at the ingestion boundary (FEN, LAN, position
//! setup) and at the engine facade returns [`EngineResult`]. Ingestion is
//! all-or-nothing: on error the caller's board or game is left untouched.
//!
//! Search interruption is not an error in this sense and is carried by the
//! zero-sized [`crate::search::Interrupted`] marker instead.

use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// FEN string could not be parsed
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Square name outside a1..h8
    #[error("Invalid square '{square}'")]
    InvalidSquare { square: String },

    /// Move string is not well formed long algebraic notation
    #[error("Invalid move notation '{notation}'")]
    InvalidMove { notation: String },

    /// Move is well formed but not legal in the current position
    #[error("Illegal move '{notation}' in position {fen}")]
    IllegalMove { notation: String, fen: String },

    /// Position parsed but violates basic legality
    #[error("Invalid position: {reason}")]
    InvalidPosition { reason: String },

    /// Requested table size cannot be allocated
    #[error("Invalid table size: {mib} MiB")]
    InvalidTableSize { mib: usize },

    /// Operation requires an idle engine but a search is running
    #[error("A search is already in progress")]
    SearchInProgress,

    /// The search worker thread could not be started
    #[error("Failed to start search worker: {reason}")]
    WorkerSpawn { reason: String },

    /// The search worker thread panicked
    #[error("Search worker terminated abnormally")]
    WorkerPanicked,
}

impl EngineError {
    pub(crate) fn invalid_fen(fen: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

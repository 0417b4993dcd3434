use thiserror::Error;

/// Errors that can occur while searching or estimating a move.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search was invoked on a finished game.
    #[error("No legal moves available")]
    NoLegalMoves,

    /// A state with no legal moves did not report a result. The game model
    /// disagrees with itself about terminal detection.
    #[error("Game state has no legal moves but reports no result")]
    MissingResult,

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),

    #[error("Could not read search config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse search config: {0}")]
    Json(#[from] serde_json::Error),
}

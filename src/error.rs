//! Error types for board construction and solver queries.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The grid has fewer than two rows.
    #[error("board dimension must be at least 2, got {dimension}")]
    TooSmall { dimension: usize },

    /// n² overflows, or the tiles `1..n²` do not fit a `u32`.
    #[error("board dimension {dimension} is too large")]
    TooLarge { dimension: usize },

    /// A row length does not match the number of rows.
    #[error("board must be square: {rows} rows but row {row} has {len} tiles")]
    NotSquare { rows: usize, row: usize, len: usize },

    /// A flat tile list does not hold exactly n² values.
    #[error("expected {expected} tiles, got {actual}")]
    WrongTileCount { expected: usize, actual: usize },

    /// Moves or a solution were requested for an unsolvable board.
    #[error("board is unsolvable, no solution exists")]
    Unsolvable,
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

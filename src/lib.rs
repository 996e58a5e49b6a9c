//! Optimal solver for n×n sliding tile puzzles.
//!
//! ```
//! use slider_solver::{Board, Solver};
//!
//! let board = Board::new(vec![vec![0, 1, 3], vec![4, 2, 5], vec![7, 8, 6]])?;
//! let solver = Solver::new(board);
//! assert_eq!(solver.moves()?, 4);
//! # Ok::<(), slider_solver::PuzzleError>(())
//! ```

pub mod board;
pub mod error;
pub mod solver;

pub use board::{Board, Move, Neighbors};
pub use error::{PuzzleError, Result};
pub use solver::{Dedup, SearchStats, Solver, SolverConfig};

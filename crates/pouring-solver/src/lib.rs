//! Solver library for the water pouring puzzle.
//!
//! Given glasses of fixed capacities, all initially empty, this crate finds
//! the shortest sequences of fill, empty and pour moves that leave some glass
//! holding an exact target quantity. The search proceeds one move at a time
//! and reports every solution of the first length that has any.

pub mod error;
pub mod executor;
pub mod logging;
pub mod pruning;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{ExhaustionLimit, PouringError, Result};
pub use executor::{
    apply, execute, execute_with_metrics, try_apply, verify_solution, ExecutionMetrics,
    ExecutionResult,
};
pub use pruning::all_moves;
pub use puzzle::{Glasses, Move, Path, PuzzleConfig, State, CLASSIC_CAPACITIES, CLASSIC_TARGET};
pub use solver::{
    extend, resolve, resolve_from, Solution, SolverConfig, SolverResult,
    DEFAULT_MAX_FRONTIER,
};

//! Level-by-level search for paths that reach the target quantity.
//!
//! Each generation of candidate paths (the frontier) is folded over the
//! initial state and split into solutions and others. The first generation
//! holding any solution is reported in full; otherwise every remaining path
//! is extended by one move and the next generation is evaluated.
//!
//! No visited-state set is kept: distinct paths reaching the same state are
//! all carried forward, and all of them are reported when they tie.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ExhaustionLimit, PouringError, Result};
use crate::executor::{execute, reaches_target};
use crate::pruning::{all_moves, valid_moves_after};
use crate::puzzle::{format_path, format_state, Glasses, Move, Path, State};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Deepest generation to evaluate; `None` searches without a depth bound
    pub max_depth: Option<usize>,
    /// Largest frontier allowed to be built
    pub max_frontier: Option<usize>,
    /// Maximum time to search, checked between generations
    pub timeout: Option<Duration>,
}

/// Default frontier limit.
///
/// Counts paths, not bytes. A path costs a `Vec` header plus one `Move` per
/// step, so a generation of a million depth-10 paths holds roughly 300 MB,
/// and the previous generation is still alive while the next is built.
pub const DEFAULT_MAX_FRONTIER: usize = 1_000_000;

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(12),
            max_frontier: Some(DEFAULT_MAX_FRONTIER),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl SolverConfig {
    /// No limits at all. A search for an unreachable target never returns.
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            max_frontier: None,
            timeout: None,
        }
    }
}

/// A path reaching the target, with the state it ends in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub path: Path,
    pub state: State,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solution: {} -> {}",
            format_path(&self.path),
            format_state(&self.state)
        )
    }
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Every solution of the first successful generation, in frontier order
    pub solutions: Vec<Solution>,
    /// Generation the solutions were found in (path length when starting from `[[]]`)
    pub depth: usize,
    /// Number of paths evaluated across all generations
    pub paths_tested: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

/// Extend every path of the frontier by one move.
///
/// An empty path becomes one `Fill(g)` path per glass. A non-empty path
/// gets one child per catalog move except its own last move. Children keep
/// frontier order, then catalog order.
pub fn extend(glasses: &Glasses, frontier: &[Path]) -> Vec<Path> {
    let catalog = all_moves(glasses.count());
    extend_with(glasses, &catalog, frontier)
}

fn extend_with(glasses: &Glasses, catalog: &[Move], frontier: &[Path]) -> Vec<Path> {
    let mut result = Vec::with_capacity(next_frontier_size(glasses, catalog, frontier));
    for from_path in frontier {
        match from_path.last() {
            None => {
                result.extend(glasses.indices().map(|g| vec![Move::Fill(g)]));
            }
            Some(last) => {
                for mv in valid_moves_after(catalog, Some(last)) {
                    let mut path = Vec::with_capacity(from_path.len() + 1);
                    path.extend_from_slice(from_path);
                    path.push(mv);
                    result.push(path);
                }
            }
        }
    }
    result
}

/// Exact size of `extend_with(glasses, catalog, frontier)`
fn next_frontier_size(glasses: &Glasses, catalog: &[Move], frontier: &[Path]) -> usize {
    frontier
        .iter()
        .map(|path| match path.last() {
            None => glasses.count(),
            Some(last) => catalog.len() - usize::from(catalog.contains(last)),
        })
        .sum()
}

/// Split the frontier into solutions and others, keeping relative order.
pub fn partition(glasses: &Glasses, frontier: Vec<Path>, target: u32) -> (Vec<Solution>, Vec<Path>) {
    let mut solutions = Vec::new();
    let mut others = Vec::with_capacity(frontier.len());
    for path in frontier {
        let state = execute(glasses, &path);
        if reaches_target(&state, target) {
            solutions.push(Solution { path, state });
        } else {
            others.push(path);
        }
    }
    (solutions, others)
}

/// Search from the empty path.
pub fn resolve(glasses: &Glasses, target: u32, config: &SolverConfig) -> Result<SolverResult> {
    resolve_from(glasses, vec![Path::new()], target, config)
}

/// Search from an arbitrary starting frontier.
///
/// Returns every solution of the first generation containing one. Limits
/// are only checked between generations, so a generation that has been
/// built is always evaluated completely.
pub fn resolve_from(
    glasses: &Glasses,
    frontier: Vec<Path>,
    target: u32,
    config: &SolverConfig,
) -> Result<SolverResult> {
    let start_time = Instant::now();

    for path in &frontier {
        for mv in path {
            mv.validate(glasses.count())?;
        }
    }

    let catalog = all_moves(glasses.count());
    let mut frontier = frontier;
    let mut depth: usize = 0;
    let mut paths_tested: usize = 0;

    loop {
        paths_tested += frontier.len();
        debug!(depth, frontier = frontier.len(), "evaluating generation");

        let (solutions, others) = partition(glasses, frontier, target);

        if !solutions.is_empty() {
            info!(
                depth,
                solutions = solutions.len(),
                paths_tested,
                "found solutions"
            );
            return Ok(SolverResult {
                solutions,
                depth,
                paths_tested,
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            });
        }

        let limit = if others.is_empty() {
            Some(ExhaustionLimit::EmptyFrontier)
        } else if config.max_depth.is_some_and(|max| depth >= max) {
            config.max_depth.map(ExhaustionLimit::MaxDepth)
        } else if config
            .timeout
            .is_some_and(|timeout| start_time.elapsed() >= timeout)
        {
            Some(ExhaustionLimit::Timeout(start_time.elapsed().as_millis() as u64))
        } else {
            config.max_frontier.and_then(|max| {
                (next_frontier_size(glasses, &catalog, &others) > max)
                    .then_some(ExhaustionLimit::MaxFrontier(max))
            })
        };

        if let Some(limit) = limit {
            warn!(depth, paths_tested, %limit, "search stopped without a solution");
            return Err(PouringError::SearchExhausted {
                depth,
                paths_tested,
                limit,
            });
        }

        frontier = extend_with(glasses, &catalog, &others);
        depth += 1;
    }
}

//! Puzzle representation types: glasses, fill states, moves and paths.
//!
//! `PuzzleConfig` deserializes directly from the JSON puzzle files accepted
//! by the CLI; everything else is derived from it once per run.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{PouringError, Result};

/// Capacities of the classic puzzle
pub const CLASSIC_CAPACITIES: [u32; 3] = [3, 5, 9];

/// Target quantity of the classic puzzle
pub const CLASSIC_TARGET: u32 = 7;

/// Fill level of every glass, indexed by glass.
///
/// Stored inline for up to 8 glasses.
pub type State = SmallVec<[u32; 8]>;

/// Ordered sequence of moves applied from the all-empty state
pub type Path = Vec<Move>;

/// A single operation on the glasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Pour the glass out entirely
    Empty(usize),
    /// Fill the glass to capacity
    Fill(usize),
    /// Pour from the first glass into the second until one is empty or full
    Pour(usize, usize),
}

impl Move {
    /// Checked `Empty` constructor
    pub fn empty(glass: usize, glass_count: usize) -> Result<Self> {
        let mv = Move::Empty(glass);
        mv.validate(glass_count)?;
        Ok(mv)
    }

    /// Checked `Fill` constructor
    pub fn fill(glass: usize, glass_count: usize) -> Result<Self> {
        let mv = Move::Fill(glass);
        mv.validate(glass_count)?;
        Ok(mv)
    }

    /// Checked `Pour` constructor
    pub fn pour(from: usize, to: usize, glass_count: usize) -> Result<Self> {
        let mv = Move::Pour(from, to);
        mv.validate(glass_count)?;
        Ok(mv)
    }

    /// Check the move's indices against a glass count.
    pub fn validate(&self, glass_count: usize) -> Result<()> {
        let valid = match *self {
            Move::Empty(glass) | Move::Fill(glass) => glass < glass_count,
            Move::Pour(from, to) => from != to && from < glass_count && to < glass_count,
        };
        if valid {
            Ok(())
        } else {
            Err(PouringError::InvalidMove {
                label: self.to_string(),
                glass_count,
            })
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Empty(glass) => write!(f, "Empty({})", glass),
            Move::Fill(glass) => write!(f, "Fill({})", glass),
            Move::Pour(from, to) => write!(f, "Pour({}, {})", from, to),
        }
    }
}

/// Format a path as `[Fill(0), Pour(0, 2)]`
pub fn format_path(path: &[Move]) -> String {
    let labels: Vec<String> = path.iter().map(|m| m.to_string()).collect();
    format!("[{}]", labels.join(", "))
}

/// Format a state as `[0, 0, 3]`
pub fn format_state(state: &[u32]) -> String {
    let levels: Vec<String> = state.iter().map(|l| l.to_string()).collect();
    format!("[{}]", levels.join(", "))
}

/// The validated capacity vector for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glasses {
    capacities: SmallVec<[u32; 8]>,
}

impl Glasses {
    /// Build from capacities. Requires at least one glass, all capacities positive.
    pub fn new<I>(capacities: I) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let capacities: SmallVec<[u32; 8]> = capacities.into_iter().collect();
        if capacities.is_empty() {
            return Err(PouringError::InvalidConfig(
                "at least one glass is required".to_string(),
            ));
        }
        if let Some(glass) = capacities.iter().position(|&c| c == 0) {
            return Err(PouringError::InvalidConfig(format!(
                "glass {} has zero capacity",
                glass
            )));
        }
        Ok(Self { capacities })
    }

    /// The classic three-glass puzzle
    pub fn classic() -> Self {
        Self {
            capacities: CLASSIC_CAPACITIES.iter().copied().collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.capacities.len()
    }

    pub fn indices(&self) -> Range<usize> {
        0..self.capacities.len()
    }

    /// Capacity of a glass. Panics on an out-of-range index.
    pub fn capacity(&self, glass: usize) -> u32 {
        self.capacities[glass]
    }

    pub fn capacities(&self) -> &[u32] {
        &self.capacities
    }

    /// All glasses empty
    pub fn initial_state(&self) -> State {
        smallvec::smallvec![0; self.capacities.len()]
    }

    /// Check `0 <= state[i] <= capacity[i]` and the length
    pub fn is_valid_state(&self, state: &[u32]) -> bool {
        state.len() == self.capacities.len()
            && state
                .iter()
                .zip(self.capacities.iter())
                .all(|(level, cap)| level <= cap)
    }
}

/// The complete puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    pub capacities: Vec<u32>,
    pub target: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            capacities: CLASSIC_CAPACITIES.to_vec(),
            target: CLASSIC_TARGET,
            max_depth: None,
        }
    }
}

impl PuzzleConfig {
    /// Validate the capacities
    pub fn glasses(&self) -> Result<Glasses> {
        Glasses::new(self.capacities.iter().copied())
    }
}

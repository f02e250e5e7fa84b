//! Error types shared by the library and the CLI.

use std::fmt;

use thiserror::Error;

/// The limit that stopped a search before any solution was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionLimit {
    /// The next depth would exceed the configured maximum path length
    MaxDepth(usize),
    /// The next frontier would hold more paths than allowed
    MaxFrontier(usize),
    /// The search ran longer than the configured timeout (milliseconds)
    Timeout(u64),
    /// No candidate paths were left to extend
    EmptyFrontier,
}

impl fmt::Display for ExhaustionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionLimit::MaxDepth(n) => write!(f, "max depth {} reached", n),
            ExhaustionLimit::MaxFrontier(n) => write!(f, "frontier larger than {} paths", n),
            ExhaustionLimit::Timeout(ms) => write!(f, "timeout after {} ms", ms),
            ExhaustionLimit::EmptyFrontier => write!(f, "frontier is empty"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PouringError {
    #[error("invalid move {label} for {glass_count} glasses")]
    InvalidMove { label: String, glass_count: usize },

    #[error("invalid puzzle configuration: {0}")]
    InvalidConfig(String),

    #[error("search exhausted at depth {depth} after {paths_tested} paths: {limit}")]
    SearchExhausted {
        depth: usize,
        paths_tested: usize,
        limit: ExhaustionLimit,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PouringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_exhausted_message() {
        let err = PouringError::SearchExhausted {
            depth: 12,
            paths_tested: 13,
            limit: ExhaustionLimit::MaxDepth(12),
        };
        assert_eq!(
            err.to_string(),
            "search exhausted at depth 12 after 13 paths: max depth 12 reached"
        );
    }
}

//! CLI entry point for the pouring solver.
//!
//! Usage:
//!   pouring-solver solve [<puzzle.json>] [options]
//!   pouring-solver solve --stdin [options]
//!
//! Options:
//!   --capacities <a,b,..>   Glass capacities (default: 3,5,9)
//!   --target <n>            Quantity to reach in any glass (default: 7)
//!   --max-depth <n>         Longest path to try (default: 12)
//!   --max-frontier <n>      Largest generation of paths (default: 1000000)
//!   --timeout <seconds>     Maximum search time (default: 60)
//!   --unbounded             Disable all limits except a file's maxDepth
//!   --json                  Print a JSON document instead of text
//!   -v, -vv, -vvv           Log progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use pouring_solver::logging::init_logging;
use pouring_solver::puzzle::format_state;
use pouring_solver::{
    execute_with_metrics, resolve, ExhaustionLimit, Glasses, PouringError, PuzzleConfig,
    SolverConfig, SolverResult, DEFAULT_MAX_FRONTIER,
};

#[derive(Parser)]
#[command(name = "pouring-solver")]
#[command(about = "Level-by-level solver for the water pouring puzzle")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every shortest sequence of moves reaching the target
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Glass capacities, comma separated
        #[arg(long, value_delimiter = ',')]
        capacities: Option<Vec<u32>>,

        /// Quantity to reach in any glass
        #[arg(long)]
        target: Option<u32>,

        /// Longest path to try
        #[arg(long)]
        max_depth: Option<usize>,

        /// Largest generation of paths to build
        #[arg(long, default_value_t = DEFAULT_MAX_FRONTIER)]
        max_frontier: usize,

        /// Maximum search time in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Search without time or frontier limits (a file's maxDepth still applies)
        #[arg(long, conflicts_with = "max_depth")]
        unbounded: bool,

        /// Print a JSON document instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Command-line values that override or complete the puzzle file
#[derive(Debug, Clone)]
struct SolveFlags {
    capacities: Option<Vec<u32>>,
    target: Option<u32>,
    max_depth: Option<usize>,
    max_frontier: usize,
    timeout: u64,
    unbounded: bool,
}

/// Output format for a search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    capacities: Vec<u32>,
    target: u32,
    depth: usize,
    paths_tested: usize,
    time_elapsed_ms: u64,
    solutions: Vec<SolutionOutput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolutionOutput {
    moves: Vec<String>,
    state: Vec<u32>,
    metrics: MetricsOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsOutput {
    fills: usize,
    empties: usize,
    pours: usize,
    volume_poured: u64,
    wasted_moves: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            capacities,
            target,
            max_depth,
            max_frontier,
            timeout,
            unbounded,
            json,
        } => {
            let puzzle = match load_puzzle(file, stdin) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(1);
                }
            };

            let flags = SolveFlags {
                capacities,
                target,
                max_depth,
                max_frontier,
                timeout,
                unbounded,
            };
            let (puzzle, config) = merge_config(puzzle, flags);

            run_solve(&puzzle, &config, json)
        }
    }
}

/// Read the puzzle from a file, stdin, or fall back to the classic puzzle
fn load_puzzle(file: Option<PathBuf>, stdin: bool) -> Result<PuzzleConfig, PouringError> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)?
    } else {
        return Ok(PuzzleConfig::default());
    };

    Ok(serde_json::from_str(&json_content)?)
}

/// Apply command-line flags on top of the loaded puzzle.
///
/// Explicit flags win over file values. `--unbounded` drops the time and
/// frontier limits but keeps a `maxDepth` given by the puzzle file.
fn merge_config(mut puzzle: PuzzleConfig, flags: SolveFlags) -> (PuzzleConfig, SolverConfig) {
    if let Some(capacities) = flags.capacities {
        puzzle.capacities = capacities;
    }
    if let Some(target) = flags.target {
        puzzle.target = target;
    }
    if flags.max_depth.is_some() {
        puzzle.max_depth = flags.max_depth;
    }

    let config = if flags.unbounded {
        if let Some(depth) = puzzle.max_depth {
            warn!(max_depth = depth, "--unbounded keeps the puzzle file's maxDepth");
        }
        SolverConfig {
            max_depth: puzzle.max_depth,
            ..SolverConfig::unbounded()
        }
    } else {
        SolverConfig {
            max_depth: puzzle.max_depth.or(SolverConfig::default().max_depth),
            max_frontier: Some(flags.max_frontier),
            timeout: Some(Duration::from_secs(flags.timeout)),
        }
    };

    (puzzle, config)
}

/// Validate the glasses and search
fn solve(
    puzzle: &PuzzleConfig,
    config: &SolverConfig,
    json: bool,
) -> Result<(Glasses, SolverResult), PouringError> {
    let glasses = puzzle.glasses()?;

    if !json {
        println!("Capacities: {}", format_state(glasses.capacities()));
        println!("Initial state: {}", format_state(&glasses.initial_state()));
    }

    info!(capacities = ?glasses.capacities(), target = puzzle.target, "solving");
    let result = resolve(&glasses, puzzle.target, config)?;
    Ok((glasses, result))
}

fn run_solve(puzzle: &PuzzleConfig, config: &SolverConfig, json: bool) -> ExitCode {
    let outcome = solve(puzzle, config, json);
    let code = match &outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(PouringError::SearchExhausted { .. }) => ExitCode::from(2),
        Err(_) => ExitCode::from(1),
    };

    if json {
        let output = format_result(puzzle, &outcome);
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        match &outcome {
            Ok((_, result)) => {
                for solution in &result.solutions {
                    println!("{}", solution);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    code
}

fn format_result(
    puzzle: &PuzzleConfig,
    outcome: &Result<(Glasses, SolverResult), PouringError>,
) -> SolveOutput {
    let mut output = SolveOutput {
        solved: false,
        reason: None,
        capacities: puzzle.capacities.clone(),
        target: puzzle.target,
        depth: 0,
        paths_tested: 0,
        time_elapsed_ms: 0,
        solutions: Vec::new(),
    };

    match outcome {
        Ok((glasses, result)) => {
            output.solved = true;
            output.depth = result.depth;
            output.paths_tested = result.paths_tested;
            output.time_elapsed_ms = result.time_elapsed_ms;
            output.solutions = result
                .solutions
                .iter()
                .map(|s| {
                    let metrics = execute_with_metrics(glasses, &s.path, puzzle.target).metrics;
                    SolutionOutput {
                        moves: s.path.iter().map(|m| m.to_string()).collect(),
                        state: s.state.to_vec(),
                        metrics: MetricsOutput {
                            fills: metrics.fills,
                            empties: metrics.empties,
                            pours: metrics.pours,
                            volume_poured: metrics.volume_poured,
                            wasted_moves: metrics.wasted_moves,
                        },
                    }
                })
                .collect();
        }
        Err(PouringError::SearchExhausted {
            depth,
            paths_tested,
            limit,
        }) => {
            output.depth = *depth;
            output.paths_tested = *paths_tested;
            if let ExhaustionLimit::Timeout(ms) = limit {
                output.time_elapsed_ms = *ms;
            }
            output.reason = Some(limit.to_string());
        }
        Err(e) => output.reason = Some(e.to_string()),
    }

    output
}

//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so solutions on stdout stay machine-readable. Colors
//! are only used when stderr is a terminal and `NO_COLOR` is unset.
//! `RUST_LOG` overrides the level picked from the `-v` count.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map CLI verbosity to a level.
///
/// - 0: warn
/// - 1 (`-v`): info
/// - 2 (`-vv`): debug
/// - 3+ : trace
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("pouring_solver={}", level.as_str().to_lowercase()))
    })
}

/// Colors only for a terminal, and never when `NO_COLOR` is set
fn ansi_enabled(is_terminal: bool, no_color: bool) -> bool {
    is_terminal && !no_color
}

/// Install the global subscriber. Call once at startup.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(verbosity: u8) -> bool {
    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_ansi(ansi_enabled(
            io::stderr().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        ))
        .with_target(false);

    tracing_subscriber::registry()
        .with(build_env_filter(level_from_verbosity(verbosity)))
        .with(layer)
        .try_init()
        .is_ok()
}

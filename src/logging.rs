//! Tracing setup for hosts that print to a terminal (tests, native tooling).

use std::str::FromStr;
use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();

/// Parses a level such as `"debug"`, falling back to `info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Install a `fmt` subscriber (idempotent).
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn install_tracing(level: &str) {
    let default = parse_level(level);
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default.to_string()));

        let result = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_filter(filter))
            .try_init();

        if result.is_err() {
            eprintln!("real-viewport tracing subscriber failed to initialize");
        }
    });
}

// piiscrub/src/logger.rs
//! Logger setup for the `piiscrub` binary.
//!
//! Logs always go to stderr so stdout stays clean JSON. `RUST_LOG` is honored unless
//! a level is forced from the command line.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`. `level_override` wins over `RUST_LOG` when given.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    let _ = builder.try_init();
}

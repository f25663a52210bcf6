// piiscrub/src/main.rs
//! piiscrub entry point.
//!
//! Exit codes: 0 on success, 2 when the input document is malformed (bad rows,
//! bad options, unknown override action), 1 for anything else.

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use piiscrub::cli::{Cli, Commands};
use piiscrub::commands::{check_policy, sanitize};
use piiscrub::logger;
use piiscrub_core::PiiScrubError;

const EXIT_FAILURE: u8 = 1;
const EXIT_CLIENT_ERROR: u8 = 2;

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PiiScrubError>() {
        Some(core) if core.is_client_error() => EXIT_CLIENT_ERROR,
        _ => EXIT_FAILURE,
    }
}

fn main() -> ExitCode {
    // A .env file may carry PII_HMAC_KEY; clap reads it from the environment below.
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let result = match &args.command {
        Commands::Sanitize(cmd) => sanitize::run_sanitize(cmd, args.secret.as_deref()),
        Commands::CheckPolicy(cmd) => check_policy::run_check_policy(cmd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

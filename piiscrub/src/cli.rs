// piiscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the piiscrub application,
//! including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "piiscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Detect and sanitize PII in tabular JSON records",
    long_about = "piiscrub finds names, emails, phone numbers, SSNs, card numbers, and postal addresses in JSON rows and replaces them according to a policy: deterministic tokens, partial masks, random scrambles, or full redaction. An optional audit trail records every transformation without exposing the original values.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Secret key for deterministic tokenization.
    #[arg(
        long,
        env = "PII_HMAC_KEY",
        hide_env_values = true,
        global = true,
        value_name = "KEY",
        help = "Secret key for tokenization (falls back to PII_HMAC_KEY, then an insecure development key)."
    )]
    pub secret: Option<String>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `piiscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes JSON rows read from a file or stdin.
    #[command(about = "Sanitizes JSON rows read from a file or stdin.")]
    Sanitize(SanitizeCommand),

    /// Loads and validates a policy file, then prints a summary.
    #[command(name = "check-policy", about = "Loads and validates a policy file, then prints a summary.")]
    CheckPolicy(CheckPolicyCommand),
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Policy file path, or the name of a policy in the policy directories.
    #[arg(long, short = 'p', value_name = "FILE|NAME", help = "Policy file (YAML or JSON) or policy name. Uses the built-in policy if omitted.")]
    pub policy: Option<String>,

    /// Force one action for every detected match.
    #[arg(long, short = 'm', value_name = "ACTION", conflicts_with = "request", help = "Force one action for every match: tokenize, mask, scramble, or redact.")]
    pub method: Option<String>,

    /// Include the audit trail in the output.
    #[arg(long, short = 'a', conflicts_with = "request", help = "Include the per-row audit trail in the output.")]
    pub audit: bool,

    /// Treat the input as a request document with `input_data` and `query_params`.
    #[arg(long, help = "Read a request document {\"input_data\": [...], \"query_params\": {...}} instead of a bare array of rows.")]
    pub request: bool,

    /// Pretty-print the JSON output.
    #[arg(long, help = "Pretty-print the JSON output.")]
    pub pretty: bool,
}

/// Arguments for the `check-policy` command.
#[derive(Parser, Debug)]
pub struct CheckPolicyCommand {
    /// Policy file path, or the name of a policy in the policy directories.
    #[arg(value_name = "FILE|NAME")]
    pub policy: String,

    /// Print the summary as JSON.
    #[arg(long, help = "Print the policy summary as JSON.")]
    pub json: bool,
}

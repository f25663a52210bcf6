// piiscrub/src/commands/sanitize.rs
//! `piiscrub sanitize`: rows in, sanitized rows (and optionally the audit trail) out.

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use piiscrub_core::{
    error_response, handle_request, load_policy_by_name, parse_rows, Action, PiiEngine,
    PiiScrubError, PolicyConfig, SanitizationEngine, SanitizeOptions, SecretKey,
};

use crate::cli::SanitizeCommand;

/// Builds the engine from the selected policy (or the built-in one) and the key.
pub fn build_engine(policy: Option<&str>, secret: Option<&str>) -> Result<PiiEngine> {
    let config = match policy {
        Some(name_or_path) => load_policy_by_name(name_or_path)
            .with_context(|| format!("Failed to load policy '{}'", name_or_path))?,
        None => PolicyConfig::load_default()?,
    };
    let engine = PiiEngine::from_config(&config, SecretKey::resolve(secret))?;
    Ok(engine)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&PathBuf>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            writeln!(file, "{}", rendered)?;
            info!("Sanitized output written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writeln!(writer, "{}", rendered)?;
        }
    }
    Ok(())
}

/// Runs one sanitization over the given input text and returns the response document.
pub fn sanitize_document(
    engine: &dyn SanitizationEngine,
    input: &str,
    cmd: &SanitizeCommand,
) -> Result<Value> {
    let document: Value = serde_json::from_str(input).map_err(PiiScrubError::from)?;

    if cmd.request {
        debug!("Input treated as a request document.");
        return Ok(handle_request(engine, &document)?);
    }

    let override_action = cmd
        .method
        .as_deref()
        .map(str::parse::<Action>)
        .transpose()?;
    let options = SanitizeOptions::new(override_action, cmd.audit);
    let rows = parse_rows(document)?;
    let output = engine.sanitize(&rows, &options)?;
    Ok(output.to_value()?)
}

/// In request mode a malformed document still gets a response body, `{"error": ...}`,
/// the same one a hosting API would send back.
pub fn request_error_document(err: &anyhow::Error, cmd: &SanitizeCommand) -> Option<Value> {
    if !cmd.request {
        return None;
    }
    err.downcast_ref::<PiiScrubError>()
        .filter(|core| core.is_client_error())
        .map(error_response)
}

/// The main operation runner for `piiscrub sanitize`.
pub fn run_sanitize(cmd: &SanitizeCommand, secret: Option<&str>) -> Result<()> {
    info!("Starting piiscrub sanitize.");
    let engine = build_engine(cmd.policy.as_deref(), secret)?;
    let input = read_input(cmd.input_file.as_deref())?;

    let response = match sanitize_document(&engine, &input, cmd) {
        Ok(response) => response,
        Err(err) => {
            if let Some(doc) = request_error_document(&err, cmd) {
                write_output(cmd.output.as_ref(), &doc.to_string())?;
            }
            return Err(err);
        }
    };
    let rendered = if cmd.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    write_output(cmd.output.as_ref(), &rendered)?;
    info!("piiscrub sanitize completed.");
    Ok(())
}

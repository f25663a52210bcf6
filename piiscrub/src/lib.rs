// piiscrub/src/lib.rs
//! # piiscrub CLI
//!
//! Command-line host for `piiscrub-core`: reads JSON rows (or a full request
//! document), sanitizes them, and writes the result as JSON.

pub mod cli;
pub mod commands;
pub mod logger;

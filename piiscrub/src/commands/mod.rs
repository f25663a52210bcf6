// piiscrub/src/commands/mod.rs
pub mod check_policy;
pub mod sanitize;

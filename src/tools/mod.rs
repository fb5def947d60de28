//! Shared helpers: frequency counting, progress plumbing, and the CLI
//! argument surface used by the binary.

pub mod cli;
pub mod freq_count;
pub mod progress;

//! CLI module
//!
//! Command-line interface for running extractions.
//!
//! # Commands
//!
//! - `extract` - Extract one source for a date range
//! - `sources` - List supported sources
//! - `validate` - Check the configuration and credentials offline

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{build_request, resolve_credentials, ExtractArgs, Runner};

//! CLI module for rangeseek
//!
//! Provides command-line interface for:
//! - query: Range query over a JSON-lines data set
//! - order: Sort-order satisfaction check for the configured index

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{build_index, order, parse_value, plan_ranges, query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_documents, write_json, write_lines};

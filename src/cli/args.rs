//! CLI argument definitions using clap
//!
//! Commands:
//! - rangeseek query --config <path> --data <path> [constraints] [paging]
//! - rangeseek order --config <path> --sort <±Field>... [--constant <Field>]...

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rangeseek - composite range queries over an in-memory index
#[derive(Parser, Debug)]
#[command(name = "rangeseek")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a range query over a JSON-lines data set
    Query(QueryArgs),

    /// Check whether the index already satisfies a sort order
    Order {
        /// Path to configuration file
        #[arg(long, default_value = "./rangeseek.json")]
        config: PathBuf,

        /// Sort key, `Field` or `+Field` ascending, `-Field` descending (repeatable)
        #[arg(long, allow_hyphen_values = true)]
        sort: Vec<String>,

        /// Field pinned to a constant by an equality constraint (repeatable)
        #[arg(long)]
        constant: Vec<String>,
    },
}

/// Arguments of the `query` command
///
/// Constraints are written `Field=Value`; values parse as JSON when possible
/// and as plain strings otherwise.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Path to configuration file
    #[arg(long, default_value = "./rangeseek.json")]
    pub config: PathBuf,

    /// JSON-lines file with one document per line
    #[arg(long)]
    pub data: PathBuf,

    /// Equality constraint
    #[arg(long)]
    pub eq: Vec<String>,

    /// Greater-than constraint
    #[arg(long)]
    pub gt: Vec<String>,

    /// Greater-than-or-equal constraint
    #[arg(long)]
    pub gte: Vec<String>,

    /// Less-than constraint
    #[arg(long)]
    pub lt: Vec<String>,

    /// Less-than-or-equal constraint
    #[arg(long)]
    pub lte: Vec<String>,

    /// Matches to skip
    #[arg(long)]
    pub offset: Option<usize>,

    /// Maximum matches to print
    #[arg(long)]
    pub limit: Option<usize>,

    /// Enumerate in reverse index order
    #[arg(long)]
    pub reverse: bool,

    /// Look up a single document by `_id`
    #[arg(long)]
    pub id: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

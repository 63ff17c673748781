//! Command line argument parsing for the Bibliotopic CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Bibliotopic - topic discovery and collection algebra for paper corpora
#[derive(Parser, Debug, Clone)]
#[command(name = "bibliotopic")]
#[command(about = "Topic discovery and collection algebra for bibliographic corpora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BibliotopicArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BibliotopicArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import papers from a JSON array or JSONL file
    Load(LoadArgs),

    /// Run topic discovery and commit a new topic generation
    Discover(DiscoverArgs),

    /// List the current topics with their paper counts
    Topics(StoreArgs),

    /// Create a group from a selection of papers
    Group(GroupArgs),

    /// List groups
    Groups(StoreArgs),

    /// Delete a group
    #[command(name = "delete-group")]
    DeleteGroup(DeleteGroupArgs),

    /// Combine two groups with union, intersection or difference
    Combine(CombineArgs),

    /// Search papers by title query, year, keyword, group or topic
    Search(SearchArgs),
}

/// Arguments naming only the store file
#[derive(Parser, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,
}

/// Arguments for importing papers
#[derive(Parser, Debug, Clone)]
pub struct LoadArgs {
    /// Path to the JSON store file (created if missing)
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Paper file (JSON array or JSONL)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Arguments for topic discovery
#[derive(Parser, Debug, Clone)]
pub struct DiscoverArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Discovery configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the visualization page
    #[arg(long, value_name = "PATH")]
    pub visualization: Option<PathBuf>,

    /// Skip writing the visualization page
    #[arg(long, conflicts_with = "visualization")]
    pub no_visualization: bool,

    /// Random seed for model training
    #[arg(long)]
    pub seed: Option<u64>,

    /// Train candidate models one after another
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for creating a group
#[derive(Parser, Debug, Clone)]
pub struct GroupArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Group name
    #[arg(short, long)]
    pub name: String,

    /// Member paper ids (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub papers: Vec<u64>,

    /// Group description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Owner name
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for deleting a group
#[derive(Parser, Debug, Clone)]
pub struct DeleteGroupArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Group id
    #[arg(value_name = "GROUP")]
    pub group: u64,
}

/// Arguments for combining groups
#[derive(Parser, Debug, Clone)]
pub struct CombineArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// First group id
    #[arg(value_name = "GROUP1")]
    pub first: u64,

    /// Second group id
    #[arg(value_name = "GROUP2")]
    pub second: u64,

    /// Operation: union, intersection or difference
    #[arg(value_name = "OPERATION")]
    pub operation: String,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the JSON store file
    #[arg(value_name = "STORE")]
    pub store: PathBuf,

    /// Title query (terms joined by AND or OR)
    #[arg(long)]
    pub query: Option<String>,

    /// Publication year
    #[arg(long)]
    pub year: Option<i32>,

    /// Keyword the title must contain
    #[arg(long)]
    pub keyword: Option<String>,

    /// Restrict to a group
    #[arg(long)]
    pub group: Option<u64>,

    /// Restrict to a topic of the current run, by the index that `topics` prints
    #[arg(long)]
    pub topic: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy adapters CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-adapters")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Datasource definition: built-in name or YAML file
    #[arg(short, long, global = true)]
    pub datasource: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in datasources
    List,

    /// Validate a datasource definition
    Validate,

    /// List the entities of a datasource
    Entities,

    /// Fetch a single page
    Page {
        #[command(flatten)]
        target: PageArgs,

        /// Opaque cursor from a previous page
        #[arg(long, default_value = "")]
        cursor: String,
    },

    /// Run a full sync of one entity
    Sync {
        #[command(flatten)]
        target: PageArgs,

        /// Resume from this cursor
        #[arg(long, default_value = "")]
        cursor: String,

        /// Maximum pages to fetch (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_pages: usize,
    },

    /// Decode an opaque cursor to JSON
    DecodeCursor {
        /// Opaque cursor
        cursor: String,
    },

    /// Encode a JSON cursor to its opaque form
    EncodeCursor {
        /// Cursor JSON, e.g. '{"collectionID":"g1","cursor":5}'
        json: String,
    },
}

/// Arguments shared by page-fetching commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Entity to fetch
    #[arg(short, long)]
    pub entity: String,

    /// Datasource base URL
    #[arg(long)]
    pub base_url: String,

    /// Credential for the datasource
    #[arg(long, env = "SOLIDAFY_AUTH_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Records per page
    #[arg(long, default_value = "100")]
    pub page_size: usize,

    /// Per-entity filter as ENTITY=FILTER (repeatable)
    #[arg(long = "filter", value_name = "ENTITY=FILTER")]
    pub filters: Vec<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

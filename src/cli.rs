// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// simgrep - Word-embedding similarity search for AI agents
///
/// Finds lines that mean something close to the query using a word-embedding
/// similarity grep, then pins each hit to exact file locations with ripgrep.
#[derive(Parser, Debug)]
#[command(name = "simgrep")]
#[command(
    author,
    version,
    about,
    long_about = None,
    override_usage = "simgrep [OPTIONS] <COMMAND>",
    after_help = "Search quickstart:\n  simgrep s \"open a database connection\" src/main.rs\n  simgrep s -r -g '*.rs' \"retry with backoff\" src/\n\nExact lookup:\n  simgrep l \"fn connect(\" src/"
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Run simgrep as an MCP stdio server
    #[command(visible_aliases = ["run"])]
    Serve,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Semantic search scored by word-embedding similarity
    #[command(
        visible_aliases = ["s"],
        after_help = "Examples:\n  simgrep s \"token refresh\" src/auth.rs\n  simgrep search -r \"auth flow\" src/ -t 0.6 -C 3"
    )]
    Search {
        /// Search query (words, not a pattern)
        query: String,

        /// File to search, or directory with --recursive (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        path: String,

        /// Search every file under PATH and resolve exact locations
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Filter files matching glob pattern (e.g., "*.rs", "src/**/*.ts")
        #[arg(short = 'g', long, visible_alias = "include")]
        glob: Option<String>,

        /// Minimum similarity score (0.0 - 1.0)
        #[arg(short = 't', long)]
        threshold: Option<f64>,

        /// Show N lines before and after each match (like grep -C)
        #[arg(short = 'C', long)]
        context: Option<usize>,

        /// Maximum number of results
        #[arg(short = 'm', long = "limit", visible_alias = "max-results")]
        limit: Option<usize>,
    },

    /// Exact literal lookup with file and line locations
    #[command(visible_aliases = ["l"])]
    Locate {
        /// Literal text to find
        text: String,

        /// File or directory to search (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        path: String,

        /// Filter files matching glob pattern
        #[arg(short = 'g', long, visible_alias = "include")]
        glob: Option<String>,

        /// Show N lines before and after each match
        #[arg(short = 'C', long)]
        context: Option<usize>,
    },

    /// MCP server commands
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

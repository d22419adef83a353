// SPDX-License-Identifier: MIT OR Apache-2.0

//! simgrep - Word-embedding similarity search for AI agents
//!
//! Runs a word-embedding similarity grep, parses its scored blocks, and
//! resolves each hit to exact file locations with ripgrep.

mod cli;
mod commands;
mod mcp;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, McpCommands, OutputFormat};
use simgrep::config::{Config, ConfigOutputFormat};
use simgrep::query::runner::ToolRunner;
use simgrep::query::search::SearchRequest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // stdout carries results and MCP traffic; logs go to stderr
    let filter = EnvFilter::try_from_env("SIMGREP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load();
    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });
    let compact = cli.compact;
    let runner = ToolRunner::new(config.tools.clone());

    match cli.command {
        Commands::Search {
            query,
            path,
            recursive,
            glob,
            threshold,
            context,
            limit,
        } => {
            let request = SearchRequest {
                query,
                path: PathBuf::from(path),
                recursive,
                glob,
                threshold,
                context,
                max_results: config.merge_max_results(limit),
            };
            commands::run_search(&runner, &request, format, compact)?;
        }
        Commands::Locate {
            text,
            path,
            glob,
            context,
        } => {
            commands::run_locate(
                &runner,
                &text,
                &PathBuf::from(path),
                glob.as_deref(),
                context,
                format,
                compact,
            )?;
        }
        Commands::Mcp { command } => match command {
            McpCommands::Serve => mcp::run(runner)?,
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "simgrep", &mut std::io::stdout());
        }
    }

    Ok(())
}

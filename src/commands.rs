// SPDX-License-Identifier: MIT OR Apache-2.0

//! `search` and `locate` command output

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::OutputFormat;
use simgrep::output::print_json;
use simgrep::query::runner::ToolRunner;
use simgrep::query::search::{self, SearchRequest};
use simgrep::{MatchLocation, SearchResult};

/// Run the search command
pub fn run_search(
    runner: &ToolRunner,
    request: &SearchRequest,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let result = search::search(runner, request)?;

    match format {
        OutputFormat::Json => print_json(&result, compact)?,
        OutputFormat::Text => print_search_text(&result),
    }

    Ok(())
}

fn print_search_text(result: &SearchResult) {
    if result.matches.is_empty() {
        println!("{} No similar lines found for: {}", "✗".red(), result.query.yellow());
        return;
    }

    println!("\n{} Similar to: {}\n", "🔍".cyan(), result.query.yellow());
    for m in &result.matches {
        println!(
            "  {} {}",
            format!("{:.4}", m.similarity).green(),
            m.match_text.trim()
        );
        match &m.locations {
            Some(locations) if locations.is_empty() => {
                println!("      {}", "(no exact location found)".dimmed());
            }
            Some(locations) => {
                for location in locations {
                    println!(
                        "      {}:{}",
                        location.file.cyan(),
                        location.line.to_string().yellow()
                    );
                }
            }
            None => {
                for entry in &m.context {
                    println!("      {}", entry.dimmed());
                }
            }
        }
    }
    println!(
        "\n{} Found {} matches",
        "✓".green(),
        result.total.to_string().cyan()
    );
}

/// Run the locate command
pub fn run_locate(
    runner: &ToolRunner,
    text: &str,
    path: &Path,
    glob: Option<&str>,
    context: Option<usize>,
    format: OutputFormat,
    compact: bool,
) -> Result<()> {
    let locations = search::locate(runner, text, path, glob, context)?;

    match format {
        OutputFormat::Json => print_json(&locations, compact)?,
        OutputFormat::Text => print_locate_text(text, &locations),
    }

    Ok(())
}

fn print_locate_text(text: &str, locations: &[MatchLocation]) {
    if locations.is_empty() {
        println!("{} No occurrences of: {}", "✗".red(), text.yellow());
        return;
    }

    for location in locations {
        println!("{}:{}", location.file.cyan(), location.line.to_string().yellow());
        for line in location.context.lines() {
            println!("  {}", line.dimmed());
        }
    }
    println!(
        "\n{} Found {} occurrences",
        "✓".green(),
        locations.len().to_string().cyan()
    );
}

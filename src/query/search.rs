// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic search: similarity tool run, parse, optional reconciliation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::errors::{EmptyQueryError, PathNotFoundError};
use crate::parser::similarity::parse_similarity_output;
use crate::parser::types::{MatchLocation, SearchResult};
use crate::query::reconcile::{reconcile, sort_by_similarity};
use crate::query::runner::{collect_files, concat_files, SimilarityInput, ToolRunner};

/// Parameters for one semantic search
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    /// File to search, or directory when `recursive`
    pub path: PathBuf,
    pub recursive: bool,
    pub glob: Option<String>,
    pub threshold: Option<f64>,
    pub context: Option<usize>,
    pub max_results: Option<usize>,
}

/// Run a semantic search.
///
/// Recursive searches feed every matching file to the similarity tool and
/// then look up where each matched line actually lives. Single-file searches
/// skip the lookup and leave `locations` unset.
pub fn search(runner: &ToolRunner, request: &SearchRequest) -> Result<SearchResult> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(EmptyQueryError.into());
    }
    let root = resolve_path(&request.path)?;

    let config = runner.config();
    let threshold = request.threshold.unwrap_or(config.threshold);
    let context = request.context.unwrap_or(config.context);
    let glob = request.glob.as_deref().or(config.glob.as_deref());

    let mut matches = if request.recursive {
        let files = collect_files(&root, glob)
            .with_context(|| format!("failed to list files under {}", root.display()))?;
        tracing::debug!(files = files.len(), root = %root.display(), "recursive search scope");
        if files.is_empty() {
            return Ok(SearchResult::new(query, Vec::new()));
        }

        let raw = runner.similarity_search(
            query,
            SimilarityInput::Stdin(concat_files(&files)),
            threshold,
            context,
        )?;
        let base = root.to_string_lossy();
        reconcile(parse_similarity_output(&raw), runner, &base, glob, context)
    } else {
        if root.is_dir() {
            bail!(
                "'{}' is a directory\n\n\
                 Suggestion: add --recursive to search every file under it.",
                request.path.display()
            );
        }
        let raw =
            runner.similarity_search(query, SimilarityInput::File(&root), threshold, context)?;
        let mut matches = parse_similarity_output(&raw);
        sort_by_similarity(&mut matches);
        matches
    };

    if let Some(limit) = request.max_results {
        matches.truncate(limit);
    }

    Ok(SearchResult::new(query, matches))
}

/// Find literal occurrences of `text` under `path`
pub fn locate(
    runner: &ToolRunner,
    text: &str,
    path: &Path,
    glob: Option<&str>,
    context: Option<usize>,
) -> Result<Vec<MatchLocation>> {
    if text.is_empty() {
        return Err(EmptyQueryError.into());
    }
    let root = resolve_path(path)?;
    let config = runner.config();
    let glob = glob.or(config.glob.as_deref());
    let context = context.unwrap_or(config.context);

    let locations = runner.locate(text, &root.to_string_lossy(), glob, context)?;
    Ok(locations)
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(PathNotFoundError {
            path: path.display().to_string(),
        }
        .into());
    }
    path.canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))
}

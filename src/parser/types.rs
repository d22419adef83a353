// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured records produced by the parsers

use serde::{Deserialize, Serialize};

/// One scored block from the similarity tool.
///
/// `line` and `match_text` describe the structural middle entry of `context`.
/// `locations` stays `None` until reconciliation attaches exact occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMatch {
    pub similarity: f64,
    pub line: usize,
    pub match_text: String,
    /// Raw `"<line>: <content>"` entries in the order the tool emitted them
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<MatchLocation>>,
}

/// One exact occurrence of matched text in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    /// Path relative to the search base (absolute when outside it)
    pub file: String,
    pub line: usize,
    /// Context lines joined with `\n`, prefixes stripped
    pub context: String,
}

/// Aggregate returned to the agent-facing layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub total: usize,
    pub matches: Vec<SimilarityMatch>,
}

impl SearchResult {
    pub fn new(query: impl Into<String>, matches: Vec<SimilarityMatch>) -> Self {
        Self {
            query: query.into(),
            total: matches.len(),
            matches,
        }
    }
}

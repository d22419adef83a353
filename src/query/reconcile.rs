// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attach exact file locations to similarity matches

use rayon::prelude::*;

use crate::errors::ToolError;
use crate::parser::types::{MatchLocation, SimilarityMatch};

/// Finds literal occurrences of a line of text under a base directory
pub trait LocationLookup: Sync {
    fn lookup(
        &self,
        text: &str,
        base: &str,
        glob: Option<&str>,
        context: usize,
    ) -> Result<Vec<MatchLocation>, ToolError>;
}

impl<F> LocationLookup for F
where
    F: Fn(&str, &str, Option<&str>, usize) -> Result<Vec<MatchLocation>, ToolError> + Sync,
{
    fn lookup(
        &self,
        text: &str,
        base: &str,
        glob: Option<&str>,
        context: usize,
    ) -> Result<Vec<MatchLocation>, ToolError> {
        self(text, base, glob, context)
    }
}

/// Look up every match's text and return the set sorted by score.
///
/// Lookups run in parallel. A failed lookup leaves that match with an empty
/// location list; the match itself is still reported.
pub fn reconcile<L: LocationLookup + ?Sized>(
    mut matches: Vec<SimilarityMatch>,
    lookup: &L,
    base: &str,
    glob: Option<&str>,
    context: usize,
) -> Vec<SimilarityMatch> {
    matches.par_iter_mut().for_each(|m| {
        let locations = if m.match_text.trim().is_empty() {
            // an empty literal would match every line
            Vec::new()
        } else {
            lookup
                .lookup(&m.match_text, base, glob, context)
                .unwrap_or_else(|err| {
                    tracing::warn!(text = %m.match_text, "location lookup failed: {}", err);
                    Vec::new()
                })
        };
        m.locations = Some(locations);
    });

    sort_by_similarity(&mut matches);
    matches
}

/// Stable sort, highest similarity first
pub fn sort_by_similarity(matches: &mut [SimilarityMatch]) {
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! simgrep - Word-embedding similarity search for AI agents
//!
//! The parsing core turns the text output of two external tools (a
//! word-embedding similarity grep and ripgrep) into structured match records.
//! The query layer runs those tools and reconciles their results.

pub mod config;
pub mod errors;
pub mod output;
pub mod parser;
pub mod query;

pub use parser::types::{MatchLocation, SearchResult, SimilarityMatch};

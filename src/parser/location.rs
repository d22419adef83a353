// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser for ripgrep context output
//!
//! With `--with-filename --line-number -C <n>` ripgrep writes match lines as
//! `path:12:content` and context lines as `path-11-content`, with `--` lines
//! between non-adjacent groups. Each group becomes one [`MatchLocation`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::ansi::strip_ansi;
use super::split_blocks;
use super::types::MatchLocation;

static MATCH_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?):(\d+):(.*)$").expect("valid match line regex"));

static CONTEXT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)-(\d+)-(.*)$").expect("valid context line regex"));

/// Parse ripgrep output into locations with paths relative to `base`.
///
/// Blocks without a match line are dropped; nothing here returns an error.
pub fn parse_location_output(output: &str, base: &str) -> Vec<MatchLocation> {
    let clean = strip_ansi(output);
    let locations: Vec<MatchLocation> = split_blocks(&clean)
        .into_iter()
        .filter_map(|block| parse_block(&block, base))
        .collect();
    tracing::debug!(count = locations.len(), base, "parsed location blocks");
    locations
}

fn parse_block(block: &str, base: &str) -> Option<MatchLocation> {
    let rows: Vec<Row<'_>> = block
        .lines()
        .map(|raw| Row::read(raw.trim_end_matches('\r')))
        .collect();

    // paths from lines only one notation can read
    let known: Vec<&str> = rows.iter().filter_map(Row::unambiguous_path).collect();

    let mut file = String::new();
    let mut line = 0usize;
    // keyed by line number: sorted, first occurrence wins
    let mut lines: BTreeMap<usize, &str> = BTreeMap::new();

    for row in &rows {
        match row.resolve(&known) {
            Some(LineKind::Match(path, number, content)) => {
                file = relativize(path, base);
                line = number;
                lines.entry(number).or_insert(content);
            }
            Some(LineKind::Context(number, content)) => {
                lines.entry(number).or_insert(content);
            }
            None => {}
        }
    }

    if file.is_empty() || line == 0 {
        return None;
    }

    Some(MatchLocation {
        file,
        line,
        context: lines.into_values().collect::<Vec<_>>().join("\n"),
    })
}

type Split<'a> = (&'a str, usize, &'a str);

enum LineKind<'a> {
    Match(&'a str, usize, &'a str),
    Context(usize, &'a str),
}

/// Both readings of one output line
struct Row<'a> {
    as_match: Option<Split<'a>>,
    as_context: Option<Split<'a>>,
}

impl<'a> Row<'a> {
    fn read(raw: &'a str) -> Self {
        Self {
            as_match: split_line(&MATCH_LINE_RE, raw),
            as_context: split_line(&CONTEXT_LINE_RE, raw),
        }
    }

    fn unambiguous_path(&self) -> Option<&'a str> {
        match (self.as_match, self.as_context) {
            (Some((path, _, _)), None) | (None, Some((path, _, _))) => Some(path),
            _ => None,
        }
    }

    /// The colon form wins unless only the dash form names a path already
    /// seen in the block (`path-12-t = "12:30:00"`).
    fn resolve(&self, known: &[&str]) -> Option<LineKind<'a>> {
        match (self.as_match, self.as_context) {
            (Some((m_path, _, _)), Some((_, number, content)))
                if !known.contains(&m_path) && self.context_path_known(known) =>
            {
                Some(LineKind::Context(number, content))
            }
            (Some((path, number, content)), _) => Some(LineKind::Match(path, number, content)),
            (None, Some((_, number, content))) => Some(LineKind::Context(number, content)),
            (None, None) => None,
        }
    }

    fn context_path_known(&self, known: &[&str]) -> bool {
        self.as_context.is_some_and(|(path, _, _)| known.contains(&path))
    }
}

fn split_line<'a>(re: &Regex, line: &'a str) -> Option<Split<'a>> {
    let caps = re.captures(line)?;
    let path = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse().ok()?;
    let content = caps.get(3).map_or("", |m| m.as_str());
    Some((path, number, content))
}

/// Make `path` relative to `base`.
///
/// Returns `""` when they are the same directory and the original path when
/// `base` is not a real directory prefix (`/a/b` does not prefix `/a/bc`).
pub fn relativize(path: &str, base: &str) -> String {
    let base = base.trim_end_matches(is_separator);
    let Some(rest) = path.strip_prefix(base) else {
        return path.to_string();
    };
    if rest.is_empty() {
        return String::new();
    }
    match rest.strip_prefix(is_separator) {
        Some(relative) => relative.to_string(),
        None => path.to_string(),
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser for word-embedding similarity output
//!
//! The similarity tool prints one block per hit, separated by `--` lines:
//!
//! ```text
//! Similarity: 0.8123
//! 10: previous line
//! 11: the line that scored
//! 12: next line
//! ```
//!
//! Output is usually colored, so it is normalized with [`strip_ansi`] first.
//! Blocks without a `Similarity:` header (banners, warnings) are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ansi::strip_ansi;
use super::split_blocks;
use super::types::SimilarityMatch;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Similarity:\s*(\d+(?:\.\d*)?|\.\d+)").expect("valid similarity header regex")
});

static NUMBERED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):\s?(.*)$").expect("valid numbered line regex"));

/// Parse the similarity tool's output into scored matches, in block order.
///
/// Never fails: malformed blocks and lines are dropped.
pub fn parse_similarity_output(output: &str) -> Vec<SimilarityMatch> {
    let clean = strip_ansi(output);
    let matches: Vec<SimilarityMatch> = split_blocks(&clean)
        .into_iter()
        .filter_map(|block| parse_block(&block))
        .collect();
    tracing::debug!(count = matches.len(), "parsed similarity blocks");
    matches
}

fn parse_block(block: &str) -> Option<SimilarityMatch> {
    let mut lines = block.lines().map(|line| line.trim_end_matches('\r'));
    let header = lines.next()?;
    let similarity: f64 = HEADER_RE.captures(header)?.get(1)?.as_str().parse().ok()?;

    let context: Vec<String> = lines
        .filter_map(parse_numbered_line)
        .map(|(line, content)| format!("{}: {}", line, content))
        .collect();

    let (line, match_text) = midpoint_entry(&context);

    Some(SimilarityMatch {
        similarity,
        line,
        match_text,
        context,
        locations: None,
    })
}

/// Split a `"<digits>: <content>"` line into its number and content
pub fn parse_numbered_line(line: &str) -> Option<(usize, &str)> {
    let caps = NUMBERED_LINE_RE.captures(line)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    let content = caps.get(2).map_or("", |m| m.as_str());
    Some((number, content))
}

/// Pick the match line as the entry at index `len / 2`.
///
/// The tool centers each hit in a symmetric context window, so the middle
/// entry is the scored line. A block with no numbered lines yields `(0, "")`.
fn midpoint_entry(context: &[String]) -> (usize, String) {
    context
        .get(context.len() / 2)
        .and_then(|entry| parse_numbered_line(entry))
        .map(|(line, content)| (line, content.to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(parse_similarity_output("").is_empty());
        assert!(parse_similarity_output("  \n\t\n  ").is_empty());
        assert!(parse_similarity_output("--\n--\n").is_empty());
    }

    #[test]
    fn blocks_are_parsed_in_order() {
        let input = "Similarity: 0.9100\n4: alpha\n--\nSimilarity: 0.4000\n9: beta\n--\nSimilarity: 0.7000\n1: gamma";
        let matches = parse_similarity_output(input);
        let scores: Vec<f64> = matches.iter().map(|m| m.similarity).collect();
        assert_eq!(scores, vec![0.91, 0.4, 0.7]);
        assert!(matches.iter().all(|m| m.locations.is_none()));
    }

    #[test]
    fn odd_context_uses_true_middle() {
        let input = "Similarity: 0.8000\n10: before\n11: target line\n12: after";
        let matches = parse_similarity_output(input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 11);
        assert_eq!(matches[0].match_text, "target line");
        assert_eq!(matches[0].context, vec!["10: before", "11: target line", "12: after"]);
    }

    #[test]
    fn even_context_uses_index_len_over_two() {
        let input = "Similarity: 0.6000\n10: a\n11: b\n12: c\n13: d";
        let matches = parse_similarity_output(input);
        assert_eq!(matches[0].line, 12);
        assert_eq!(matches[0].match_text, "c");

        let pair = parse_similarity_output("Similarity: 0.6\n10: a\n11: b");
        assert_eq!(pair[0].line, 11);
    }

    #[test]
    fn invalid_header_block_is_dropped_but_later_block_parses() {
        let input = "Not a valid header\n1: some line\n--\nSimilarity: 0.5000\n2: valid block";
        let matches = parse_similarity_output(input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, 0.5);
        assert_eq!(matches[0].line, 2);
        assert_eq!(matches[0].match_text, "valid block");
    }

    #[test]
    fn unnumbered_lines_are_ignored() {
        let input = "Similarity: 0.7\nwarning: something\n3: kept\nnoise";
        let matches = parse_similarity_output(input);
        assert_eq!(matches[0].context, vec!["3: kept"]);
        assert_eq!(matches[0].line, 3);
    }

    #[test]
    fn colored_output_is_normalized() {
        let input = "\x1b[1;32mSimilarity: 0.8765\x1b[0m\n\x1b[33m7\x1b[0m: \x1b[1mhighlighted\x1b[0m";
        let matches = parse_similarity_output(input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, 0.8765);
        assert_eq!(matches[0].context, vec!["7: highlighted"]);
    }

    #[test]
    fn indentation_after_separator_space_is_preserved() {
        let matches = parse_similarity_output("Similarity: 0.7\n5:     let x = 1;");
        assert_eq!(matches[0].match_text, "    let x = 1;");
        assert_eq!(matches[0].context, vec!["5:     let x = 1;"]);
    }

    #[test]
    fn out_of_range_scores_pass_through() {
        let matches = parse_similarity_output("Similarity: 1.5\n1: x");
        assert_eq!(matches[0].similarity, 1.5);
    }

    #[test]
    fn header_without_context_is_degenerate_record() {
        // Undocumented upstream behavior: we choose a zeroed record over an error.
        let matches = parse_similarity_output("Similarity: 0.6000");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 0);
        assert_eq!(matches[0].match_text, "");
        assert!(matches[0].context.is_empty());
    }

    #[test]
    fn crlf_delimiters_are_recognized() {
        let input = "Similarity: 0.5\r\n1: a\r\n--\r\nSimilarity: 0.6\r\n2: b\r\n";
        let matches = parse_similarity_output(input);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].match_text, "b");
    }

    #[test]
    fn numbered_line_allows_empty_content() {
        assert_eq!(parse_numbered_line("12:"), Some((12, "")));
        assert_eq!(parse_numbered_line("12: "), Some((12, "")));
        assert_eq!(parse_numbered_line("x12: a"), None);
    }

    #[test]
    fn separator_space_is_optional() {
        assert_eq!(parse_numbered_line("12:foo"), Some((12, "foo")));
        assert_eq!(parse_numbered_line("12: foo"), Some((12, "foo")));
        let matches = parse_similarity_output("Similarity: 0.7\n4:tight");
        assert_eq!(matches[0].match_text, "tight");
        assert_eq!(matches[0].context, vec!["4: tight"]);
    }
}

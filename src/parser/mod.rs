// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsers for external tool output

pub mod ansi;
pub mod escape;
pub mod location;
pub mod similarity;
pub mod types;

/// Delimiter line between blocks, shared by both tools
pub const BLOCK_DELIMITER: &str = "--";

/// Split on lines consisting solely of `--`, dropping blank segments
pub(crate) fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim_end_matches('\r') == BLOCK_DELIMITER {
            push_block(&mut blocks, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, &current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}

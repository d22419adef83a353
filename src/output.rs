// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON output helpers shared by the CLI and the MCP server

use anyhow::Result;
use serde::Serialize;

/// Serialize to a JSON string, pretty unless `compact`
pub fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// Print JSON to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    println!("{}", to_json(value, compact)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_json_has_no_newlines() {
        let json = to_json(&vec![1, 2, 3], true).expect("json");
        assert_eq!(json, "[1,2,3]");
    }

    #[test]
    fn pretty_json_is_indented() {
        let json = to_json(&serde_json::json!({"a": 1}), false).expect("json");
        assert!(json.contains("\n  \"a\": 1"));
    }
}

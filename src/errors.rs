// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with helpful suggestions
//!
//! Only the process layer fails. Parsers drop what they cannot read.

use thiserror::Error;

/// Failure while running one of the external tools
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "'{tool}' was not found on PATH\n\n\
         Suggestion: install it or point simgrep at it in .simgreprc.toml:\n\
         [tools]\n\
         {key} = \"/path/to/{tool}\""
    )]
    NotFound { tool: String, key: &'static str },

    #[error("failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {code}: {stderr}")]
    Failed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} was terminated by a signal")]
    Killed { tool: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error indicating the requested search path does not exist
#[derive(Debug, Error)]
#[error(
    "Path not found: '{path}'\n\n\
     Suggestion: pass an existing file, or a directory with --recursive.\n\
     Example: simgrep search \"retry with backoff\" src/ -r"
)]
pub struct PathNotFoundError {
    pub path: String,
}

/// Error indicating an empty query
#[derive(Debug, Error)]
#[error(
    "Query is empty\n\n\
     Example: simgrep search \"open a database connection\" src/main.rs"
)]
pub struct EmptyQueryError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_config_key() {
        let err = ToolError::NotFound {
            tool: "w2vgrep".to_string(),
            key: "similarity_command",
        };
        let msg = err.to_string();
        assert!(msg.contains("'w2vgrep' was not found"));
        assert!(msg.contains("similarity_command = \"/path/to/w2vgrep\""));
    }

    #[test]
    fn failed_includes_stderr() {
        let err = ToolError::Failed {
            tool: "rg".to_string(),
            code: 2,
            stderr: "regex parse error".to_string(),
        };
        assert_eq!(err.to_string(), "rg exited with status 2: regex parse error");
    }
}

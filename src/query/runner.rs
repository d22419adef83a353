// SPDX-License-Identifier: MIT OR Apache-2.0

//! External tool invocation
//!
//! Both tools are run through `sh -c` with every caller-supplied value
//! double-quoted and escaped. Exit status 1 means "no matches" for both.

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ToolConfig;
use crate::errors::ToolError;
use crate::parser::escape::quote;
use crate::parser::location::parse_location_output;
use crate::parser::types::MatchLocation;
use crate::query::reconcile::LocationLookup;

const NO_MATCHES_EXIT_CODE: i32 = 1;

/// What the similarity tool reads
#[derive(Debug, Clone)]
pub enum SimilarityInput<'a> {
    /// A single file passed as an argument
    File(&'a Path),
    /// Text piped on stdin
    Stdin(String),
}

/// Runs the similarity and line search tools with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    config: ToolConfig,
}

impl ToolRunner {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Run the similarity tool and return its raw output
    pub fn similarity_search(
        &self,
        query: &str,
        input: SimilarityInput<'_>,
        threshold: f64,
        context: usize,
    ) -> Result<String, ToolError> {
        let command = &self.config.similarity_command;
        ensure_available(command, "similarity_command")?;

        let mut line = format!(
            "{} -n -C {} -t {}",
            quote(command),
            context,
            threshold
        );
        if let Some(model) = &self.config.model_path {
            line.push_str(&format!(" -m {}", quote(&model.to_string_lossy())));
        }
        line.push(' ');
        line.push_str(&quote(query));

        match input {
            SimilarityInput::File(path) => {
                line.push(' ');
                line.push_str(&quote(&path.to_string_lossy()));
                run_shell(command, &line, None)
            }
            SimilarityInput::Stdin(text) => run_shell(command, &line, Some(text.into_bytes())),
        }
    }

    /// Find literal occurrences of `text` under `base` with ripgrep
    pub fn locate(
        &self,
        text: &str,
        base: &str,
        glob: Option<&str>,
        context: usize,
    ) -> Result<Vec<MatchLocation>, ToolError> {
        let command = &self.config.pattern_command;
        ensure_available(command, "pattern_command")?;

        let mut line = format!(
            "{} --no-heading --with-filename --line-number --color never --fixed-strings -C {}",
            quote(command),
            context
        );
        if let Some(glob) = glob {
            line.push_str(&format!(" --glob {}", quote(glob)));
        }
        line.push_str(&format!(" -- {} {}", quote(text), quote(base)));

        let output = run_shell(command, &line, None)?;

        // ripgrep prints a file target as given; report it relative to its directory
        let base_path = Path::new(base);
        let relative_to = if base_path.is_file() {
            base_path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default()
        } else {
            base.to_string()
        };
        Ok(parse_location_output(&output, &relative_to))
    }
}

impl LocationLookup for ToolRunner {
    fn lookup(
        &self,
        text: &str,
        base: &str,
        glob: Option<&str>,
        context: usize,
    ) -> Result<Vec<MatchLocation>, ToolError> {
        self.locate(text, base, glob, context)
    }
}

fn ensure_available(command: &str, key: &'static str) -> Result<(), ToolError> {
    which::which(command).map(|_| ()).map_err(|_| ToolError::NotFound {
        tool: command.to_string(),
        key,
    })
}

fn run_shell(tool: &str, line: &str, stdin: Option<Vec<u8>>) -> Result<String, ToolError> {
    tracing::debug!(command = line, "running external tool");

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(line)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    // stdin is written on its own thread while stdout drains
    let writer = match (stdin, child.stdin.take()) {
        (Some(bytes), Some(mut pipe)) => Some(std::thread::spawn(move || pipe.write_all(&bytes))),
        _ => None,
    };

    let output = child.wait_with_output()?;
    if let Some(writer) = writer {
        match writer.join() {
            // the tool may exit before reading everything
            Ok(Err(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(result) => result?,
            Err(_) => tracing::warn!("stdin writer thread panicked"),
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    match output.status.code() {
        Some(0) => Ok(stdout),
        Some(NO_MATCHES_EXIT_CODE) => {
            tracing::debug!(tool, "no matches");
            Ok(String::new())
        }
        Some(code) => Err(ToolError::Failed {
            tool: tool.to_string(),
            code,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        None => Err(ToolError::Killed {
            tool: tool.to_string(),
        }),
    }
}

/// Collect the files a recursive search covers, honoring ignore files and `glob`
pub fn collect_files(root: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>, ignore::Error> {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(true).git_ignore(true).git_exclude(true);

    if let Some(glob) = glob {
        let mut overrides = OverrideBuilder::new(root);
        overrides.add(glob)?;
        builder.overrides(overrides.build()?);
    }

    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Concatenate readable text files, each terminated by a newline
pub fn concat_files(files: &[PathBuf]) -> String {
    let mut text = String::new();
    for path in files {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                text.push_str(&content);
                if !content.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(err) => tracing::debug!(path = %path.display(), "skipping unreadable file: {}", err),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    #[test]
    fn collect_files_applies_glob() {
        let dir = TempDir::new().expect("tempdir");
        write_file(&dir.path().join("src/a.rs"), "fn a() {}\n");
        write_file(&dir.path().join("src/b.ts"), "const b = 1;\n");
        write_file(&dir.path().join("notes.md"), "# notes\n");

        let all = collect_files(dir.path(), None).expect("collect");
        assert_eq!(all.len(), 3);

        let rust = collect_files(dir.path(), Some("*.rs")).expect("collect");
        assert_eq!(rust, vec![dir.path().join("src/a.rs")]);
    }

    #[test]
    fn concat_files_terminates_each_file() {
        let dir = TempDir::new().expect("tempdir");
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        write_file(&a, "first");
        write_file(&b, "second\n");
        let missing = dir.path().join("missing.txt");

        assert_eq!(concat_files(&[a, missing, b]), "first\nsecond\n");
    }

    #[test]
    fn missing_binary_is_reported_with_config_key() {
        let runner = ToolRunner::new(ToolConfig {
            pattern_command: "simgrep-test-no-such-binary".to_string(),
            ..ToolConfig::default()
        });
        let err = runner
            .locate("text", "/tmp", None, 1)
            .expect_err("binary should be missing");
        assert!(matches!(err, ToolError::NotFound { key: "pattern_command", .. }));
    }
}

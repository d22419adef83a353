// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal color stripping

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// SGR sequences only: ESC '[' digits/semicolons 'm'
static SGR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR regex"));

/// Remove color/format escape sequences, leaving every other byte untouched
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    SGR_RE.replace_all(input, "")
}

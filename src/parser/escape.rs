// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escaping for values embedded in double-quoted shell arguments

/// Escape `value` for use inside `"..."` in a POSIX shell command line.
///
/// Backslash goes first so the later substitutions are not escaped twice.
pub fn escape_double_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

/// Wrap an escaped value in double quotes
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape_double_quoted(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_special_character_is_escaped() {
        assert_eq!(escape_double_quoted(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_double_quoted(r"C:\tmp"), r"C:\\tmp");
        assert_eq!(escape_double_quoted("$HOME"), r"\$HOME");
        assert_eq!(escape_double_quoted("`id`"), r"\`id\`");
    }

    #[test]
    fn all_four_compose_without_double_escaping() {
        assert_eq!(escape_double_quoted(r#"\"$`"#), r#"\\\"\$\`"#);
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_double_quoted("fn parse_line(x: &str)"), "fn parse_line(x: &str)");
    }

    #[test]
    fn quote_wraps_escaped_value() {
        assert_eq!(quote("a$b"), r#""a\$b""#);
    }
}

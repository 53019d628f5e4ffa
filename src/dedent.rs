//! Dedenting of multi-line string literals.
//!
//! ```text
//! description = "
//!     first line
//!       indented
//! "
//! ```
//!
//! evaluates to `"first line\n  indented\n"`: the common indentation of the
//! lines after the opening quote is removed, relative indentation is kept,
//! and the empty line the opening quote sits on is dropped.

/// Counts leading spaces and tabs.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Removes the common leading whitespace from every line but the first.
///
/// The indent is the smallest `leading blanks + 1` over the non-blank lines
/// after the first; the extra one accounts for the line break in front of
/// each line, so `indent - 1` characters are removed from the line itself.
/// Lines shorter than that become empty. Text on the opening line is kept
/// as is; when the string starts with a line break the empty opening line is
/// dropped together with that break.
pub fn dedent(text: &str) -> String {
    let skip_opening_line = text.starts_with('\n') || text.starts_with("\r\n");
    let lines: Vec<&str> = text.split('\n').collect();

    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line) + 1)
        .min()
        .unwrap_or(1);
    let strip = indent - 1;

    let mut out = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            if !skip_opening_line {
                out.push_str(line);
            }
            continue;
        }

        if i > 1 || !skip_opening_line {
            out.push('\n');
        }
        out.extend(line.chars().skip(strip));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::dedent;

    #[test]
    fn drops_opening_line_and_common_indent() {
        assert_eq!(dedent("\n  a\n  b\n"), "a\nb\n");
    }

    #[test]
    fn keeps_relative_indent() {
        assert_eq!(dedent("\n    a\n      b\n    c"), "a\n  b\nc");
    }

    #[test]
    fn keeps_text_on_opening_line() {
        assert_eq!(dedent("head\n    a\n    b"), "head\na\nb");
    }

    #[test]
    fn blank_lines_do_not_limit_indent() {
        assert_eq!(dedent("\n    a\n\n    b\n"), "a\n\nb\n");
    }

    #[test]
    fn short_whitespace_lines_become_empty() {
        assert_eq!(dedent("\n    a\n  \n    b"), "a\n\nb");
    }

    #[test]
    fn crlf_opening_line_is_dropped() {
        assert_eq!(dedent("\r\n  a\r\n"), "a\r\n");
    }
}

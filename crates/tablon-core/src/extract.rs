//! Isolates the filter expression inside a backend response

use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

/// A language tag on the opening fence line (`python`, `py`, `python3`, ...)
static LANGUAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]*$").expect("valid language tag regex"));

/// `name = <expr>` at the start of the code, but not `name == ...`
static LEADING_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=([^=].*)$").expect("valid assignment regex")
});

/// `name`, `print(name)` or `display(name)` on a line of its own
static ECHO_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:print|display)\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)|([A-Za-z_][A-Za-z0-9_]*))\s*;?\s*$")
        .expect("valid echo line regex")
});

/// Pulls candidate predicate text out of free-form backend output.
///
/// No syntax checking happens here; malformed text is rejected later by the
/// sandbox, which reports it together with the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeExtractor;

impl CodeExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, response: &str) -> String {
        let body = fenced_block(response).unwrap_or_else(|| response.trim());

        let code = body
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");

        match LEADING_ASSIGNMENT.captures(&code) {
            Some(captures) => drop_echo_lines(&captures[2], &captures[1]),
            None => code.trim().to_string(),
        }
    }
}

/// Strip trailing lines that only show the assigned variable again.
fn drop_echo_lines(code: &str, name: &str) -> String {
    let mut lines: Vec<&str> = code.trim().lines().collect();
    while let Some(last) = lines.last() {
        let echoes = last.trim().is_empty()
            || ECHO_LINE.captures(last).is_some_and(|captures| {
                captures
                    .get(1)
                    .or_else(|| captures.get(2))
                    .is_some_and(|echoed| echoed.as_str() == name)
            });
        if !echoes || lines.len() == 1 {
            break;
        }
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

/// Content of the first fenced block, without its language tag.
/// An unterminated fence runs to the end of the text.
fn fenced_block(response: &str) -> Option<&str> {
    let start = response.find(FENCE)? + FENCE.len();
    let rest = &response[start..];
    let content = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let (first_line, remainder) = content.split_once('\n').unwrap_or((content, ""));
    if LANGUAGE_TAG.is_match(first_line.trim()) && !remainder.trim().is_empty() {
        Some(remainder.trim())
    } else {
        Some(content.trim())
    }
}

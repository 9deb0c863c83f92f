//! Formatting helpers shared by the human-readable renderers.

use chrono::{DateTime, Local};
use serde_json::Value;
use std::io::{self, Write};

/// Width of the rule under single-record headings.
pub const RULE_WIDTH: usize = 40;
/// Width of the rule under list headings.
pub const LIST_RULE_WIDTH: usize = 72;

/// A horizontal rule made of box-drawing characters.
pub fn rule() -> String {
    "\u{2500}".repeat(RULE_WIDTH)
}

pub fn dashes(width: usize) -> String {
    "-".repeat(width)
}

/// Renders seconds as `Xh Ym`, or `Ym` under an hour.
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if max == 0 || count <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut shortened: String = s.chars().take(max - 3).collect();
    shortened.push_str("...");
    shortened
}

pub fn first_non_empty<'a>(values: &[&'a str]) -> &'a str {
    values
        .iter()
        .copied()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Parses an RFC 3339 timestamp into local time.
pub fn local_time(timestamp: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Local))
}

/// Formats an RFC 3339 timestamp as a local 12-hour clock time (`3:04 PM`).
pub fn clock_time(timestamp: &str) -> String {
    match local_time(timestamp) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => timestamp.to_string(),
    }
}

/// Displays a loosely-typed JSON value without quoting strings.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Writes a response body as-is, adding a newline only when it lacks one.
pub fn write_raw_json<W: Write>(out: &mut W, body: &[u8]) -> io::Result<()> {
    out.write_all(body)?;
    if body.last() != Some(&b'\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

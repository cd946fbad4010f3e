//! Parser for a single `.env` file
//!
//! Line oriented: `KEY=value`, `#` comments, optional single or double quotes
//! around the value. There is no escape processing and no interpolation.

use crate::config::types::EnvMap;

/// Parse file contents into a key/value mapping.
///
/// Within one file a repeated key keeps its last value.
pub fn parse_str(content: &str) -> EnvMap {
    content
        .lines()
        .filter_map(parse_line)
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Parse one line, returning `None` for blanks, comments and lines without `=`
fn parse_line(line: &str) -> Option<(&str, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let value = normalize_literal(strip_quotes(value.trim()));

    Some((key.trim(), value))
}

/// Remove one matching pair of surrounding quotes.
///
/// A lone quote character counts as its own pair and yields `""`.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

/// Canonicalize the boolean and null literals, case-insensitively
fn normalize_literal(value: &str) -> String {
    if value.eq_ignore_ascii_case("true") {
        "true".to_string()
    } else if value.eq_ignore_ascii_case("false") {
        "false".to_string()
    } else if value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("empty") {
        String::new()
    } else {
        value.to_string()
    }
}

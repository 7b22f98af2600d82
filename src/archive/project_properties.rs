//! Parser for `youngandroidproject/project.properties`.
//!
//! The file is a Java properties file written by the App Inventor server:
//! one `key=value` pair per line, `#` or `!` comment lines, and `\` escapes
//! for `:`, `=` and non-ASCII characters in values.

use crate::models::ProjectProperty;

/// Project name used when the properties file has no `name` key.
pub const UNNAMED_PROJECT: &str = "Unnamed Project";

/// Parses the file into properties, in file order.
///
/// Blank lines, comment lines and lines without `=` are skipped.
pub fn parse(text: &str) -> Vec<ProjectProperty> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                return None;
            }
            let (key, value) = line.split_once('=')?;
            Some(ProjectProperty {
                name: unescape(key.trim()),
                value: unescape(value.trim_start().trim_end_matches('\r')),
            })
        })
        .collect()
}

/// Value of the last `name` key, or [`UNNAMED_PROJECT`] when no such key
/// exists. An empty `name=` is kept as an empty name.
pub fn project_name(properties: &[ProjectProperty]) -> String {
    properties
        .iter()
        .rev()
        .find(|p| p.name == "name")
        .map(|p| p.value.clone())
        .unwrap_or_else(|| UNNAMED_PROJECT.to_string())
}

fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

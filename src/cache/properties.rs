//! Reader and writer for the `.properties` key/value text format the token
//! cache is stored in.
//!
//! Supported on read: `#`/`!` comment lines, `=`, `:` or whitespace between
//! key and value, backslash escapes including `\uXXXX`, and logical lines
//! continued with a trailing backslash.

use super::CacheError;

const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

/// Ordered key/value entries. Setting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Properties::default()
    }

    pub fn parse(text: &str) -> Result<Self, CacheError> {
        let mut properties = Properties::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            properties.set(unescape(key)?, unescape(value)?);
        }
        Ok(properties)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the entries, preceded by one comment line per element of
    /// `comments`.
    pub fn store(&self, comments: &[&str]) -> String {
        let mut out = String::new();
        for comment in comments {
            for line in comment.lines() {
                out.push('#');
                out.push_str(line);
                out.push('\n');
            }
        }
        for (key, value) in &self.entries {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        out
    }
}

/// Joins continued lines and drops blank and comment lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim_start_matches(WHITESPACE);
        let mut current = match pending.take() {
            Some(mut joined) => {
                joined.push_str(line);
                joined
            }
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                line.to_string()
            }
        };

        let trailing = current.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }

    if let Some(joined) = pending {
        lines.push(joined);
    }
    lines
}

/// Splits a logical line at the first unescaped separator. Both halves are
/// still escaped.
fn split_entry(line: &str) -> (&str, &str) {
    let mut chars = line.char_indices();
    let mut key_end = line.len();
    let mut value_start = line.len();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            ' ' | '\t' | '\u{c}' => {
                key_end = i;
                let rest = line[i..].trim_start_matches(WHITESPACE);
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                value_start = line.len() - rest.len();
                break;
            }
            _ => {}
        }
    }

    (
        &line[..key_end],
        line[value_start..].trim_start_matches(WHITESPACE),
    )
}

fn unescape(raw: &str) -> Result<String, CacheError> {
    // Collected as UTF-16 so that escaped surrogate pairs combine.
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut buf = [0u16; 2];
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        let c = if c == '\\' {
            match chars.next() {
                Some('t') => '\t',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('f') => '\u{c}',
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let unit = (hex.len() == 4)
                        .then(|| u16::from_str_radix(&hex, 16).ok())
                        .flatten()
                        .ok_or_else(|| {
                            CacheError::Syntax(format!("malformed \\uxxxx encoding: \\u{hex}"))
                        })?;
                    units.push(unit);
                    continue;
                }
                Some(other) => other,
                None => break,
            }
        } else {
            c
        };
        units.extend_from_slice(c.encode_utf16(&mut buf));
    }

    String::from_utf16(&units)
        .map_err(|_| CacheError::Syntax(format!("unpaired surrogate in {raw:?}")))
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
    out
}

// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reader for legacy `version.php` descriptors.
//!
//! The legacy dialect is a script fragment:
//!
//! ```text
//! defined('MOODLE_INTERNAL') || die();
//!
//! $plugin->component = 'mod_book';
//! $plugin->version   = 2022041900;
//! ```
//!
//! Only the guard statement and `$plugin->field = literal;` statements are
//! recognised. The guard must come before the first assignment. Comments
//! are honoured only outside string literals.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use plugdesc_core::PlugdescError;
use regex::Regex;
use tracing::debug;

use crate::manifest::{build_manifest, PluginManifest, RawValue};

/// Standard descriptor fields that carry no meaning here; skipped in this dialect only.
const IGNORED_FIELDS: &[&str] = &["release", "maturity", "dependencies"];

static GUARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^defined\(\s*['"][A-Z_][A-Z0-9_]*['"]\s*\)\s*\|\|\s*die\s*(?:\(\s*\))?$"#,
    )
    .unwrap()
});

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\$plugin\s*->\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").unwrap()
});

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

/// One `;`-terminated statement with comments removed.
#[derive(Debug, PartialEq)]
struct Statement {
    /// Line the statement starts on (1-based).
    line: usize,
    text: String,
}

/// Parse a legacy descriptor into a validated manifest.
pub fn parse_legacy(content: &str, origin: &str) -> Result<PluginManifest, PlugdescError> {
    let mut guarded = false;
    let mut fields = BTreeMap::new();

    for statement in statements(content) {
        if GUARD.is_match(&statement.text) {
            guarded = true;
            continue;
        }

        let Some(caps) = ASSIGNMENT.captures(&statement.text) else {
            continue;
        };

        if !guarded {
            return Err(PlugdescError::malformed(
                "guard",
                format!(
                    "{origin}: field assignment on line {} precedes the host guard",
                    statement.line
                ),
            ));
        }

        let field = &caps[1];
        if IGNORED_FIELDS.contains(&field) {
            debug!(field, origin, "ignoring legacy descriptor field");
            continue;
        }

        // Later assignments overwrite earlier ones, as the script would.
        fields.insert(field.to_string(), literal(&caps[2]));
    }

    if !guarded {
        return Err(PlugdescError::malformed(
            "guard",
            format!("{origin}: missing `defined(...) || die();` host guard"),
        ));
    }

    build_manifest(fields)
}

/// Split source into statements, dropping `//`, `#` and `/* */` comments
/// that appear outside string literals, and the `<?php` opener.
fn statements(content: &str) -> Vec<Statement> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut line = 1;
    let mut start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                if current.trim().is_empty() {
                    start = line;
                }
                current.push(c);
                read_string(c, &mut chars, &mut current, &mut line);
            }
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars, &mut line),
            '#' => skip_line(&mut chars, &mut line),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                skip_block(&mut chars, &mut line);
                current.push(' ');
            }
            ';' => {
                let text = current.trim();
                if !text.is_empty() {
                    out.push(Statement {
                        line: start,
                        text: text.to_string(),
                    });
                }
                current.clear();
            }
            _ => {
                if c.is_whitespace() && current.trim_start() == "<?php" {
                    current.clear();
                }
                if c == '\n' {
                    line += 1;
                } else if current.trim().is_empty() && !c.is_whitespace() {
                    start = line;
                }
                current.push(c);
            }
        }
    }

    out
}

/// Copy a quoted literal up to and including its closing quote.
fn read_string(
    quote: char,
    chars: &mut Peekable<Chars<'_>>,
    current: &mut String,
    line: &mut usize,
) {
    while let Some(c) = chars.next() {
        if c == '\n' {
            *line += 1;
        }
        current.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                if escaped == '\n' {
                    *line += 1;
                }
                current.push(escaped);
            }
        } else if c == quote {
            return;
        }
    }
}

fn skip_line(chars: &mut Peekable<Chars<'_>>, line: &mut usize) {
    for c in chars.by_ref() {
        if c == '\n' {
            *line += 1;
            return;
        }
    }
}

fn skip_block(chars: &mut Peekable<Chars<'_>>, line: &mut usize) {
    while let Some(c) = chars.next() {
        match c {
            '\n' => *line += 1,
            '*' if chars.peek() == Some(&'/') => {
                chars.next();
                return;
            }
            _ => {}
        }
    }
}

fn literal(expr: &str) -> RawValue {
    let expr = expr.trim();
    if let Some(inner) = unquote(expr, '\'').or_else(|| unquote(expr, '"')) {
        return RawValue::Str(inner.replace("\\'", "'").replace("\\\"", "\""));
    }
    if INTEGER.is_match(expr)
        && let Ok(value) = expr.parse()
    {
        return RawValue::Int(value);
    }
    RawValue::Other("expression")
}

fn unquote(expr: &str, quote: char) -> Option<&str> {
    expr.strip_prefix(quote)?.strip_suffix(quote)
}

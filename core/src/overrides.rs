//! Parser for the user-supplied header-override fragment.
//!
//! # Design
//! The fragment arrives without outer delimiters and in one of two dialects
//! the user never declares: the interior of a JSON object
//! (`"X-Trace": "abc", "X-Env": "ci"`) or TOML-style `key = value`
//! assignments separated by commas or newlines. JSON is tried first — it is
//! the common case, and TOML's lenient grammar would produce false positives
//! if tried first. Both attempts are explicit `Result`s; the two failure
//! reasons are combined into a single `Configuration` error only when both
//! dialects reject the fragment, with the JSON reason as the primary cause.

use crate::error::ApiError;

/// Parse a non-empty, pre-trimmed override fragment into header pairs.
///
/// The fragment is wrapped in `{ ... }` before the JSON attempt, and once
/// more as `temp = { ... }` before the TOML attempt (an inline table must
/// hang off a key to be a valid document). A successful TOML parse is
/// silent — the caller never learns JSON was tried and failed.
pub(crate) fn parse_fragment(fragment: &str) -> Result<Vec<(String, String)>, ApiError> {
    let wrapped = format!("{{ {fragment} }}");

    let json_err = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&wrapped)
    {
        Ok(map) => {
            return Ok(map.into_iter().map(|(k, v)| (k, json_text(v))).collect());
        }
        Err(e) => e,
    };

    let inline = format!("temp = {{ {} }}", comma_separated(fragment));
    match inline.parse::<toml::Table>() {
        Ok(mut table) => match table.remove("temp") {
            Some(toml::Value::Table(map)) => {
                Ok(map.into_iter().map(|(k, v)| (k, toml_text(v))).collect())
            }
            // Unreachable with the wrapping above, but don't panic on it.
            _ => Err(ApiError::Configuration(format!(
                "not valid JSON ({json_err}); TOML parsed but is not a table of header assignments"
            ))),
        },
        Err(toml_err) => Err(ApiError::Configuration(format!(
            "not valid JSON ({json_err}) nor valid TOML ({toml_err})"
        ))),
    }
}

/// Rewrite newline separators to commas so the fragment fits on one line.
///
/// Assignments in the TOML dialect may be separated by commas or by
/// newlines (one per line is the natural TOML idiom), but an inline table
/// must be single-line and comma-separated. Line breaks inside quoted
/// values are left alone, runs of blank lines collapse to one separator,
/// and a break next to an explicit comma inserts nothing.
fn comma_separated(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_break = false;

    for c in fragment.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q == '"' {
                // Literal strings ('...') have no escapes; basic ones do.
                escaped = true;
            } else if c == q {
                quote = None;
            }
            out.push(c);
            continue;
        }
        match c {
            '\n' | '\r' => pending_break = true,
            ',' => {
                pending_break = false;
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                if pending_break {
                    out.push(',');
                    pending_break = false;
                }
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

/// Header values must be text; non-string values keep their literal form.
fn json_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn toml_text(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

//! Key rules and literal parsing for configuration values.

use serde_json::Value;

/// Whether `key` names a setting.
///
/// Settings are upper-case identifiers: ASCII upper-case letters, digits and
/// underscores, with at least one letter.
#[must_use]
pub fn is_config_key(key: &str) -> bool {
    key.bytes().any(|byte| byte.is_ascii_uppercase())
        && key
            .bytes()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_')
}

/// Interpret a raw environment value.
///
/// JSON literals (numbers, booleans, `null`, quoted strings, arrays, objects)
/// and the `True`/`False`/`None` spellings are decoded; single-quoted text is
/// unquoted. Anything else is kept verbatim as a string.
#[must_use]
pub fn parse_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        "None" => return Value::Null,
        _ => {}
    }

    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Value::String(inner.to_string());
    }

    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(raw.to_string()))
}

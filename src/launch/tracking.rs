use std::path::Path;

use super::{ConfigError, Result};

pub const TRACKING_FRAME_VARIABLE: &str = "tracking_frame";

/// Reads the single `variable = "value"` assignment from a Cartographer Lua config.
///
/// Both the table field form (`tracking_frame = ...` inside `options = {}`) and
/// the field override form (`options.tracking_frame = ...`) count. The value may be written as a table field (`"imu_link",`) or a one element
/// tuple (`("imu_link",)`). Lua `--` comments are ignored. Zero or several
/// assignments are errors.
pub fn extract_string_assignment(path: &Path, text: &str, variable: &str) -> Result<String> {
    let mut found: Option<(usize, String)> = None;
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let code = strip_comment(line);
        let Some((key, raw_value)) = code.split_once('=') else {
            continue;
        };
        if !assigns(key, variable) || raw_value.starts_with('=') {
            continue;
        }
        if let Some((first, _)) = &found {
            return Err(ConfigError::DuplicateVariable {
                variable: variable.to_string(),
                path: path.to_path_buf(),
                first: *first,
                second: line_number,
            });
        }
        let value = single_string(raw_value).ok_or_else(|| ConfigError::InvalidValue {
            variable: variable.to_string(),
            path: path.to_path_buf(),
            line: line_number,
            value: raw_value.trim().to_string(),
        })?;
        found = Some((line_number, value));
    }
    found
        .map(|(_, value)| value)
        .ok_or_else(|| ConfigError::MissingVariable {
            variable: variable.to_string(),
            path: path.to_path_buf(),
        })
}

/// `key` is `variable` itself or a dotted path ending in it.
fn assigns(key: &str, variable: &str) -> bool {
    key.trim().rsplit('.').next().map(str::trim) == Some(variable)
}

fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (index, c) in line.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if line[index..].starts_with("--") => return &line[..index],
            None => {}
        }
    }
    line
}

fn single_string(raw: &str) -> Option<String> {
    let mut value = strip_trailing_comma(raw.trim());
    if let Some(inner) = value.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        value = strip_trailing_comma(inner.trim());
    }
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;
    if inner.is_empty() || inner.contains(quote) {
        return None;
    }
    Some(inner.to_string())
}

fn strip_trailing_comma(value: &str) -> &str {
    value.strip_suffix(',').map(str::trim_end).unwrap_or(value)
}

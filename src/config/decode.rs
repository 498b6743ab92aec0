// src/config/decode.rs

//! Decode an untyped [`ResourceConfig`] into a [`BuildRequest`].
//!
//! Decoding is strict about field names and weak about scalar types:
//! integers, floats and booleans are accepted wherever a string is expected
//! and rendered with their usual textual form. Lists, tables and datetimes
//! are type mismatches.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::Value;
use tracing::debug;

use crate::config::model::{BuildRequest, ResourceConfig};
use crate::config::normalize::normalize_variables;
use crate::errors::DecodeError;

/// Decode a configuration, returning the first problem found.
pub fn decode(config: &ResourceConfig) -> Result<BuildRequest, DecodeError> {
    let mut errors = Vec::new();
    let request = decode_into(config, &mut errors);
    match errors.into_iter().next() {
        Some(first) => Err(first),
        None => Ok(request),
    }
}

/// Decode a configuration, collecting every problem found.
///
/// The returned error list is never empty.
pub fn decode_all(config: &ResourceConfig) -> Result<BuildRequest, Vec<DecodeError>> {
    let mut errors = Vec::new();
    let request = decode_into(config, &mut errors);
    if errors.is_empty() {
        Ok(request)
    } else {
        Err(errors)
    }
}

fn decode_into(config: &ResourceConfig, errors: &mut Vec<DecodeError>) -> BuildRequest {
    let mut request = BuildRequest::default();

    for (key, value) in config.merged() {
        match key.as_str() {
            "directory" => {
                match weak_string("directory", value).and_then(|dir| expand_home(&dir)) {
                    Ok(dir) => request.directory = dir,
                    Err(e) => errors.push(e),
                }
            }
            "target" => match weak_string("target", value) {
                Ok(target) => request.target = target,
                Err(e) => errors.push(e),
            },
            "variables" => match decode_variables(value) {
                Ok(vars) => request.variables = vars,
                Err(e) => errors.push(e),
            },
            _ => errors.push(DecodeError::UnknownField(key)),
        }
    }

    debug!(
        directory = %request.directory.display(),
        target = %request.target,
        variables = request.variables.len(),
        problems = errors.len(),
        "decoded resource configuration"
    );

    request
}

fn decode_variables(value: Value) -> Result<BTreeMap<String, String>, DecodeError> {
    match normalize_variables(value)? {
        Value::Table(table) => table
            .into_iter()
            .map(|(key, value)| {
                let value = weak_string(&format!("variables.{key}"), value)?;
                Ok((key, value))
            })
            .collect(),
        other => Err(DecodeError::TypeMismatch {
            field: "variables".to_string(),
            expected: "table",
            found: other.type_str(),
        }),
    }
}

fn weak_string(field: &str, value: Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        other => Err(DecodeError::TypeMismatch {
            field: field.to_string(),
            expected: "string",
            found: other.type_str(),
        }),
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, DecodeError> {
    expand_home_with(path, dirs::home_dir)
}

fn expand_home_with(
    path: &str,
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, DecodeError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return Err(DecodeError::HomeExpansion(format!(
            "cannot expand user-specific home dir in '{path}'"
        )));
    }

    let home = home_dir().ok_or_else(|| {
        DecodeError::HomeExpansion("failed to determine home directory".to_string())
    })?;

    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(Path::new(rest)))
    }
}

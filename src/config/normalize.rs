// src/config/normalize.rs

//! Undo the singleton-list wrapping of variable maps.
//!
//! The host's weakly-typed configuration format hands a map of variables
//! over as a one-element list holding the map (`[{ k = "v" }]`), and the
//! same artifact can appear again inside nested values. TOML's
//! `[[variables]]` array-of-tables produces the same shape.

use toml::Value;

use crate::errors::DecodeError;

/// Flatten a possibly singleton-wrapped value.
///
/// - `[ { .. } ]` is unwrapped to the inner table, with every value in the
///   table normalized recursively.
/// - A list with zero or more than one element is rejected with
///   [`DecodeError::MalformedVariables`].
/// - A one-element list holding something other than a table, and any
///   non-list value, is returned unchanged.
pub fn normalize_variables(value: Value) -> Result<Value, DecodeError> {
    match value {
        Value::Array(items) => {
            let [only]: [Value; 1] = items
                .try_into()
                .map_err(|items: Vec<Value>| DecodeError::MalformedVariables { len: items.len() })?;

            match only {
                Value::Table(table) => {
                    let mut flat = toml::Table::new();
                    for (key, value) in table {
                        flat.insert(key, normalize_variables(value)?);
                    }
                    Ok(Value::Table(flat))
                }
                other => Ok(Value::Array(vec![other])),
            }
        }
        other => Ok(other),
    }
}

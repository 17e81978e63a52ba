//! Validation of untyped host data passed to the list-mutating calls.

use crate::error::EditorError;
use serde_json::Value;

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Input to an additive call: one string, or an array of strings.
pub(crate) fn email_inputs(value: &Value) -> Result<Vec<&str>, EditorError> {
    match value {
        Value::String(email) => Ok(vec![email.as_str()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| EditorError::InvalidEmailValue {
                    found: describe(item),
                })
            })
            .collect(),
        other => Err(EditorError::InvalidEmailValue {
            found: describe(other),
        }),
    }
}

/// Input to a replacing call: an array of strings.
pub(crate) fn email_list(value: &Value) -> Result<Vec<&str>, EditorError> {
    let Value::Array(items) = value else {
        return Err(EditorError::InvalidEmailList {
            index: None,
            found: describe(value),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().ok_or_else(|| EditorError::InvalidEmailList {
                index: Some(index),
                found: describe(item),
            })
        })
        .collect()
}

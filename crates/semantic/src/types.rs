use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SemanticError;

/// Embedding returned by a provider, kept exactly as the provider produced it.
///
/// Feature-extraction endpoints answer with either a flat vector (`[f32]`) or a
/// nested one (token-level `[[f32]]`, batched `[[[f32]]]`). The shape is opaque
/// to this crate; it only checks that the value is an array of numbers or an
/// array of such arrays, so provider error objects never pass as vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Value);

impl Embedding {
    /// Validate a provider JSON value and wrap it.
    pub fn from_value(value: Value) -> Result<Self, SemanticError> {
        check_shape(&value, 0)?;
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Dimensions along the first element of every nesting level,
    /// e.g. `[1, 384]` for a single-token-row response.
    pub fn shape(&self) -> Vec<usize> {
        let mut dims = Vec::new();
        let mut current = &self.0;
        while let Value::Array(items) = current {
            dims.push(items.len());
            match items.first() {
                Some(first) => current = first,
                None => break,
            }
        }
        dims
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(vector: Vec<f32>) -> Self {
        Self(Value::Array(
            vector.into_iter().map(|v| Value::from(f64::from(v))).collect(),
        ))
    }
}

fn check_shape(value: &Value, depth: usize) -> Result<(), SemanticError> {
    let Value::Array(items) = value else {
        return Err(SemanticError::InvalidResponse(format!(
            "embedding must be an array, got {}",
            kind_name(value)
        )));
    };

    if items.iter().all(Value::is_number) {
        return Ok(());
    }
    if items.iter().all(Value::is_array) {
        return items.iter().try_for_each(|item| check_shape(item, depth + 1));
    }

    Err(SemanticError::InvalidResponse(format!(
        "embedding entries at depth {depth} must be all numbers or all arrays"
    )))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use serde::Serialize;
use serde_json::{Map, Value};

use crate::float_guard::reject_floats;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A finite floating-point number was found; transactions carry none.
    #[error("floating-point number detected at {0}")]
    FloatNumber(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// The value could not be converted into JSON or written out.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    segments: Vec<String>,
}

impl Path {
    pub(crate) fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub(crate) fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    pub(crate) fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes.
///
/// Output is the encoding ledger nodes hash: object members sorted by key
/// (code point order), no insignificant whitespace, strings written as raw
/// UTF-8. Only `"`, `\` and control characters below U+0020 are escaped;
/// non-ASCII text and DEL are emitted as-is. Array order is preserved.
/// `null` members are kept as they are; which fields are `null` versus
/// omitted is decided by the types being encoded, never here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical bytes for an already-built JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;

        serde_json::to_vec(&sorted(value))
            .map_err(|e| CanonicalizationError::Serialization(e.to_string()))
    }

    /// Produces canonical bytes for any serializable value.
    ///
    /// Floating-point data is rejected on the typed value first, because
    /// `serde_json` turns NaN and infinities into `null` during conversion.
    pub fn canonicalize_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        reject_floats(value)?;
        let value = serde_json::to_value(value)
            .map_err(|e| CanonicalizationError::Serialization(e.to_string()))?;
        self.canonicalize(&value)
    }

    /// Validates the JSON value: integers only.
    #[allow(clippy::only_used_in_recursion)]
    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => {
                // Integers only; amounts travel as strings.
                if !num.is_f64() {
                    return Ok(());
                }
                match num.as_f64() {
                    Some(f) if f.is_finite() => {
                        Err(CanonicalizationError::FloatNumber(path.to_string()))
                    }
                    _ => Err(CanonicalizationError::NonFiniteNumber(path.to_string())),
                }
            }
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

/// Rebuilds `value` with every object's members inserted in key order, so
/// the output is sorted whichever map backend `serde_json` was built with.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, child) in entries {
                out.insert(key.clone(), sorted(child));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

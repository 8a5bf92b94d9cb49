use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

/// Amount of an output in the asset's smallest unit.
///
/// Carried as a decimal string so no platform ever formats it as a float.
/// The canonical form has no sign and no leading zeros (`"0"` is allowed)
/// and must fit in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Parses and validates a decimal amount string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_canonical_unsigned(&value) {
            return Err(ValidationError::PatternMismatch {
                field: "amount",
                value,
            });
        }
        if value.parse::<u64>().is_err() {
            return Err(ValidationError::OutOfBounds {
                field: "amount",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Amount of one indivisible unit, the default for a CREATE output.
    pub fn one() -> Self {
        Self("1".to_string())
    }

    /// Numeric value. A deserialized amount is not yet validated, so this
    /// can fail.
    pub fn value(&self) -> Result<u64, ValidationError> {
        self.validate()?;
        self.0.parse().map_err(|_| ValidationError::OutOfBounds {
            field: "amount",
            value: self.0.clone(),
        })
    }

    /// Borrows the decimal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-runs validation, e.g. on an amount read from JSON.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::parse(self.0.clone()).map(|_| ())
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_canonical_unsigned(value: &str) -> bool {
    let re = Regex::new(r"^(0|[1-9][0-9]*)$").expect("invalid regex");
    re.is_match(value)
}

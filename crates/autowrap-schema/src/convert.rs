//! Pluggable per-field converters
//!
//! A converter replaces the built-in text conversion of a scalar field with a
//! custom two-way `string <-> value` mapping.

use crate::error::ConvertError;
use crate::value::{ScalarType, Value};
use std::fmt::Debug;

/// Two-way conversion between wire text and a scalar value
pub trait FieldConverter: Send + Sync + Debug {
    /// Scalar type produced by [`from_wire`](Self::from_wire)
    fn value_type(&self) -> ScalarType;

    /// Parse wire text
    ///
    /// # Errors
    /// Returns an error when the text is not valid for this converter
    fn from_wire(&self, raw: &str) -> Result<Value, ConvertError>;

    /// Format a value as wire text
    ///
    /// # Errors
    /// Returns an error when the value has an incompatible type
    fn to_wire(&self, value: &Value) -> Result<String, ConvertError>;

    /// Converter name (for debugging/serialization)
    fn name(&self) -> &'static str;
}

/// Fixed-precision float converter (`f2`-style)
///
/// Reads round to the configured number of decimals; writes always print
/// exactly that many decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrecisionConverter {
    decimals: usize,
}

impl FixedPrecisionConverter {
    /// Create converter with the given decimal count
    #[inline]
    #[must_use]
    pub fn new(decimals: usize) -> Self {
        Self { decimals }
    }

    /// Two-decimal converter used for weights and values
    #[inline]
    #[must_use]
    pub fn two_places() -> Self {
        Self::new(2)
    }

    /// Configured decimal count
    #[inline]
    #[must_use]
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(i32::try_from(self.decimals).unwrap_or(i32::MAX));
        if scale.is_finite() {
            (value * scale).round() / scale
        } else {
            value
        }
    }
}

impl FieldConverter for FixedPrecisionConverter {
    fn value_type(&self) -> ScalarType {
        ScalarType::Float
    }

    fn from_wire(&self, raw: &str) -> Result<Value, ConvertError> {
        match ScalarType::Float.parse(raw)? {
            Value::Float(f) => Ok(Value::Float(self.round(f))),
            other => Ok(other),
        }
    }

    fn to_wire(&self, value: &Value) -> Result<String, ConvertError> {
        match ScalarType::Float.coerce(value.clone())? {
            Value::Float(f) => Ok(format!("{f:.prec$}", prec = self.decimals)),
            other => Err(ConvertError::TypeMismatch {
                expected: ScalarType::Float,
                actual: other.scalar_type(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "fixed_precision"
    }
}

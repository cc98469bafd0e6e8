//! Scalar values and built-in text conversion

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar types a field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Free text
    String,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// `true`/`false`
    Boolean,
}

impl ScalarType {
    /// Parse wire text with the built-in converter for this type
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidLiteral`] if the text does not parse
    pub fn parse(self, raw: &str) -> Result<Value, ConvertError> {
        let invalid = || ConvertError::invalid_literal(self, raw);
        match self {
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Integer => raw.trim().parse().map(Value::Integer).map_err(|_| invalid()),
            Self::Float => raw.trim().parse().map(Value::Float).map_err(|_| invalid()),
            Self::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(invalid()),
            },
        }
    }

    /// Coerce a value into this type
    ///
    /// Integers widen to floats; every other mismatch is an error.
    ///
    /// # Errors
    /// Returns [`ConvertError::TypeMismatch`] for incompatible values
    pub fn coerce(self, value: Value) -> Result<Value, ConvertError> {
        match (self, value) {
            (Self::Float, Value::Integer(i)) => {
                #[allow(clippy::cast_precision_loss)]
                Ok(Value::Float(i as f64))
            }
            (expected, value) if value.scalar_type() == expected => Ok(value),
            (expected, value) => Err(ConvertError::TypeMismatch {
                expected,
                actual: value.scalar_type(),
            }),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A scalar field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text value
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Boolean(bool),
}

impl Value {
    /// Type of this value
    #[inline]
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::String(_) => ScalarType::String,
            Self::Integer(_) => ScalarType::Integer,
            Self::Float(_) => ScalarType::Float,
            Self::Boolean(_) => ScalarType::Boolean,
        }
    }

    /// Text content, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Wire text produced by the built-in converter
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }

    /// Text used as a dictionary key
    #[must_use]
    pub fn key_text(&self) -> String {
        self.to_wire()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Typed extraction from a [`Value`]
pub trait FromValue: Sized {
    /// Convert, failing on a type mismatch
    ///
    /// # Errors
    /// Returns [`ConvertError::TypeMismatch`] when the value has another type
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $scalar:ident, $pat:pat => $out:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConvertError> {
                match value {
                    $pat => Ok($out),
                    other => Err(ConvertError::TypeMismatch {
                        expected: ScalarType::$scalar,
                        actual: other.scalar_type(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(String, String, Value::String(s) => s);
impl_from_value!(i64, Integer, Value::Integer(i) => i);
impl_from_value!(bool, Boolean, Value::Boolean(b) => b);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match ScalarType::Float.coerce(value)? {
            Value::Float(f) => Ok(f),
            other => Err(ConvertError::TypeMismatch {
                expected: ScalarType::Float,
                actual: other.scalar_type(),
            }),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| ConvertError::invalid_literal(ScalarType::Integer, &wide.to_string()))
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

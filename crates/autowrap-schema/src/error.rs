//! Schema and conversion errors

use crate::value::ScalarType;

/// Failure converting between wire text and a scalar value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Text is not a valid literal for the expected type
    #[error("invalid {expected} literal: {raw:?}")]
    InvalidLiteral {
        /// Type the text was parsed as
        expected: ScalarType,
        /// Offending text
        raw: String,
    },

    /// Value has a different scalar type than required
    #[error("expected {expected} value, got {actual}")]
    TypeMismatch {
        /// Required type
        expected: ScalarType,
        /// Type actually supplied
        actual: ScalarType,
    },
}

impl ConvertError {
    /// Create invalid literal error
    #[inline]
    #[must_use]
    pub fn invalid_literal(expected: ScalarType, raw: &str) -> Self {
        Self::InvalidLiteral {
            expected,
            raw: raw.to_string(),
        }
    }
}

/// Configuration error found while introspecting a schema type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Field tags match zero or several binding kinds
    #[error("field {type_name}.{field} has no unambiguous binding: {reason}")]
    UnrecognizedFieldBinding {
        /// Owning schema type
        type_name: String,
        /// Field name
        field: String,
        /// What went wrong
        reason: String,
    },

    /// Method could not be resolved to a helper kind and field
    #[error("method {type_name}.{method} does not match any Init/Clear/Add target")]
    UnmatchedHelperMethod {
        /// Owning schema type
        type_name: String,
        /// Method name
        method: String,
    },

    /// Dictionary-bound field declares no key field
    #[error("dictionary field {type_name}.{field} declares no key field")]
    MissingDictionaryKey {
        /// Owning schema type
        type_name: String,
        /// Field name
        field: String,
    },

    /// Schema type extends itself, directly or through its bases
    #[error("schema type {type_name} inherits from itself")]
    InheritanceCycle {
        /// Type where the cycle was detected
        type_name: String,
    },
}

impl SchemaError {
    /// Create unrecognized binding error
    #[inline]
    #[must_use]
    pub fn unrecognized(type_name: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::UnrecognizedFieldBinding {
            type_name: type_name.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Create unmatched method error
    #[inline]
    #[must_use]
    pub fn unmatched_method(type_name: &str, method: &str) -> Self {
        Self::UnmatchedHelperMethod {
            type_name: type_name.to_string(),
            method: method.to_string(),
        }
    }
}

/// Result alias for introspection
pub type SchemaResult<T> = Result<T, SchemaError>;

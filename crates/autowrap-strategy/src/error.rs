//! Strategy configuration errors

use autowrap_schema::{BindingKind, ConvertError, HelperKind, ScalarType, SchemaError};

/// Configuration error raised while planning accessors and helpers
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// No base strategy matched the field
    #[error("no base strategy applies to field {field}")]
    NoBaseStrategy {
        /// Field name
        field: String,
    },

    /// Several base strategies matched the field
    #[error("field {field} matches several base strategies: {}", strategies.join(", "))]
    ConflictingBaseStrategies {
        /// Field name
        field: String,
        /// Matching strategies
        strategies: Vec<&'static str>,
    },

    /// Complex elements are read-only; identity is established via `Init`
    #[error("complex element field {field} cannot declare a setter")]
    SetterOnComplexElement {
        /// Field name
        field: String,
    },

    /// Sequences are read-only; items are added via `Add`
    #[error("sequence field {field} cannot declare a setter")]
    SetterOnSequence {
        /// Field name
        field: String,
    },

    /// Custom converter yields another type than the field
    #[error("converter of field {field} produces {actual}, field is {expected}")]
    ConverterTypeMismatch {
        /// Field name
        field: String,
        /// Field type
        expected: ScalarType,
        /// Converter type
        actual: ScalarType,
    },

    /// Custom converter combined with a static default
    #[error("field {field} combines a custom converter with a default value")]
    ConverterWithDefault {
        /// Field name
        field: String,
    },

    /// Default value does not fit the field type
    #[error("default of field {field} does not fit: {source}")]
    DefaultTypeMismatch {
        /// Field name
        field: String,
        /// Conversion failure
        source: ConvertError,
    },

    /// Dictionary key field missing on the entry type
    #[error("key field {key} of {field} is not a readable scalar of {target}")]
    UnknownKeyField {
        /// Dictionary field
        field: String,
        /// Declared key field
        key: String,
        /// Entry type name
        target: String,
    },

    /// Helper parameter has no matching property
    #[error("parameter {param} of {method} matches no settable property")]
    UnmatchedHelperParameter {
        /// Method name
        method: String,
        /// Parameter name
        param: String,
    },

    /// Keyed `Add` method lacks a parameter for the key field
    #[error("{method} has no parameter for dictionary key {key}")]
    MissingKeyParameter {
        /// Method name
        method: String,
        /// Key field
        key: String,
    },

    /// Helper kind unsupported for the field's binding
    #[error("{kind} helper {method} is not supported for a {binding} field")]
    HelperNotApplicable {
        /// Method name
        method: String,
        /// Helper kind
        kind: HelperKind,
        /// Field binding
        binding: BindingKind,
    },

    /// Auto-init requested where nothing can be initialized
    #[error("auto-init is not applicable to field {field}: {reason}")]
    AutoInitNotApplicable {
        /// Field name
        field: String,
        /// Why not
        reason: &'static str,
    },

    /// No method strategy registered for a helper kind
    #[error("no strategy handles {kind} method {method}")]
    NoMethodStrategy {
        /// Method name
        method: String,
        /// Helper kind
        kind: HelperKind,
    },

    /// Nested schema type failed introspection
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl StrategyError {
    /// Create helper-not-applicable error
    #[inline]
    #[must_use]
    pub fn not_applicable(method: &str, kind: HelperKind, binding: BindingKind) -> Self {
        Self::HelperNotApplicable {
            method: method.to_string(),
            kind,
            binding,
        }
    }

    /// Create unmatched parameter error
    #[inline]
    #[must_use]
    pub fn unmatched_param(method: &str, param: &str) -> Self {
        Self::UnmatchedHelperParameter {
            method: method.to_string(),
            param: param.to_string(),
        }
    }
}

//! Error types for wrapper generation and runtime access

use autowrap_dom::DomError;
use autowrap_schema::{ConvertError, SchemaError};
use autowrap_session::SessionError;
use autowrap_strategy::StrategyError;

/// Errors raised by the generator and by wrapper instances
#[derive(Debug, thiserror::Error)]
pub enum WrapperError {
    /// Tree operation failed
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Text conversion failed
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Schema type could not be introspected
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Accessor or helper could not be planned
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// Session could not be opened
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Configuration text could not be parsed
    #[error("invalid generator configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// No accessor with this name
    #[error("type {type_name} has no field {field}")]
    UnknownField {
        /// Generated type name
        type_name: String,
        /// Requested field
        field: String,
    },

    /// No helper method with this name
    #[error("type {type_name} has no helper method {method}")]
    UnknownMethod {
        /// Generated type name
        type_name: String,
        /// Requested method
        method: String,
    },

    /// No settable scalar property with this name on the created child
    #[error("type {type_name} has no settable property {property}")]
    UnknownProperty {
        /// Generated type name
        type_name: String,
        /// Requested property
        property: String,
    },

    /// Accessor used against the wrong kind of binding
    #[error("field {field} is bound as {actual}, not as {expected}")]
    WrongBinding {
        /// Field name
        field: String,
        /// Binding the accessor needs
        expected: &'static str,
        /// Actual binding
        actual: &'static str,
    },

    /// Field has no getter
    #[error("field {field} is not readable")]
    NotReadable {
        /// Field name
        field: String,
    },

    /// Field has no setter
    #[error("field {field} is not writable")]
    NotWritable {
        /// Field name
        field: String,
    },

    /// Helper called with the wrong number of arguments
    #[error("method {method} takes {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Method name
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Passed argument count
        actual: usize,
    },

    /// Strict clear found nothing to remove
    #[error("element {name} not found")]
    ElementNotFound {
        /// Element or attribute name
        name: String,
    },

    /// Keyed add without a value for the key field
    #[error("adding to {field} requires a value for key field {key}")]
    MissingKey {
        /// Sequence field
        field: String,
        /// Key field of the entries
        key: String,
    },

    /// Another entry of a dictionary already uses this key
    #[error("{field} already has an entry with key {key}")]
    DuplicateKey {
        /// Sequence field
        field: String,
        /// Conflicting key text
        key: String,
    },

    /// Document has no root element to wrap
    #[error("document has no root element")]
    NoRoot,
}

impl WrapperError {
    /// Create unknown field error
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create unknown method error
    pub fn unknown_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Create wrong binding error
    pub fn wrong_binding(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongBinding {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create duplicate key error
    pub fn duplicate_key(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
            key: key.into(),
        }
    }

    /// Whether this error was raised at generation time
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::Strategy(_) | Self::Config(_))
    }
}

/// Result alias for generator and wrapper operations
pub type WrapperResult<T> = Result<T, WrapperError>;

//! Accessor and helper plans emitted by strategies
//!
//! A plan is the data equivalent of generated source: everything the
//! runtime needs to serve one field or one helper method.

use crate::error::StrategyError;
use autowrap_schema::{
    ConvertError, FieldConverter, HelperKind, ScalarType, SchemaField, TypeRef, Value, WireName,
};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Name of a generated implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Wrap a name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name as text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nested schema type referenced by a binding
#[derive(Debug, Clone, Serialize)]
pub struct TypeTarget {
    /// Generated implementation name
    pub name: TypeName,
    /// Schema type handle
    #[serde(skip)]
    pub type_ref: TypeRef,
}

/// Collection shape of a sequence binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceShape {
    /// Immutable snapshot
    Array,
    /// Shared list
    List,
    /// Shared map keyed by the entry's key field
    Dict,
    /// Shared map of lists grouped by the entry's key field
    DictOfLists,
}

impl SequenceShape {
    /// Whether entries are keyed
    #[inline]
    #[must_use]
    pub fn is_keyed(self) -> bool {
        matches!(self, Self::Dict | Self::DictOfLists)
    }
}

/// Where a field's data lives in the DOM
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// Attribute of the wrapped element
    Attribute {
        /// Attribute name
        name: String,
    },
    /// Text content of a child element
    Element {
        /// Element name
        name: WireName,
    },
    /// Child element wrapped as a nested object
    Child {
        /// Element name
        name: WireName,
        /// Wrapper type of the child
        target: TypeTarget,
    },
    /// Repeated child elements
    Sequence {
        /// Wrapping container element, if any
        container: Option<WireName>,
        /// Item element name
        item: WireName,
        /// Collection shape
        shape: SequenceShape,
        /// Wrapper type of each item
        target: TypeTarget,
        /// Key field of keyed shapes
        key_field: Option<String>,
    },
}

impl Binding {
    /// Short binding label for diagnostics
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attribute { .. } => "attribute",
            Self::Element { .. } => "element",
            Self::Child { .. } => "child",
            Self::Sequence { .. } => "sequence",
        }
    }
}

/// Text conversion used by a scalar accessor
#[derive(Debug, Clone)]
pub enum Conversion {
    /// Built-in conversion for a scalar type
    Builtin(ScalarType),
    /// Field-specific converter
    Custom(Arc<dyn FieldConverter>),
}

impl Conversion {
    /// Scalar type produced on read
    #[must_use]
    pub fn value_type(&self) -> ScalarType {
        match self {
            Self::Builtin(ty) => *ty,
            Self::Custom(conv) => conv.value_type(),
        }
    }

    /// Wire text to value
    ///
    /// # Errors
    /// Returns an error when the text does not parse
    pub fn decode(&self, raw: &str) -> Result<Value, ConvertError> {
        match self {
            Self::Builtin(ty) => ty.parse(raw),
            Self::Custom(conv) => conv.from_wire(raw),
        }
    }

    /// Value to wire text
    ///
    /// # Errors
    /// Returns an error when the value has an incompatible type
    pub fn encode(&self, value: &Value) -> Result<String, ConvertError> {
        match self {
            Self::Builtin(ty) => Ok(ty.coerce(value.clone())?.to_wire()),
            Self::Custom(conv) => conv.to_wire(value),
        }
    }

    /// Coerce a written value to the accessor's type
    ///
    /// # Errors
    /// Returns an error when the value has an incompatible type
    pub fn prepare(&self, value: Value) -> Result<Value, ConvertError> {
        self.value_type().coerce(value)
    }

    /// Conversion for a scalar field plus its typed default
    ///
    /// # Errors
    /// Fails when the field combines a converter with a default, when the
    /// converter produces another type than the field declares, or when the
    /// default does not fit the field type
    pub fn for_field(
        field: &SchemaField,
        value_type: ScalarType,
    ) -> Result<(Self, Option<Value>), StrategyError> {
        match (&field.converter, &field.default) {
            (Some(_), Some(_)) => Err(StrategyError::ConverterWithDefault {
                field: field.name.clone(),
            }),
            (Some(conv), None) => {
                if conv.value_type() != value_type {
                    return Err(StrategyError::ConverterTypeMismatch {
                        field: field.name.clone(),
                        expected: value_type,
                        actual: conv.value_type(),
                    });
                }
                Ok((Self::Custom(Arc::clone(conv)), None))
            }
            (None, default) => {
                let default = default
                    .clone()
                    .map(|d| value_type.coerce(d))
                    .transpose()
                    .map_err(|source| StrategyError::DefaultTypeMismatch {
                        field: field.name.clone(),
                        source,
                    })?;
                Ok((Self::Builtin(value_type), default))
            }
        }
    }
}

impl Serialize for Conversion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Conversion", 2)?;
        state.serialize_field("value_type", &self.value_type())?;
        let converter = match self {
            Self::Builtin(_) => "builtin",
            Self::Custom(conv) => conv.name(),
        };
        state.serialize_field("converter", converter)?;
        state.end()
    }
}

/// Cache behavior of an accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Always read through
    Uncached,
    /// Single optional slot
    Slot,
    /// Collection updated in place by add/remove
    UpdateInPlace,
    /// Snapshot dropped on add
    InvalidateOnAdd,
}

/// Check performed before the getter reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// Create the backing element (or container) when missing
    EnsureElement,
    /// Write the default into the attribute when missing
    EnsureAttribute,
}

/// Accessor plan under construction
#[derive(Debug, Clone)]
pub struct AccessorDraft {
    /// Field name
    pub field: String,
    /// Field position in the schema type
    pub index: usize,
    /// Binding set by the base strategy
    pub binding: Option<Binding>,
    /// Scalar conversion
    pub conversion: Option<Conversion>,
    /// Typed default
    pub default: Option<Value>,
    /// Getter emitted
    pub getter: bool,
    /// Setter emitted
    pub setter: bool,
    /// Cache behavior
    pub cache: CachePolicy,
    /// Pre-read guards
    pub guards: Vec<Guard>,
    /// Applied strategy names, in order
    pub strategies: Vec<&'static str>,
}

impl AccessorDraft {
    /// Empty draft for a field
    #[must_use]
    pub fn new(field: &str, index: usize) -> Self {
        Self {
            field: field.to_string(),
            index,
            binding: None,
            conversion: None,
            default: None,
            getter: false,
            setter: false,
            cache: CachePolicy::Uncached,
            guards: Vec::new(),
            strategies: Vec::new(),
        }
    }

    /// Set the binding, rejecting a second one
    ///
    /// # Errors
    /// Returns [`StrategyError::ConflictingBaseStrategies`] if already bound
    pub fn bind(&mut self, strategy: &'static str, binding: Binding) -> Result<(), StrategyError> {
        if self.binding.is_some() {
            let mut strategies = self.strategies.clone();
            strategies.push(strategy);
            return Err(StrategyError::ConflictingBaseStrategies {
                field: self.field.clone(),
                strategies,
            });
        }
        self.binding = Some(binding);
        Ok(())
    }

    /// Finish the plan
    ///
    /// # Errors
    /// Returns [`StrategyError::NoBaseStrategy`] if no binding was set
    pub fn finish(self) -> Result<AccessorSpec, StrategyError> {
        let Some(binding) = self.binding else {
            return Err(StrategyError::NoBaseStrategy { field: self.field });
        };
        Ok(AccessorSpec {
            field: self.field,
            index: self.index,
            binding,
            conversion: self.conversion,
            default: self.default,
            getter: self.getter,
            setter: self.setter,
            cache: self.cache,
            guards: self.guards,
            strategies: self.strategies,
        })
    }
}

/// Finished accessor plan for one field
#[derive(Debug, Clone, Serialize)]
pub struct AccessorSpec {
    /// Field name
    pub field: String,
    /// Field position; also the cache slot index
    pub index: usize,
    /// DOM binding
    pub binding: Binding,
    /// Scalar conversion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<Conversion>,
    /// Typed default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Getter emitted
    pub getter: bool,
    /// Setter emitted
    pub setter: bool,
    /// Cache behavior
    pub cache: CachePolicy,
    /// Pre-read guards
    pub guards: Vec<Guard>,
    /// Applied strategy names, in order
    pub strategies: Vec<&'static str>,
}

/// Mapping of one helper parameter onto a property of the created child
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamBinding {
    /// Declared parameter name
    pub param: String,
    /// Matched property on the child type
    pub property: String,
    /// Declared parameter type
    pub ty: ScalarType,
    /// Whether the property is the dictionary key
    pub key: bool,
}

/// Plan for one helper method
#[derive(Debug, Clone, Serialize)]
pub struct HelperSpec {
    /// Method name
    pub method: String,
    /// Helper kind
    pub kind: HelperKind,
    /// Target field
    pub field: String,
    /// Target field position
    pub field_index: usize,
    /// Parameter mappings in call order
    pub params: Vec<ParamBinding>,
    /// Generated name of the returned wrapper type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeName>,
    /// Strategy that produced the plan
    pub strategy: &'static str,
}

//! Introspected schema model

use crate::convert::FieldConverter;
use crate::describe::{DeclaredType, ParamDescription, TypeKey, TypeRef};
use crate::value::{ScalarType, Value};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How a field maps onto XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BindingKind {
    /// Attribute on the element
    Attribute,
    /// Text content of a child element
    PrimitiveElement,
    /// Child element wrapped as a nested object
    ComplexElement,
    /// Repeated child elements as a snapshot array
    SequenceArray,
    /// Repeated child elements as a list
    SequenceList,
    /// Repeated child elements keyed by a field
    SequenceDict,
    /// Repeated child elements grouped by a field
    SequenceDictOfLists,
}

impl BindingKind {
    /// Whether the binding is one of the sequence kinds
    #[inline]
    #[must_use]
    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            Self::SequenceArray | Self::SequenceList | Self::SequenceDict | Self::SequenceDictOfLists
        )
    }

    /// Whether the materialized collection can be updated in place on add
    #[inline]
    #[must_use]
    pub fn supports_incremental_update(self) -> bool {
        matches!(
            self,
            Self::SequenceList | Self::SequenceDict | Self::SequenceDictOfLists
        )
    }

    /// Whether the binding needs a dictionary key
    #[inline]
    #[must_use]
    pub fn is_keyed(self) -> bool {
        matches!(self, Self::SequenceDict | Self::SequenceDictOfLists)
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attribute => "attribute",
            Self::PrimitiveElement => "primitive element",
            Self::ComplexElement => "complex element",
            Self::SequenceArray => "array sequence",
            Self::SequenceList => "list sequence",
            Self::SequenceDict => "dictionary sequence",
            Self::SequenceDictOfLists => "dictionary-of-lists sequence",
        };
        f.write_str(name)
    }
}

/// Element or attribute name on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WireName {
    /// Local name
    pub local: String,
    /// Namespace, `None` when unqualified
    pub namespace: Option<String>,
}

impl WireName {
    /// Create wire name
    #[inline]
    #[must_use]
    pub fn new(local: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            local: local.into(),
            namespace,
        }
    }

    /// Namespace as a borrowed option
    #[inline]
    #[must_use]
    pub fn ns(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for WireName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Introspected field
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Field name
    pub name: String,
    /// Declared value type
    pub declared: DeclaredType,
    /// Resolved binding kind
    pub binding: BindingKind,
    /// Attribute name, element name, or item name for sequences
    pub wire: WireName,
    /// Container element for wrapped sequences
    pub container: Option<WireName>,
    /// Declared default
    pub default: Option<Value>,
    /// Custom converter
    pub converter: Option<Arc<dyn FieldConverter>>,
    /// Key field of dictionary entries
    pub key_field: Option<String>,
    /// Ensure the backing node exists on first read
    pub auto_init: bool,
    /// Field has a getter
    pub readable: bool,
    /// Field has a setter
    pub writable: bool,
    /// Schema type that declared the field
    pub owner: TypeRef,
}

impl SchemaField {
    /// Scalar type of a scalar field
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> Option<ScalarType> {
        self.declared.scalar()
    }

    /// Nested schema type of an object or sequence field
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<TypeRef> {
        self.declared.target()
    }
}

/// Helper method kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HelperKind {
    /// Ensure the backing element exists
    Init,
    /// Remove the backing node
    Clear,
    /// Append a new sequence item
    Add,
}

impl HelperKind {
    /// Method name prefix used by naming convention
    #[inline]
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Clear => "Clear",
            Self::Add => "Add",
        }
    }

    /// All kinds, longest prefix first
    #[must_use]
    pub fn by_prefix_length() -> [Self; 3] {
        [Self::Clear, Self::Init, Self::Add]
    }
}

impl fmt::Display for HelperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Introspected helper method
#[derive(Debug, Clone)]
pub struct SchemaMethod {
    /// Method name
    pub name: String,
    /// Helper kind
    pub kind: HelperKind,
    /// Target field name
    pub target: String,
    /// Parameters in call order
    pub params: Vec<ParamDescription>,
    /// Returned schema type
    pub returns: Option<TypeRef>,
    /// Whether the binding was declared rather than inferred
    pub explicit: bool,
}

/// Introspected schema type; immutable once built
#[derive(Debug, Clone)]
pub struct SchemaType {
    /// Type handle
    pub type_ref: TypeRef,
    /// Short name
    pub name: String,
    /// Qualified name
    pub qualified_name: String,
    /// Own fields followed by inherited ones
    pub fields: Vec<SchemaField>,
    /// Own methods followed by inherited ones
    pub methods: Vec<SchemaMethod>,
}

impl SchemaType {
    /// Identity key
    #[inline]
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.type_ref.key()
    }

    /// Field by exact name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field position by exact name
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field by case-insensitive name
    #[must_use]
    pub fn field_ignore_case(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Method by exact name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&SchemaMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_update_only_for_collections() {
        assert!(!BindingKind::SequenceArray.supports_incremental_update());
        assert!(BindingKind::SequenceList.supports_incremental_update());
        assert!(BindingKind::SequenceDict.supports_incremental_update());
        assert!(!BindingKind::ComplexElement.supports_incremental_update());
    }

    #[test]
    fn prefixes_longest_first() {
        let lens: Vec<usize> = HelperKind::by_prefix_length()
            .iter()
            .map(|k| k.prefix().len())
            .collect();
        assert_eq!(lens, vec![5, 4, 3]);
    }

    #[test]
    fn wire_name_display() {
        assert_eq!(WireName::new("Head", None).to_string(), "Head");
        assert_eq!(
            WireName::new("Head", Some("urn:apml".into())).to_string(),
            "{urn:apml}Head"
        );
    }
}

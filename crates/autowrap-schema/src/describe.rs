//! Declarative schema description surface
//!
//! A schema type is any `'static` type implementing [`Schema`]. Its
//! description lists typed fields tagged with a closed vocabulary of binding
//! tags, helper methods, and base types it extends.

use crate::convert::FieldConverter;
use crate::model::HelperKind;
use crate::value::{ScalarType, Value};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type that describes one XML element's shape
pub trait Schema: 'static {
    /// Describe fields, methods and base types
    fn describe() -> TypeDescription;
}

/// Stable identity of a schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey(TypeId);

/// Handle to a schema type, usable without its static type
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    describe: fn() -> TypeDescription,
}

impl TypeRef {
    /// Handle for `T`
    #[inline]
    #[must_use]
    pub fn of<T: Schema>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            describe: T::describe,
        }
    }

    /// Identity key
    #[inline]
    #[must_use]
    pub fn key(&self) -> TypeKey {
        TypeKey(self.id)
    }

    /// Fully qualified Rust path of the type
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the qualified name
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Run the type's description
    #[inline]
    #[must_use]
    pub fn describe(&self) -> TypeDescription {
        (self.describe)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

/// Declared value type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// Scalar value
    Scalar(ScalarType),
    /// Nested schema object
    Schema(TypeRef),
    /// Fixed snapshot of nested objects
    Array(TypeRef),
    /// Growable list of nested objects
    List(TypeRef),
    /// Nested objects keyed by one of their fields
    Dict(TypeRef),
    /// Nested objects grouped by one of their fields
    DictOfLists(TypeRef),
}

impl DeclaredType {
    /// Scalar type, if this is a scalar
    #[inline]
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// Nested schema type, for object and sequence types
    #[must_use]
    pub fn target(&self) -> Option<TypeRef> {
        match self {
            Self::Scalar(_) => None,
            Self::Schema(t) | Self::Array(t) | Self::List(t) | Self::Dict(t) | Self::DictOfLists(t) => {
                Some(*t)
            }
        }
    }

    /// Whether this is one of the sequence types
    #[inline]
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            Self::Array(_) | Self::List(_) | Self::Dict(_) | Self::DictOfLists(_)
        )
    }
}

/// Binding and metadata tags attached to a field
#[derive(Debug, Clone)]
pub enum FieldTag {
    /// Bind to an attribute, optionally renamed
    Attribute {
        /// Alternate wire name
        name: Option<String>,
    },
    /// Bind to a child element
    Element {
        /// Alternate wire name
        name: Option<String>,
        /// Element namespace
        namespace: Option<String>,
    },
    /// Wrap sequence items in a named container element
    Container {
        /// Container element name
        name: String,
        /// Container namespace
        namespace: Option<String>,
    },
    /// Item element name inside a container
    Item {
        /// Alternate item name
        name: Option<String>,
        /// Item namespace
        namespace: Option<String>,
    },
    /// Value returned when nothing is stored
    Default(Value),
    /// Custom text conversion
    Converter(Arc<dyn FieldConverter>),
    /// Key field of dictionary entries
    Key(String),
    /// Ensure the backing node exists on first read
    AutoInit,
}

/// Declared field of a schema type
#[derive(Debug, Clone)]
pub struct FieldDescription {
    /// Field name
    pub name: String,
    /// Declared value type
    pub declared: DeclaredType,
    /// Binding and metadata tags
    pub tags: Vec<FieldTag>,
    /// Field has a getter
    pub readable: bool,
    /// Field has a setter
    pub writable: bool,
}

impl FieldDescription {
    /// Create field; scalars are read-write, everything else read-only
    #[must_use]
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        let writable = matches!(declared, DeclaredType::Scalar(_));
        Self {
            name: name.into(),
            declared,
            tags: Vec::new(),
            readable: true,
            writable,
        }
    }

    /// Scalar field
    #[inline]
    #[must_use]
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(name, DeclaredType::Scalar(ty))
    }

    /// String field
    #[inline]
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::String)
    }

    /// Integer field
    #[inline]
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::Integer)
    }

    /// Float field
    #[inline]
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::Float)
    }

    /// Boolean field
    #[inline]
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::Boolean)
    }

    /// Nested object field
    #[inline]
    #[must_use]
    pub fn schema<T: Schema>(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Schema(TypeRef::of::<T>()))
    }

    /// Array sequence field
    #[inline]
    #[must_use]
    pub fn array<T: Schema>(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Array(TypeRef::of::<T>()))
    }

    /// List sequence field
    #[inline]
    #[must_use]
    pub fn list<T: Schema>(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::List(TypeRef::of::<T>()))
    }

    /// Dictionary sequence field
    #[inline]
    #[must_use]
    pub fn dict<T: Schema>(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Dict(TypeRef::of::<T>()))
    }

    /// Dictionary-of-lists sequence field
    #[inline]
    #[must_use]
    pub fn dict_of_lists<T: Schema>(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::DictOfLists(TypeRef::of::<T>()))
    }

    /// Add a tag
    #[inline]
    #[must_use]
    pub fn tag(mut self, tag: FieldTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Bind to an attribute named after the field
    #[must_use]
    pub fn attribute(self) -> Self {
        self.tag(FieldTag::Attribute { name: None })
    }

    /// Bind to an attribute with another name
    #[must_use]
    pub fn attribute_named(self, name: &str) -> Self {
        self.tag(FieldTag::Attribute {
            name: Some(name.to_string()),
        })
    }

    /// Bind to an unqualified element named after the field
    #[must_use]
    pub fn element(self) -> Self {
        self.tag(FieldTag::Element {
            name: None,
            namespace: None,
        })
    }

    /// Bind to an unqualified element with another name
    #[must_use]
    pub fn element_named(self, name: &str) -> Self {
        self.tag(FieldTag::Element {
            name: Some(name.to_string()),
            namespace: None,
        })
    }

    /// Bind to an element in a namespace
    #[must_use]
    pub fn element_ns(self, namespace: &str) -> Self {
        self.tag(FieldTag::Element {
            name: None,
            namespace: Some(namespace.to_string()),
        })
    }

    /// Bind to a renamed element in a namespace
    #[must_use]
    pub fn element_named_ns(self, name: &str, namespace: &str) -> Self {
        self.tag(FieldTag::Element {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
        })
    }

    /// Wrap sequence items in a container element
    #[must_use]
    pub fn container(self, name: &str) -> Self {
        self.tag(FieldTag::Container {
            name: name.to_string(),
            namespace: None,
        })
    }

    /// Wrap sequence items in a namespaced container element
    #[must_use]
    pub fn container_ns(self, name: &str, namespace: &str) -> Self {
        self.tag(FieldTag::Container {
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        })
    }

    /// Name the item elements inside a container
    #[must_use]
    pub fn item_named(self, name: &str) -> Self {
        self.tag(FieldTag::Item {
            name: Some(name.to_string()),
            namespace: None,
        })
    }

    /// Declared default
    #[must_use]
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.tag(FieldTag::Default(value.into()))
    }

    /// Custom converter
    #[must_use]
    pub fn converter(self, converter: impl FieldConverter + 'static) -> Self {
        self.tag(FieldTag::Converter(Arc::new(converter)))
    }

    /// Dictionary key field of the entry type
    #[must_use]
    pub fn key(self, field: &str) -> Self {
        self.tag(FieldTag::Key(field.to_string()))
    }

    /// Ensure the backing node exists on first read
    #[must_use]
    pub fn auto_init(self) -> Self {
        self.tag(FieldTag::AutoInit)
    }

    /// Declare a setter
    #[must_use]
    pub fn settable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Drop the setter
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Drop the getter
    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self.writable = true;
        self
    }
}

/// Declared method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescription {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: ScalarType,
}

/// Declared helper method
#[derive(Debug, Clone)]
pub struct MethodDescription {
    /// Method name
    pub name: String,
    /// Parameters in call order
    pub params: Vec<ParamDescription>,
    /// Returned schema type, if any
    pub returns: Option<TypeRef>,
    /// Explicit helper binding, bypassing name inference
    pub helper: Option<(HelperKind, String)>,
}

impl MethodDescription {
    /// Create method with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            helper: None,
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, name: &str, ty: ScalarType) -> Self {
        self.params.push(ParamDescription {
            name: name.to_string(),
            ty,
        });
        self
    }

    /// Declare the returned schema type
    #[must_use]
    pub fn returns<T: Schema>(mut self) -> Self {
        self.returns = Some(TypeRef::of::<T>());
        self
    }

    /// Bind explicitly to a helper kind and field
    #[must_use]
    pub fn helper_for(mut self, kind: HelperKind, field: &str) -> Self {
        self.helper = Some((kind, field.to_string()));
        self
    }
}

/// Full description of a schema type
#[derive(Debug, Clone, Default)]
pub struct TypeDescription {
    /// Extended base types
    pub bases: Vec<TypeRef>,
    /// Own fields
    pub fields: Vec<FieldDescription>,
    /// Own methods
    pub methods: Vec<MethodDescription>,
}

impl TypeDescription {
    /// Create empty description
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend a base schema type
    #[must_use]
    pub fn extends<T: Schema>(mut self) -> Self {
        self.bases.push(TypeRef::of::<T>());
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDescription) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, method: MethodDescription) -> Self {
        self.methods.push(method);
        self
    }
}

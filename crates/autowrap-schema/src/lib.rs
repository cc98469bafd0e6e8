//! AutoWrapper Schema
//!
//! Describes the shape of XML elements as schema types and introspects those
//! descriptions into binding metadata.
//!
//! # Core Concepts
//!
//! - [`Schema`]: Implemented by every schema type, returns a [`TypeDescription`]
//! - [`FieldTag`]: Closed vocabulary of binding and metadata tags
//! - [`Introspector`]: Resolves fields to exactly one [`BindingKind`] and
//!   methods to one [`HelperKind`] plus target field
//! - [`Value`] / [`ScalarType`]: Scalar values and built-in text conversion
//! - [`FieldConverter`]: Pluggable per-field `string <-> value` conversion
//!
//! # Example
//!
//! ```rust
//! use autowrap_schema::{
//!     BindingKind, FieldDescription, Introspector, Schema, TypeDescription, TypeRef,
//! };
//!
//! struct SingleProperty;
//!
//! impl Schema for SingleProperty {
//!     fn describe() -> TypeDescription {
//!         TypeDescription::new().field(FieldDescription::string("Key").attribute())
//!     }
//! }
//!
//! let schema = Introspector::new()
//!     .introspect(&TypeRef::of::<SingleProperty>())
//!     .unwrap();
//! assert_eq!(schema.fields[0].binding, BindingKind::Attribute);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod convert;
mod describe;
mod error;
mod introspect;
mod model;
mod value;

// Re-exports
pub use convert::{FieldConverter, FixedPrecisionConverter};
pub use describe::{
    DeclaredType, FieldDescription, FieldTag, MethodDescription, ParamDescription, Schema,
    TypeDescription, TypeKey, TypeRef,
};
pub use error::{ConvertError, SchemaError, SchemaResult};
pub use introspect::{IntrospectOptions, Introspector};
pub use model::{BindingKind, HelperKind, SchemaField, SchemaMethod, SchemaType, WireName};
pub use value::{FromValue, ScalarType, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! AutoWrapper Core
//!
//! Synthesizes typed, cached wrappers over DOM elements from schema types.
//!
//! # Core Concepts
//!
//! - [`WrapperGenerator`]: Introspects a schema type, runs the binding
//!   strategies for it and every nested type it reaches, and caches the
//!   resulting [`GeneratedType`]s. A run commits all of its types or none.
//! - [`GenerationContext`]: Per-run name registry and dependency queue; a
//!   type is generated once however often it is referenced
//! - [`Wrapper`]: One generated type bound to one node, with lazy per-field
//!   cache slots, `Init`/`Clear`/`Add`/`Walk` helpers and [`Wrapper::as_type`]
//! - [`SharedDocument`]: The tree plus its session lock; every read runs in a
//!   read session and every mutation in a write session
//! - [`NodeAccess`]: The DOM primitives every wrapper is built on
//!
//! # Example
//!
//! ```rust
//! use autowrap_core::{SharedDocument, WrapperGenerator};
//! use autowrap_schema::{FieldDescription, Schema, TypeDescription, Value};
//!
//! struct SingleProperty;
//!
//! impl Schema for SingleProperty {
//!     fn describe() -> TypeDescription {
//!         TypeDescription::new().field(FieldDescription::string("Key").attribute())
//!     }
//! }
//!
//! let doc = SharedDocument::new("Single", None);
//! let generator = WrapperGenerator::new();
//! let single = generator.wrap_root::<SingleProperty>(&doc).unwrap();
//!
//! single.set("Key", "Hello").unwrap();
//! assert_eq!(single.get("Key").unwrap(), Some(Value::from("Hello")));
//! assert_eq!(doc.to_xml(), r#"<Single Key="Hello"/>"#);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cache;
mod config;
mod context;
mod document;
mod error;
mod generator;
mod runtime;
mod sequence;
mod synthesizer;
mod wrapper;

// Re-exports
pub use config::GeneratorConfig;
pub use context::GenerationContext;
pub use document::SharedDocument;
pub use error::{WrapperError, WrapperResult};
pub use generator::WrapperGenerator;
pub use runtime::NodeAccess;
pub use sequence::{SequenceValue, SharedDict, SharedGroups, SharedList};
pub use synthesizer::{synthesize, GeneratedType};
pub use wrapper::Wrapper;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with generated wrappers
    pub use crate::{
        GeneratorConfig, SharedDocument, Wrapper, WrapperError, WrapperGenerator, WrapperResult,
    };
    pub use autowrap_schema::{FieldDescription, MethodDescription, Schema, TypeDescription, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! AutoWrapper Strategies
//!
//! Binding strategies turn introspected schema fields and methods into
//! accessor and helper plans. Dispatch is table-driven through
//! [`StrategyRegistry`].
//!
//! # Core Concepts
//!
//! - [`FieldStrategy`]: Contributes to one field's [`AccessorSpec`]
//! - [`StrategyPriority`]: `BaseCode` establishes the binding, `CachingCode`
//!   and `GuardCode` layer on top; exactly one base strategy per field
//! - [`MethodStrategy`]: Plans one `Init`/`Clear`/`Add` helper as a [`HelperSpec`]
//! - [`GenerationScope`]: Generator callback for registering nested types
//!
//! # Built-in Strategies
//!
//! | Strategy | Priority | Fields |
//! |----------|----------|--------|
//! | [`AttributeStrategy`] | base | scalar attributes |
//! | [`PrimitiveElementStrategy`] | base | scalar child elements |
//! | [`ComplexElementStrategy`] | base | nested object elements |
//! | [`SequenceStrategy`] | base | arrays, lists, dictionaries |
//! | [`CachingStrategy`] | caching | every readable field |
//! | [`AutoInitStrategy`] | guard | fields tagged auto-init |

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod attribute;
mod auto_init;
mod caching;
mod element;
mod error;
mod method;
mod plan;
mod registry;
mod sequence;
mod strategy;

#[cfg(test)]
mod testing;

// Re-exports
pub use attribute::AttributeStrategy;
pub use auto_init::AutoInitStrategy;
pub use caching::CachingStrategy;
pub use element::{ComplexElementStrategy, PrimitiveElementStrategy};
pub use error::StrategyError;
pub use method::{AddMethodStrategy, ClearMethodStrategy, InitMethodStrategy};
pub use plan::{
    AccessorDraft, AccessorSpec, Binding, CachePolicy, Conversion, Guard, HelperSpec,
    ParamBinding, SequenceShape, TypeName, TypeTarget,
};
pub use registry::{Selection, StrategyRegistry};
pub use sequence::SequenceStrategy;
pub use strategy::{FieldStrategy, GenerationScope, MethodStrategy, StrategyPriority};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

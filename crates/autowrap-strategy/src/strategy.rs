//! Strategy traits
//!
//! A [`FieldStrategy`] contributes to the accessor plan of a field; a
//! [`MethodStrategy`] plans one helper method. Strategies talk back to the
//! generator through [`GenerationScope`] to register nested types.

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, AccessorSpec, HelperSpec, TypeName};
use autowrap_schema::{HelperKind, SchemaError, SchemaField, SchemaMethod, SchemaType, TypeRef};
use serde::Serialize;
use std::sync::Arc;

/// Order in which field strategies run; lower runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StrategyPriority {
    /// Establishes the binding; exactly one per field
    BaseCode,
    /// Layers caching on the base accessor
    CachingCode,
    /// Layers pre-read checks
    GuardCode,
}

/// Generator services available to strategies
pub trait GenerationScope {
    /// Stable generated name for a nested type, queuing it on first use
    fn require_type(&mut self, ty: &TypeRef) -> TypeName;

    /// Introspected schema of a nested type
    ///
    /// # Errors
    /// Returns the introspection error of that type
    fn schema_of(&mut self, ty: &TypeRef) -> Result<Arc<SchemaType>, SchemaError>;
}

/// Contributes to a field's accessor plan
pub trait FieldStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name (for debugging/serialization)
    fn name(&self) -> &'static str;

    /// Execution priority
    fn priority(&self) -> StrategyPriority;

    /// Whether the strategy handles this field
    fn applies_to(&self, field: &SchemaField) -> bool;

    /// Contribute to the accessor plan
    ///
    /// # Errors
    /// Returns a configuration error when the field cannot be served
    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError>;
}

/// Plans one kind of helper method
pub trait MethodStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name (for debugging/serialization)
    fn name(&self) -> &'static str;

    /// Helper kind handled
    fn kind(&self) -> HelperKind;

    /// Plan the helper
    ///
    /// # Errors
    /// Returns a configuration error when the helper does not fit the field
    fn apply(
        &self,
        method: &SchemaMethod,
        field: &SchemaField,
        accessor: &AccessorSpec,
        scope: &mut dyn GenerationScope,
    ) -> Result<HelperSpec, StrategyError>;
}

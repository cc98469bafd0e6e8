//! Caching layer

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, CachePolicy};
use crate::strategy::{FieldStrategy, GenerationScope, StrategyPriority};
use autowrap_schema::{BindingKind, SchemaField};

/// Adds a lazy cache slot to every readable accessor
///
/// Snapshot arrays are dropped on add; lists and dictionaries are updated
/// in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachingStrategy;

impl FieldStrategy for CachingStrategy {
    fn name(&self) -> &'static str {
        "caching"
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::CachingCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.readable
    }

    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        _scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError> {
        accessor.cache = match field.binding {
            BindingKind::SequenceArray => CachePolicy::InvalidateOnAdd,
            kind if kind.supports_incremental_update() => CachePolicy::UpdateInPlace,
            _ => CachePolicy::Slot,
        };
        Ok(())
    }
}

//! Auto-init guard

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, Guard};
use crate::strategy::{FieldStrategy, GenerationScope, StrategyPriority};
use autowrap_schema::{BindingKind, SchemaField};

/// Makes the getter create the backing node before reading it
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoInitStrategy;

impl FieldStrategy for AutoInitStrategy {
    fn name(&self) -> &'static str {
        "auto_init"
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::GuardCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.auto_init
    }

    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        _scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError> {
        let not_applicable = |reason| StrategyError::AutoInitNotApplicable {
            field: field.name.clone(),
            reason,
        };
        let guard = match field.binding {
            BindingKind::Attribute if accessor.default.is_some() => Guard::EnsureAttribute,
            BindingKind::Attribute => return Err(not_applicable("attribute has no default")),
            BindingKind::PrimitiveElement | BindingKind::ComplexElement => Guard::EnsureElement,
            _ if field.container.is_some() => Guard::EnsureElement,
            _ => return Err(not_applicable("sequence has no container element")),
        };
        if !accessor.getter {
            return Err(not_applicable("field has no getter"));
        }
        accessor.guards.push(guard);
        Ok(())
    }
}

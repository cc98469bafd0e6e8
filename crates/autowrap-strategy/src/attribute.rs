//! Attribute binding strategy

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, Binding, Conversion};
use crate::strategy::{FieldStrategy, GenerationScope, StrategyPriority};
use autowrap_schema::{BindingKind, SchemaField};

/// Binds a scalar field to an attribute of the wrapped element
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeStrategy;

impl FieldStrategy for AttributeStrategy {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::BaseCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.binding == BindingKind::Attribute
    }

    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        _scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError> {
        let value_type = field.value_type().ok_or_else(|| StrategyError::NoBaseStrategy {
            field: field.name.clone(),
        })?;
        let (conversion, default) = Conversion::for_field(field, value_type)?;

        accessor.bind(
            self.name(),
            Binding::Attribute {
                name: field.wire.local.clone(),
            },
        )?;
        accessor.conversion = Some(conversion);
        accessor.default = default;
        accessor.getter = field.readable;
        accessor.setter = field.writable;
        Ok(())
    }
}

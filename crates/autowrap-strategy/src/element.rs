//! Element binding strategies

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, Binding, Conversion, TypeTarget};
use crate::strategy::{FieldStrategy, GenerationScope, StrategyPriority};
use autowrap_schema::{BindingKind, SchemaField};

/// Binds a scalar field to the text of a child element
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveElementStrategy;

impl FieldStrategy for PrimitiveElementStrategy {
    fn name(&self) -> &'static str {
        "primitive_element"
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::BaseCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.binding == BindingKind::PrimitiveElement
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
            Binding::Element {
                name: field.wire.clone(),
            },
        )?;
        accessor.conversion = Some(conversion);
        accessor.default = default;
        accessor.getter = field.readable;
        accessor.setter = field.writable;
        Ok(())
    }
}

/// Binds a nested schema field to a wrapped child element
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexElementStrategy;

impl FieldStrategy for ComplexElementStrategy {
    fn name(&self) -> &'static str {
        "complex_element"
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::BaseCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.binding == BindingKind::ComplexElement
    }

    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError> {
        if field.writable {
            return Err(StrategyError::SetterOnComplexElement {
                field: field.name.clone(),
            });
        }
        let type_ref = field.target().ok_or_else(|| StrategyError::NoBaseStrategy {
            field: field.name.clone(),
        })?;
        let target = TypeTarget {
            name: scope.require_type(&type_ref),
            type_ref,
        };

        accessor.bind(
            self.name(),
            Binding::Child {
                name: field.wire.clone(),
                target,
            },
        )?;
        accessor.getter = field.readable;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{field, holder, Entry, RecordingScope};
    use autowrap_schema::{TypeRef, Value};

    #[test]
    fn primitive_element_carries_default() {
        let schema = holder();
        let count = field(&schema, "Count");
        let mut draft = AccessorDraft::new("Count", 1);

        PrimitiveElementStrategy
            .apply(&count, &mut draft, &mut RecordingScope::default())
            .unwrap();
        assert_eq!(draft.default, Some(Value::Integer(12)));
        assert!(matches!(draft.binding, Some(Binding::Element { .. })));
    }

    #[test]
    fn complex_element_requires_nested_type() {
        let schema = holder();
        let single = field(&schema, "Single");
        let mut scope = RecordingScope::default();
        let mut draft = AccessorDraft::new("Single", 2);

        ComplexElementStrategy.apply(&single, &mut draft, &mut scope).unwrap();
        assert_eq!(scope.required, vec![TypeRef::of::<Entry>()]);
        assert!(!draft.setter);
    }

    #[test]
    fn complex_element_setter_rejected() {
        let schema = holder();
        let mut single = field(&schema, "Single");
        single.writable = true;
        let mut draft = AccessorDraft::new("Single", 2);

        let err = ComplexElementStrategy
            .apply(&single, &mut draft, &mut RecordingScope::default())
            .unwrap_err();
        assert!(matches!(err, StrategyError::SetterOnComplexElement { .. }));
    }
}

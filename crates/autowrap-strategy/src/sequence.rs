//! Sequence binding strategy
//!
//! One strategy type serves the four collection shapes; the registry holds
//! one instance per shape.

use crate::error::StrategyError;
use crate::plan::{AccessorDraft, Binding, SequenceShape, TypeTarget};
use crate::strategy::{FieldStrategy, GenerationScope, StrategyPriority};
use autowrap_schema::{BindingKind, SchemaField};

/// Binds a sequence field to repeated child elements
#[derive(Debug, Clone, Copy)]
pub struct SequenceStrategy {
    shape: SequenceShape,
}

impl SequenceStrategy {
    /// Strategy for one collection shape
    #[inline]
    #[must_use]
    pub fn new(shape: SequenceShape) -> Self {
        Self { shape }
    }

    /// Collection shape handled
    #[inline]
    #[must_use]
    pub fn shape(&self) -> SequenceShape {
        self.shape
    }

    fn binding_kind(&self) -> BindingKind {
        match self.shape {
            SequenceShape::Array => BindingKind::SequenceArray,
            SequenceShape::List => BindingKind::SequenceList,
            SequenceShape::Dict => BindingKind::SequenceDict,
            SequenceShape::DictOfLists => BindingKind::SequenceDictOfLists,
        }
    }
}

impl FieldStrategy for SequenceStrategy {
    fn name(&self) -> &'static str {
        match self.shape {
            SequenceShape::Array => "sequence_array",
            SequenceShape::List => "sequence_list",
            SequenceShape::Dict => "sequence_dict",
            SequenceShape::DictOfLists => "sequence_dict_of_lists",
        }
    }

    fn priority(&self) -> StrategyPriority {
        StrategyPriority::BaseCode
    }

    fn applies_to(&self, field: &SchemaField) -> bool {
        field.binding == self.binding_kind()
    }

    fn apply(
        &self,
        field: &SchemaField,
        accessor: &mut AccessorDraft,
        scope: &mut dyn GenerationScope,
    ) -> Result<(), StrategyError> {
        if field.writable {
            return Err(StrategyError::SetterOnSequence {
                field: field.name.clone(),
            });
        }
        let type_ref = field.target().ok_or_else(|| StrategyError::NoBaseStrategy {
            field: field.name.clone(),
        })?;

        let key_field = if self.shape.is_keyed() {
            let key = field.key_field.clone().unwrap_or_default();
            let entry = scope.schema_of(&type_ref)?;
            let usable = entry
                .field(&key)
                .is_some_and(|f| f.value_type().is_some() && f.readable);
            if !usable {
                return Err(StrategyError::UnknownKeyField {
                    field: field.name.clone(),
                    key,
                    target: entry.name.clone(),
                });
            }
            Some(key)
        } else {
            None
        };

        let target = TypeTarget {
            name: scope.require_type(&type_ref),
            type_ref,
        };
        accessor.bind(
            self.name(),
            Binding::Sequence {
                container: field.container.clone(),
                item: field.wire.clone(),
                shape: self.shape,
                target,
                key_field,
            },
        )?;
        accessor.getter = field.readable;
        Ok(())
    }
}

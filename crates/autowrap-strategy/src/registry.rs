//! Strategy registry and dispatch
//!
//! Provides [`StrategyRegistry`] for selecting and applying the strategies
//! that plan one field or one helper method.

use crate::auto_init::AutoInitStrategy;
use crate::attribute::AttributeStrategy;
use crate::caching::CachingStrategy;
use crate::element::{ComplexElementStrategy, PrimitiveElementStrategy};
use crate::error::StrategyError;
use crate::method::{AddMethodStrategy, ClearMethodStrategy, InitMethodStrategy};
use crate::plan::{AccessorDraft, AccessorSpec, HelperSpec, SequenceShape};
use crate::sequence::SequenceStrategy;
use crate::strategy::{FieldStrategy, GenerationScope, MethodStrategy, StrategyPriority};
use autowrap_schema::{HelperKind, SchemaField, SchemaMethod};
use smallvec::SmallVec;
use std::sync::Arc;

/// Strategies selected for one field, in execution order
pub type Selection = SmallVec<[Arc<dyn FieldStrategy>; 4]>;

/// Registry of field and method strategies
#[derive(Debug, Default, Clone)]
pub struct StrategyRegistry {
    fields: Vec<Arc<dyn FieldStrategy>>,
    methods: Vec<Arc<dyn MethodStrategy>>,
}

impl StrategyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with built-in strategies
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AttributeStrategy);
        registry.register(PrimitiveElementStrategy);
        registry.register(ComplexElementStrategy);
        for shape in [
            SequenceShape::Array,
            SequenceShape::List,
            SequenceShape::Dict,
            SequenceShape::DictOfLists,
        ] {
            registry.register(SequenceStrategy::new(shape));
        }
        registry.register(CachingStrategy);
        registry.register(AutoInitStrategy);
        registry.register_method(InitMethodStrategy);
        registry.register_method(ClearMethodStrategy);
        registry.register_method(AddMethodStrategy);
        registry
    }

    /// Register a field strategy
    pub fn register(&mut self, strategy: impl FieldStrategy + 'static) {
        self.fields.push(Arc::new(strategy));
    }

    /// Register a method strategy, replacing any for the same kind
    pub fn register_method(&mut self, strategy: impl MethodStrategy + 'static) {
        self.methods.retain(|s| s.kind() != strategy.kind());
        self.methods.push(Arc::new(strategy));
    }

    /// Check if a strategy with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|s| s.name() == name) || self.methods.iter().any(|s| s.name() == name)
    }

    /// Remove strategies with this name
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.len();
        self.fields.retain(|s| s.name() != name);
        self.methods.retain(|s| s.name() != name);
        self.len() != before
    }

    /// List all registered strategy names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .map(|s| s.name())
            .chain(self.methods.iter().map(|s| s.name()))
            .collect()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.methods.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.methods.is_empty()
    }

    /// Select the strategies applying to a field, ordered by priority
    ///
    /// # Errors
    /// Fails unless exactly one base strategy applies
    pub fn select(&self, field: &SchemaField) -> Result<Selection, StrategyError> {
        let mut selected: Selection = self
            .fields
            .iter()
            .filter(|s| s.applies_to(field))
            .cloned()
            .collect();
        selected.sort_by_key(|s| s.priority());

        let base: Vec<&'static str> = selected
            .iter()
            .filter(|s| s.priority() == StrategyPriority::BaseCode)
            .map(|s| s.name())
            .collect();
        match base.len() {
            1 => Ok(selected),
            0 => Err(StrategyError::NoBaseStrategy {
                field: field.name.clone(),
            }),
            _ => Err(StrategyError::ConflictingBaseStrategies {
                field: field.name.clone(),
                strategies: base,
            }),
        }
    }

    /// Plan the accessor of a field
    ///
    /// # Errors
    /// Returns the first configuration error raised by a strategy
    pub fn apply(
        &self,
        field: &SchemaField,
        index: usize,
        scope: &mut dyn GenerationScope,
    ) -> Result<AccessorSpec, StrategyError> {
        let mut draft = AccessorDraft::new(&field.name, index);
        for strategy in self.select(field)? {
            tracing::trace!("Applying {} to field {}", strategy.name(), field.name);
            strategy.apply(field, &mut draft, scope)?;
            draft.strategies.push(strategy.name());
        }
        draft.finish()
    }

    /// Strategy for a helper kind
    #[must_use]
    pub fn select_method(&self, kind: HelperKind) -> Option<&Arc<dyn MethodStrategy>> {
        self.methods.iter().find(|s| s.kind() == kind)
    }

    /// Plan a helper method against its target field's accessor
    ///
    /// # Errors
    /// Fails when no strategy handles the kind or the strategy rejects it
    pub fn apply_method(
        &self,
        method: &SchemaMethod,
        field: &SchemaField,
        accessor: &AccessorSpec,
        scope: &mut dyn GenerationScope,
    ) -> Result<HelperSpec, StrategyError> {
        let strategy = self
            .select_method(method.kind)
            .ok_or_else(|| StrategyError::NoMethodStrategy {
                method: method.name.clone(),
                kind: method.kind,
            })?;
        tracing::trace!("Applying {} to method {}", strategy.name(), method.name);
        strategy.apply(method, field, accessor, scope)
    }
}

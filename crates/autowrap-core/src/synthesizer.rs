//! Wrapper synthesis: one accessor per field, one helper per method

use crate::context::GenerationContext;
use crate::error::WrapperResult;
use autowrap_schema::{SchemaError, SchemaType, TypeRef};
use autowrap_strategy::{AccessorSpec, HelperSpec, StrategyRegistry, TypeName};
use serde::Serialize;
use std::sync::Arc;

/// Generated implementation of one schema type
///
/// Serializes to JSON as the inspectable form of the generated code.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedType {
    /// Unique implementation name
    pub name: TypeName,
    /// Qualified name of the schema type
    pub schema_name: String,
    /// Introspected schema
    #[serde(skip)]
    pub schema: Arc<SchemaType>,
    /// Accessor plans, indexed like the schema fields
    pub accessors: Vec<AccessorSpec>,
    /// Helper method plans
    pub helpers: Vec<HelperSpec>,
    /// Nested types this implementation refers to
    pub dependencies: Vec<TypeName>,
}

impl GeneratedType {
    /// Schema type handle
    #[inline]
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        self.schema.type_ref
    }

    /// Accessor of a field
    #[must_use]
    pub fn accessor(&self, field: &str) -> Option<&AccessorSpec> {
        self.accessors.iter().find(|a| a.field == field)
    }

    /// Helper plan of a method
    #[must_use]
    pub fn helper(&self, method: &str) -> Option<&HelperSpec> {
        self.helpers.iter().find(|h| h.method == method)
    }

    /// Field names in slot order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.iter().map(|a| a.field.as_str())
    }
}

/// Build the implementation of `schema`
///
/// Nested types are registered through `ctx` as the strategies run.
///
/// # Errors
/// Returns the first configuration error of any field or method
pub fn synthesize(
    ctx: &mut GenerationContext<'_>,
    name: TypeName,
    schema: &Arc<SchemaType>,
    registry: &StrategyRegistry,
) -> WrapperResult<GeneratedType> {
    let mut accessors = Vec::with_capacity(schema.fields.len());
    for (index, field) in schema.fields.iter().enumerate() {
        accessors.push(registry.apply(field, index, ctx)?);
    }

    let mut helpers = Vec::with_capacity(schema.methods.len());
    for method in &schema.methods {
        let index = schema
            .field_index(&method.target)
            .ok_or_else(|| SchemaError::unmatched_method(&schema.name, &method.name))?;
        let plan = registry.apply_method(method, &schema.fields[index], &accessors[index], ctx)?;
        helpers.push(plan);
    }

    tracing::debug!(
        "Synthesized {} as {} ({} accessors, {} helpers)",
        schema.qualified_name,
        name,
        accessors.len(),
        helpers.len()
    );

    Ok(GeneratedType {
        name,
        schema_name: schema.qualified_name.clone(),
        schema: Arc::clone(schema),
        accessors,
        helpers,
        dependencies: ctx.take_dependencies(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use autowrap_schema::{Introspector, TypeRef};
    use autowrap_strategy::{Binding, CachePolicy, GenerationScope, SequenceShape, StrategyError};
    use autowrap_test_utils::fixtures::{
        ListElementWithAddMethod, Profile, SingleProperty, WithConverterAndDefault,
        WithMistypedDefault, WithSettableComplexElement, WithSettableSequence,
    };
    use crate::error::WrapperError;
    use dashmap::DashMap;
    use pretty_assertions::assert_eq;

    fn run<T: autowrap_schema::Schema>() -> WrapperResult<GeneratedType> {
        let introspector = Introspector::new();
        let committed = DashMap::new();
        let mut ctx = GenerationContext::new(&introspector, &committed);
        let ty = TypeRef::of::<T>();
        ctx.require_type(&ty);
        let (ty, name) = ctx.drain().unwrap();
        let schema = introspector.introspect(&ty)?;
        synthesize(&mut ctx, name, &schema, &StrategyRegistry::with_defaults())
    }

    #[test]
    fn attribute_accessor() {
        let generated = run::<SingleProperty>().unwrap();
        let key = generated.accessor("Key").unwrap();
        assert!(matches!(&key.binding, Binding::Attribute { name } if name == "Key"));
        assert!(key.getter && key.setter);
        assert_eq!(key.cache, CachePolicy::Slot);
        assert!(generated.dependencies.is_empty());
    }

    #[test]
    fn list_with_add_helper() {
        let generated = run::<ListElementWithAddMethod>().unwrap();
        let single = generated.accessor("Single").unwrap();
        assert!(matches!(
            &single.binding,
            Binding::Sequence { shape: SequenceShape::List, container: None, .. }
        ));
        assert_eq!(single.cache, CachePolicy::UpdateInPlace);

        let add = generated.helper("AddSingle").unwrap();
        assert_eq!(add.params[0].property, "Key");
        assert_eq!(generated.dependencies.len(), 1);
        assert_eq!(
            generated.field_names().collect::<Vec<_>>(),
            vec!["Single"]
        );
    }

    #[test]
    fn recursive_type_depends_on_itself() {
        let generated = run::<Profile>().unwrap();
        assert!(generated.dependencies.contains(&generated.name));
    }

    #[test]
    fn settable_complex_element_rejected() {
        let err = run::<WithSettableComplexElement>().unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Strategy(StrategyError::SetterOnComplexElement { .. })
        ));
    }

    #[test]
    fn converter_with_default_rejected() {
        let err = run::<WithConverterAndDefault>().unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Strategy(StrategyError::ConverterWithDefault { .. })
        ));
    }

    #[test]
    fn settable_sequence_rejected() {
        let err = run::<WithSettableSequence>().unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Strategy(StrategyError::SetterOnSequence { ref field }) if field == "Child"
        ));
    }

    #[test]
    fn mistyped_default_rejected() {
        let err = run::<WithMistypedDefault>().unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            WrapperError::Strategy(StrategyError::DefaultTypeMismatch { ref field, .. }) if field == "Key"
        ));
    }

    #[test]
    fn plan_serializes() {
        let generated = run::<SingleProperty>().unwrap();
        let json = serde_json::to_value(&generated).unwrap();
        assert_eq!(json["accessors"][0]["binding"]["kind"], "attribute");
        assert_eq!(json["accessors"][0]["binding"]["name"], "Key");
        assert!(json.get("schema").is_none());
    }
}

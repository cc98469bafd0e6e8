//! Helper method strategies: `Init`, `Clear` and `Add`

use crate::error::StrategyError;
use crate::plan::{AccessorSpec, Binding, HelperSpec, ParamBinding, TypeName};
use crate::strategy::{GenerationScope, MethodStrategy};
use autowrap_schema::{HelperKind, SchemaField, SchemaMethod, SchemaType, TypeRef};

/// Map each parameter case-insensitively onto a settable scalar property
fn map_params(
    method: &SchemaMethod,
    target: &SchemaType,
    key_field: Option<&str>,
) -> Result<Vec<ParamBinding>, StrategyError> {
    method
        .params
        .iter()
        .map(|param| {
            let property = target
                .field_ignore_case(&param.name)
                .filter(|f| f.writable && f.value_type().is_some())
                .ok_or_else(|| StrategyError::unmatched_param(&method.name, &param.name))?;
            Ok(ParamBinding {
                param: param.name.clone(),
                property: property.name.clone(),
                ty: param.ty,
                key: key_field == Some(property.name.as_str()),
            })
        })
        .collect()
}

fn reject_params(method: &SchemaMethod) -> Result<(), StrategyError> {
    match method.params.first() {
        Some(param) => Err(StrategyError::unmatched_param(&method.name, &param.name)),
        None => Ok(()),
    }
}

fn returned(method: &SchemaMethod, scope: &mut dyn GenerationScope) -> Option<TypeName> {
    method.returns.as_ref().map(|ty: &TypeRef| scope.require_type(ty))
}

/// `Init<Field>`: ensure the backing element exists
///
/// For complex elements the parameters are copied onto the child; for
/// container-wrapped sequences the container is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitMethodStrategy;

impl MethodStrategy for InitMethodStrategy {
    fn name(&self) -> &'static str {
        "init_method"
    }

    fn kind(&self) -> HelperKind {
        HelperKind::Init
    }

    fn apply(
        &self,
        method: &SchemaMethod,
        field: &SchemaField,
        accessor: &AccessorSpec,
        scope: &mut dyn GenerationScope,
    ) -> Result<HelperSpec, StrategyError> {
        let params = match &accessor.binding {
            Binding::Child { target, .. } => {
                let schema = scope.schema_of(&target.type_ref)?;
                map_params(method, &schema, None)?
            }
            Binding::Element { .. }
            | Binding::Sequence {
                container: Some(_), ..
            } => {
                reject_params(method)?;
                Vec::new()
            }
            Binding::Attribute { .. } | Binding::Sequence { container: None, .. } => {
                return Err(StrategyError::not_applicable(
                    &method.name,
                    self.kind(),
                    field.binding,
                ))
            }
        };

        Ok(HelperSpec {
            method: method.name.clone(),
            kind: self.kind(),
            field: field.name.clone(),
            field_index: accessor.index,
            params,
            returns: returned(method, scope),
            strategy: self.name(),
        })
    }
}

/// `Clear<Field>`: remove the backing node(s)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearMethodStrategy;

impl MethodStrategy for ClearMethodStrategy {
    fn name(&self) -> &'static str {
        "clear_method"
    }

    fn kind(&self) -> HelperKind {
        HelperKind::Clear
    }

    fn apply(
        &self,
        method: &SchemaMethod,
        field: &SchemaField,
        accessor: &AccessorSpec,
        _scope: &mut dyn GenerationScope,
    ) -> Result<HelperSpec, StrategyError> {
        reject_params(method)?;
        Ok(HelperSpec {
            method: method.name.clone(),
            kind: self.kind(),
            field: field.name.clone(),
            field_index: accessor.index,
            params: Vec::new(),
            returns: None,
            strategy: self.name(),
        })
    }
}

/// `Add<Field>(params...)`: append a sequence item
#[derive(Debug, Clone, Copy, Default)]
pub struct AddMethodStrategy;

impl MethodStrategy for AddMethodStrategy {
    fn name(&self) -> &'static str {
        "add_method"
    }

    fn kind(&self) -> HelperKind {
        HelperKind::Add
    }

    fn apply(
        &self,
        method: &SchemaMethod,
        field: &SchemaField,
        accessor: &AccessorSpec,
        scope: &mut dyn GenerationScope,
    ) -> Result<HelperSpec, StrategyError> {
        let Binding::Sequence {
            target, key_field, ..
        } = &accessor.binding
        else {
            return Err(StrategyError::not_applicable(
                &method.name,
                self.kind(),
                field.binding,
            ));
        };

        let schema = scope.schema_of(&target.type_ref)?;
        let params = map_params(method, &schema, key_field.as_deref())?;
        if let Some(key) = key_field {
            if !params.iter().any(|p| p.key) {
                return Err(StrategyError::MissingKeyParameter {
                    method: method.name.clone(),
                    key: key.clone(),
                });
            }
        }

        Ok(HelperSpec {
            method: method.name.clone(),
            kind: self.kind(),
            field: field.name.clone(),
            field_index: accessor.index,
            params,
            returns: returned(method, scope),
            strategy: self.name(),
        })
    }
}

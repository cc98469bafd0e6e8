//! Schema introspection
//!
//! Turns a [`TypeDescription`] into a [`SchemaType`]: flattens inherited
//! fields, resolves each field to exactly one [`BindingKind`], and resolves
//! each method to a helper kind and target field.

use crate::describe::{DeclaredType, FieldDescription, FieldTag, MethodDescription, TypeKey, TypeRef};
use crate::error::{SchemaError, SchemaResult};
use crate::model::{BindingKind, HelperKind, SchemaField, SchemaMethod, SchemaType, WireName};
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Introspection options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrospectOptions {
    /// Infer helper kind and field from `Init`/`Clear`/`Add` name prefixes
    pub convention_helpers: bool,
    /// Also try the target name with a trailing `s`
    pub pluralize_helpers: bool,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            convention_helpers: true,
            pluralize_helpers: true,
        }
    }
}

/// Introspects schema types and caches the result for the process lifetime
#[derive(Debug, Default)]
pub struct Introspector {
    cache: DashMap<TypeKey, Arc<SchemaType>>,
    options: IntrospectOptions,
}

impl Introspector {
    /// Create introspector with default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create introspector with the given options
    #[inline]
    #[must_use]
    pub fn with_options(options: IntrospectOptions) -> Self {
        Self {
            cache: DashMap::new(),
            options,
        }
    }

    /// Active options
    #[inline]
    #[must_use]
    pub fn options(&self) -> IntrospectOptions {
        self.options
    }

    /// Introspect a schema type, reusing a cached result
    ///
    /// # Errors
    /// Returns a [`SchemaError`] for bindings that are missing or
    /// ambiguous, unresolvable methods, dictionaries without key, and
    /// inheritance cycles. Failures are not cached.
    pub fn introspect(&self, ty: &TypeRef) -> SchemaResult<Arc<SchemaType>> {
        if let Some(hit) = self.cache.get(&ty.key()) {
            return Ok(Arc::clone(hit.value()));
        }
        let built = Arc::new(self.build(ty)?);
        tracing::debug!(
            "Introspected {}: {} fields, {} methods",
            built.name,
            built.fields.len(),
            built.methods.len()
        );
        let entry = self.cache.entry(ty.key()).or_insert(built);
        Ok(Arc::clone(entry.value()))
    }

    /// Cached introspection result, if any
    #[must_use]
    pub fn cached(&self, key: TypeKey) -> Option<Arc<SchemaType>> {
        self.cache.get(&key).map(|e| Arc::clone(e.value()))
    }

    /// Number of cached types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if nothing is cached
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn build(&self, ty: &TypeRef) -> SchemaResult<SchemaType> {
        let type_name = ty.short_name();
        let mut declared_fields = Vec::new();
        let mut declared_methods = Vec::new();
        flatten(ty, &mut Vec::new(), &mut declared_fields, &mut declared_methods)?;

        let fields = declared_fields
            .into_iter()
            .map(|(owner, field)| resolve_field(type_name, owner, field))
            .collect::<SchemaResult<Vec<_>>>()?;

        let methods = declared_methods
            .into_iter()
            .map(|method| self.resolve_method(type_name, &fields, method))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(SchemaType {
            type_ref: *ty,
            name: type_name.to_string(),
            qualified_name: ty.qualified_name().to_string(),
            fields,
            methods,
        })
    }

    fn resolve_method(
        &self,
        type_name: &str,
        fields: &[SchemaField],
        method: MethodDescription,
    ) -> SchemaResult<SchemaMethod> {
        let (kind, target, explicit) = match &method.helper {
            Some((kind, target)) => {
                if !fields.iter().any(|f| &f.name == target) {
                    return Err(SchemaError::unmatched_method(type_name, &method.name));
                }
                (*kind, target.clone(), true)
            }
            None if self.options.convention_helpers => {
                let Some((kind, target)) = self.infer_helper(fields, &method.name) else {
                    return Err(SchemaError::unmatched_method(type_name, &method.name));
                };
                (kind, target, false)
            }
            None => return Err(SchemaError::unmatched_method(type_name, &method.name)),
        };

        Ok(SchemaMethod {
            name: method.name,
            kind,
            target,
            params: method.params,
            returns: method.returns,
            explicit,
        })
    }

    fn infer_helper(&self, fields: &[SchemaField], method: &str) -> Option<(HelperKind, String)> {
        HelperKind::by_prefix_length().into_iter().find_map(|kind| {
            let rest = method.strip_prefix(kind.prefix()).filter(|r| !r.is_empty())?;
            self.match_field(fields, rest).map(|f| (kind, f.name.clone()))
        })
    }

    fn match_field<'a>(&self, fields: &'a [SchemaField], rest: &str) -> Option<&'a SchemaField> {
        let exact = fields.iter().find(|f| f.name == rest);
        let plural = || {
            if !self.options.pluralize_helpers {
                return None;
            }
            let plural = format!("{rest}s");
            fields.iter().find(|f| f.name == plural)
        };
        let container = || {
            fields
                .iter()
                .find(|f| f.container.as_ref().is_some_and(|c| c.local == rest))
        };
        exact.or_else(plural).or_else(container)
    }
}

/// Own declarations first, then base declarations not shadowed by name
fn flatten(
    ty: &TypeRef,
    stack: &mut Vec<TypeKey>,
    fields: &mut Vec<(TypeRef, FieldDescription)>,
    methods: &mut Vec<MethodDescription>,
) -> SchemaResult<()> {
    if stack.contains(&ty.key()) {
        return Err(SchemaError::InheritanceCycle {
            type_name: ty.short_name().to_string(),
        });
    }
    stack.push(ty.key());

    let desc = ty.describe();
    for field in desc.fields {
        if !fields.iter().any(|(_, f)| f.name == field.name) {
            fields.push((*ty, field));
        }
    }
    for method in desc.methods {
        if !methods.iter().any(|m| m.name == method.name) {
            methods.push(method);
        }
    }
    for base in &desc.bases {
        flatten(base, stack, fields, methods)?;
    }

    stack.pop();
    Ok(())
}

#[derive(Default)]
struct Tags {
    attribute: Option<Option<String>>,
    element: Option<(Option<String>, Option<String>)>,
    container: Option<(String, Option<String>)>,
    item: Option<(Option<String>, Option<String>)>,
}

fn resolve_field(type_name: &str, owner: TypeRef, desc: FieldDescription) -> SchemaResult<SchemaField> {
    let mut tags = Tags::default();
    let mut default = None;
    let mut converter = None;
    let mut key_field = None;
    let mut auto_init = false;

    for tag in desc.tags {
        match tag {
            FieldTag::Attribute { name } => tags.attribute = Some(name),
            FieldTag::Element { name, namespace } => tags.element = Some((name, namespace)),
            FieldTag::Container { name, namespace } => tags.container = Some((name, namespace)),
            FieldTag::Item { name, namespace } => tags.item = Some((name, namespace)),
            FieldTag::Default(value) => default = Some(value),
            FieldTag::Converter(conv) => converter = Some(conv),
            FieldTag::Key(key) => key_field = Some(key),
            FieldTag::AutoInit => auto_init = true,
        }
    }

    let binding = classify(type_name, &desc.name, &desc.declared, &tags)?;

    let (wire, container) = match binding {
        BindingKind::Attribute => {
            let name = tags.attribute.flatten().unwrap_or_else(|| desc.name.clone());
            (WireName::new(name, None), None)
        }
        BindingKind::PrimitiveElement | BindingKind::ComplexElement => {
            let (name, ns) = tags.element.unwrap_or_default();
            (WireName::new(name.unwrap_or_else(|| desc.name.clone()), ns), None)
        }
        _ => match tags.container {
            Some((container_name, container_ns)) => {
                let (item_name, item_ns) = tags.item.or(tags.element).unwrap_or_default();
                let item_ns = item_ns.or_else(|| container_ns.clone());
                (
                    WireName::new(item_name.unwrap_or_else(|| desc.name.clone()), item_ns),
                    Some(WireName::new(container_name, container_ns)),
                )
            }
            None => {
                let (name, ns) = tags.element.unwrap_or_default();
                (WireName::new(name.unwrap_or_else(|| desc.name.clone()), ns), None)
            }
        },
    };

    if binding.is_keyed() && key_field.is_none() {
        return Err(SchemaError::MissingDictionaryKey {
            type_name: type_name.to_string(),
            field: desc.name,
        });
    }

    Ok(SchemaField {
        name: desc.name,
        declared: desc.declared,
        binding,
        wire,
        container,
        default,
        converter,
        key_field,
        auto_init,
        readable: desc.readable,
        writable: desc.writable,
        owner,
    })
}

/// Check each binding kind in fixed order; exactly one must match
fn classify(type_name: &str, field: &str, declared: &DeclaredType, tags: &Tags) -> SchemaResult<BindingKind> {
    let has_element = tags.element.is_some();
    let mut matches: SmallVec<[BindingKind; 2]> = SmallVec::new();

    if tags.attribute.is_some() && matches!(declared, DeclaredType::Scalar(_)) {
        matches.push(BindingKind::Attribute);
    }
    if has_element && matches!(declared, DeclaredType::Scalar(_)) {
        matches.push(BindingKind::PrimitiveElement);
    }
    if has_element && matches!(declared, DeclaredType::Schema(_)) {
        matches.push(BindingKind::ComplexElement);
    }
    if has_element || tags.container.is_some() {
        let sequence = match declared {
            DeclaredType::Array(_) => Some(BindingKind::SequenceArray),
            DeclaredType::List(_) => Some(BindingKind::SequenceList),
            DeclaredType::Dict(_) => Some(BindingKind::SequenceDict),
            DeclaredType::DictOfLists(_) => Some(BindingKind::SequenceDictOfLists),
            DeclaredType::Scalar(_) | DeclaredType::Schema(_) => None,
        };
        matches.extend(sequence);
    }

    if tags.container.is_some() && !declared.is_sequence() {
        return Err(SchemaError::unrecognized(
            type_name,
            field,
            "container tag on a non-sequence field",
        ));
    }

    match matches.as_slice() {
        [kind] => Ok(*kind),
        [] => Err(SchemaError::unrecognized(
            type_name,
            field,
            "no binding tag applies to the declared type",
        )),
        many => {
            let names: Vec<String> = many.iter().map(ToString::to_string).collect();
            Err(SchemaError::unrecognized(
                type_name,
                field,
                format!("matches {}", names.join(" and ")),
            ))
        }
    }
}

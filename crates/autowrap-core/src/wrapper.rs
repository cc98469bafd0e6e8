//! Wrapper instances: one generated type bound to one DOM node
//!
//! Reads run in a read session and fill the field's cache slot; writes run in
//! a write session, touch the DOM first and only then update the cache, so a
//! failed write never leaves the cache ahead of the tree.

use crate::cache::{CachedValue, FieldCache};
use crate::document::SharedDocument;
use crate::error::{WrapperError, WrapperResult};
use crate::generator::WrapperGenerator;
use crate::runtime::NodeAccess;
use crate::sequence::{SequenceValue, SharedDict, SharedGroups, SharedList};
use crate::synthesizer::GeneratedType;
use autowrap_dom::NodeId;
use autowrap_schema::{FromValue, HelperKind, Schema, Value, WireName};
use autowrap_session::LockScope;
use autowrap_strategy::{
    AccessorSpec, Binding, CachePolicy, Conversion, Guard, SequenceShape, TypeName, TypeTarget,
};
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, Weak};

/// Entry of a keyed sequence pointing back at its owner
#[derive(Debug)]
struct ParentLink {
    owner: Weak<WrapperInner>,
    field_index: usize,
    key_field: String,
}

struct WrapperInner {
    generator: WrapperGenerator,
    doc: SharedDocument,
    node: NodeId,
    ty: Arc<GeneratedType>,
    cache: Vec<FieldCache>,
    parent: Option<ParentLink>,
}

/// A typed view over one DOM element
///
/// Cheap to clone; clones share one set of field caches. Wrapping the same
/// node again yields an independent instance whose caches do not observe
/// writes made through this one.
#[derive(Clone)]
pub struct Wrapper {
    inner: Arc<WrapperInner>,
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("type", &self.inner.ty.name)
            .field("node", &self.inner.node)
            .finish_non_exhaustive()
    }
}

impl Wrapper {
    pub(crate) fn new(
        generator: WrapperGenerator,
        doc: SharedDocument,
        node: NodeId,
        ty: Arc<GeneratedType>,
    ) -> Self {
        Self::with_parent(generator, doc, node, ty, None)
    }

    fn with_parent(
        generator: WrapperGenerator,
        doc: SharedDocument,
        node: NodeId,
        ty: Arc<GeneratedType>,
        parent: Option<ParentLink>,
    ) -> Self {
        let cache = ty.accessors.iter().map(|_| FieldCache::default()).collect();
        Self {
            inner: Arc::new(WrapperInner {
                generator,
                doc,
                node,
                ty,
                cache,
                parent,
            }),
        }
    }

    /// Wrapped element
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    /// Document the element lives in
    #[inline]
    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.inner.doc
    }

    /// Generated implementation behind this wrapper
    #[inline]
    #[must_use]
    pub fn generated(&self) -> &Arc<GeneratedType> {
        &self.inner.ty
    }

    /// Generated implementation name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.inner.ty.name
    }

    /// Whether both wrappers view the same element of the same document
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        self.inner.node == other.inner.node && self.inner.doc.dom().ptr_eq(other.inner.doc.dom())
    }

    /// Whether the field's cache slot is filled
    ///
    /// # Errors
    /// Fails for unknown fields
    pub fn is_cached(&self, field: &str) -> WrapperResult<bool> {
        let spec = self.accessor(field)?;
        Ok(self.inner.cache[spec.index].is_filled())
    }

    /// Re-wrap the same node as a `T`
    ///
    /// The new instance shares the type cache but starts with empty field
    /// caches.
    ///
    /// # Errors
    /// Returns the configuration error of `T`
    pub fn as_type<T: Schema>(&self) -> WrapperResult<Self> {
        self.inner.generator.wrap::<T>(&self.inner.doc, self.inner.node)
    }

    // Scalars

    /// Value of a scalar field
    ///
    /// `None` when the attribute or element is missing and there is no
    /// default.
    ///
    /// # Errors
    /// Fails for unknown, unreadable or non-scalar fields and when the
    /// stored text does not convert
    pub fn get(&self, field: &str) -> WrapperResult<Option<Value>> {
        let spec = self.readable(field)?;
        let conversion = scalar_conversion(spec)?;
        let settled = self.run_guards(spec)?;

        if let Some(CachedValue::Scalar(value)) = self.cached(spec) {
            tracing::trace!("Cache hit for {}.{}", self.inner.ty.name, field);
            return Ok(value);
        }

        let _read = self.inner.doc.read();
        let access = self.access();
        let value = match &spec.binding {
            Binding::Attribute { name } => {
                access.get_attribute_or_default(name, conversion, spec.default.as_ref())?
            }
            Binding::Element { name } => {
                access.get_element_or_default(name, conversion, spec.default.as_ref())?
            }
            other => return Err(WrapperError::wrong_binding(field, "scalar", other.label())),
        };
        if !settled {
            return Ok(value);
        }
        match self.remember(spec, CachedValue::Scalar(value.clone())) {
            CachedValue::Scalar(cached) => Ok(cached),
            _ => Ok(value),
        }
    }

    /// Value of a scalar field as a Rust type
    ///
    /// # Errors
    /// As [`get`](Self::get), plus a type mismatch
    pub fn get_as<T: FromValue>(&self, field: &str) -> WrapperResult<Option<T>> {
        Ok(self.get(field)?.map(T::from_value).transpose()?)
    }

    /// Write a scalar field
    ///
    /// The DOM holds the converted text; the cache holds the value as
    /// written.
    ///
    /// # Errors
    /// Fails for unknown, unwritable or non-scalar fields, on conversion
    /// errors, inside a read-only session, and when the field is the key of a
    /// dictionary entry and another entry already uses the new key
    pub fn set(&self, field: &str, value: impl Into<Value>) -> WrapperResult<()> {
        let spec = self.accessor(field)?;
        if !spec.setter {
            return Err(WrapperError::NotWritable {
                field: field.to_string(),
            });
        }
        let conversion = scalar_conversion(spec)?;
        let value = conversion.prepare(value.into())?;

        let _write = self.inner.doc.write()?;
        self.ensure_rekey_free(field, &value)?;
        let access = self.access();
        match &spec.binding {
            Binding::Attribute { name } => access.set_attribute(name, conversion, &value)?,
            Binding::Element { name } => access.set_element(name, conversion, &value)?,
            other => return Err(WrapperError::wrong_binding(field, "scalar", other.label())),
        }
        if spec.cache != CachePolicy::Uncached {
            self.inner.cache[spec.index].store(CachedValue::Scalar(Some(value.clone())));
        }
        self.notify_parent(field, &value);
        Ok(())
    }

    // Nested objects

    /// Wrapper of a complex child element, `None` when the element is missing
    ///
    /// # Errors
    /// Fails for unknown, unreadable or non-child fields
    pub fn child(&self, field: &str) -> WrapperResult<Option<Self>> {
        let spec = self.readable(field)?;
        let Binding::Child { name, target } = &spec.binding else {
            return Err(WrapperError::wrong_binding(field, "child", spec.binding.label()));
        };
        let settled = self.run_guards(spec)?;

        if let Some(CachedValue::Child(child)) = self.cached(spec) {
            return Ok(child);
        }

        let _read = self.inner.doc.read();
        let child = match self.access().find_element(name, false)? {
            Some(node) => Some(self.wrap_target(target, node, None)?),
            None => None,
        };
        if !settled {
            return Ok(child);
        }
        match self.remember(spec, CachedValue::Child(child.clone())) {
            CachedValue::Child(cached) => Ok(cached),
            _ => Ok(child),
        }
    }

    // Sequences

    /// Materialized sequence field
    ///
    /// Never fails for a missing container; the collection is empty then.
    ///
    /// # Errors
    /// Fails for unknown, unreadable or non-sequence fields
    pub fn sequence(&self, field: &str) -> WrapperResult<SequenceValue> {
        let spec = self.readable(field)?;
        let Binding::Sequence {
            container,
            item,
            shape,
            target,
            key_field,
        } = &spec.binding
        else {
            return Err(WrapperError::wrong_binding(field, "sequence", spec.binding.label()));
        };
        let settled = self.run_guards(spec)?;

        if let Some(CachedValue::Sequence(seq)) = self.cached(spec) {
            return Ok(seq);
        }

        let _read = self.inner.doc.read();
        let nodes = self.access().get_all_elements(container.as_ref(), item)?;
        let generated = self.inner.generator.generate_ref(&target.type_ref)?;
        let mut items = Vec::with_capacity(nodes.len());
        for node in nodes {
            let entry = self.entry(&generated, node, spec.index, key_field.as_deref());
            let key = entry_key(&entry, key_field.as_deref())?;
            items.push((key, entry));
        }
        let seq = SequenceValue::build(*shape, items);
        tracing::trace!(
            "Materialized {}.{} with {} item(s)",
            self.inner.ty.name,
            field,
            seq.len()
        );
        if !settled {
            return Ok(seq);
        }
        match self.remember(spec, CachedValue::Sequence(seq.clone())) {
            CachedValue::Sequence(cached) => Ok(cached),
            _ => Ok(seq),
        }
    }

    /// Current items of any sequence field, flattened
    ///
    /// The returned vector is a copy; no view lock is held while using it.
    ///
    /// # Errors
    /// As [`sequence`](Self::sequence)
    pub fn items(&self, field: &str) -> WrapperResult<Vec<Self>> {
        Ok(self.sequence(field)?.items())
    }

    /// Snapshot of an array field
    ///
    /// # Errors
    /// Fails unless the field is an array sequence
    pub fn array(&self, field: &str) -> WrapperResult<Arc<[Self]>> {
        match self.sequence(field)? {
            SequenceValue::Array(items) => Ok(items),
            _ => Err(WrapperError::wrong_binding(field, "array", "another sequence shape")),
        }
    }

    /// Shared view of a list field
    ///
    /// Do not call wrapper methods on the same document while holding the
    /// view's lock; see [`SequenceValue`].
    ///
    /// # Errors
    /// Fails unless the field is a list sequence
    pub fn list(&self, field: &str) -> WrapperResult<SharedList> {
        match self.sequence(field)? {
            SequenceValue::List(list) => Ok(list),
            _ => Err(WrapperError::wrong_binding(field, "list", "another sequence shape")),
        }
    }

    /// Shared view of a dictionary field
    ///
    /// Writing an entry's key field re-keys this view, so release its lock
    /// before writing through an entry. Writers on other threads wait for
    /// the lock as well; see [`SequenceValue`].
    ///
    /// # Errors
    /// Fails unless the field is a dictionary sequence
    pub fn dict(&self, field: &str) -> WrapperResult<SharedDict> {
        match self.sequence(field)? {
            SequenceValue::Dict(map) => Ok(map),
            _ => Err(WrapperError::wrong_binding(field, "dictionary", "another sequence shape")),
        }
    }

    /// Shared view of a dictionary-of-lists field
    ///
    /// Do not call wrapper methods on the same document while holding the
    /// view's lock; see [`SequenceValue`].
    ///
    /// # Errors
    /// Fails unless the field is a dictionary-of-lists sequence
    pub fn dict_of_lists(&self, field: &str) -> WrapperResult<SharedGroups> {
        match self.sequence(field)? {
            SequenceValue::DictOfLists(groups) => Ok(groups),
            _ => Err(WrapperError::wrong_binding(
                field,
                "dictionary of lists",
                "another sequence shape",
            )),
        }
    }

    // Helpers

    /// Ensure the backing element of a field exists
    ///
    /// For complex elements, `props` are written to the child, which is
    /// returned and cached.
    ///
    /// # Errors
    /// Fails for attributes and self-delimited sequences, for unknown
    /// properties and inside a read-only session
    pub fn init(&self, field: &str, props: &[(&str, Value)]) -> WrapperResult<Option<Self>> {
        let spec = self.accessor(field)?;
        let _write = self.inner.doc.write()?;
        let access = self.access();
        let slot = &self.inner.cache[spec.index];

        match &spec.binding {
            Binding::Child { name, target } => {
                let node = access.init_element(name)?;
                let child = match slot.get() {
                    Some(CachedValue::Child(Some(cached))) if cached.node() == node => cached,
                    _ => self.wrap_target(target, node, None)?,
                };
                child.apply_props(props)?;
                if spec.cache != CachePolicy::Uncached {
                    slot.store(CachedValue::Child(Some(child.clone())));
                }
                Ok(Some(child))
            }
            Binding::Element { name } => {
                reject_props(field, props)?;
                access.init_element(name)?;
                slot.invalidate();
                Ok(None)
            }
            Binding::Sequence {
                container: Some(container),
                ..
            } => {
                reject_props(field, props)?;
                access.init_element(container)?;
                Ok(None)
            }
            other => Err(WrapperError::wrong_binding(field, "element or container", other.label())),
        }
    }

    /// Remove the backing node(s) of a field
    ///
    /// Missing nodes are a no-op unless the generator runs with strict
    /// clear. Shared list and dictionary views are emptied in place.
    ///
    /// # Errors
    /// Fails under strict clear when nothing was removed and inside a
    /// read-only session
    pub fn clear(&self, field: &str) -> WrapperResult<()> {
        let spec = self.accessor(field)?;
        let _write = self.inner.doc.write()?;
        let access = self.access();

        let (removed, name) = match &spec.binding {
            Binding::Attribute { name } => (access.clear_attribute(name)?, name.clone()),
            Binding::Element { name } | Binding::Child { name, .. } => {
                (access.clear_element(name)?, name.to_string())
            }
            Binding::Sequence {
                container: Some(container),
                ..
            } => (access.clear_element(container)?, container.to_string()),
            Binding::Sequence {
                container: None,
                item,
                ..
            } => (access.clear_all_elements(item)? > 0, item.to_string()),
        };

        if !removed && self.inner.generator.config().strict_clear {
            return Err(WrapperError::ElementNotFound { name });
        }

        let slot = &self.inner.cache[spec.index];
        match slot.sequence() {
            Some(seq) if seq.shape() != SequenceShape::Array => seq.clear(),
            _ => slot.invalidate(),
        }
        tracing::debug!("Cleared {}.{}", self.inner.ty.name, field);
        Ok(())
    }

    /// Append a sequence item and write `props` to it
    ///
    /// Lists and dictionaries already materialized see the item in place;
    /// array snapshots are dropped and must be fetched again.
    ///
    /// # Errors
    /// Fails for non-sequence fields, unknown properties, a keyed sequence
    /// without a key property, a dictionary key already in use, and inside a
    /// read-only session
    pub fn add(&self, field: &str, props: &[(&str, Value)]) -> WrapperResult<Self> {
        let spec = self.accessor(field)?;
        let Binding::Sequence {
            container,
            item,
            shape,
            target,
            key_field,
        } = &spec.binding
        else {
            return Err(WrapperError::wrong_binding(field, "sequence", spec.binding.label()));
        };
        let generated = self.inner.generator.generate_ref(&target.type_ref)?;
        let resolved = resolve_props(&generated, props)?;
        let key_value = match key_field {
            Some(key) => match resolved.iter().find(|(prop, _)| prop.field == *key) {
                Some((_, value)) => Some(value.key_text()),
                None => {
                    return Err(WrapperError::MissingKey {
                        field: field.to_string(),
                        key: key.clone(),
                    })
                }
            },
            None => None,
        };

        let _write = self.inner.doc.write()?;
        if let (SequenceShape::Dict, Some(key)) = (shape, &key_value) {
            self.ensure_key_free(field, key, None)?;
        }
        let node = self.access().add_element(container.as_ref(), item)?;
        let entry = self.entry(&generated, node, spec.index, key_field.as_deref());
        for (prop, value) in resolved {
            entry.set(&prop.field, value)?;
        }

        let slot = &self.inner.cache[spec.index];
        match spec.cache {
            CachePolicy::UpdateInPlace => {
                if let Some(seq) = slot.sequence() {
                    let key = entry_key(&entry, key_field.as_deref())?;
                    seq.insert(key, entry.clone());
                }
            }
            CachePolicy::InvalidateOnAdd => slot.invalidate(),
            CachePolicy::Slot | CachePolicy::Uncached => {}
        }
        tracing::debug!("Added {} to {}.{}", entry.type_name(), self.inner.ty.name, field);
        Ok(entry)
    }

    /// Remove every item of a sequence field matching `predicate`
    ///
    /// Every item element in the DOM is visited, including entries a
    /// dictionary view hides behind an earlier duplicate key. Both the DOM
    /// node and the cached entry are removed. Returns the number of removed
    /// items.
    ///
    /// # Errors
    /// Fails for non-sequence fields and inside a read-only session
    pub fn walk(&self, field: &str, mut predicate: impl FnMut(&Self) -> bool) -> WrapperResult<usize> {
        let spec = self.accessor(field)?;
        let Binding::Sequence {
            container,
            item,
            target,
            key_field,
            ..
        } = &spec.binding
        else {
            return Err(WrapperError::wrong_binding(field, "sequence", spec.binding.label()));
        };
        let _write = self.inner.doc.write()?;
        let seq = self.sequence(field)?;
        let cached = seq.items();
        let generated = self.inner.generator.generate_ref(&target.type_ref)?;
        let access = self.access();

        let mut removed = 0;
        let mut hidden = Vec::new();
        for node in access.get_all_elements(container.as_ref(), item)? {
            let (entry, in_view) = match cached.iter().find(|w| w.node() == node) {
                Some(wrapper) => (wrapper.clone(), true),
                None => (self.entry(&generated, node, spec.index, key_field.as_deref()), false),
            };
            if predicate(&entry) {
                access.remove_node(node)?;
                seq.remove_node(node);
                removed += 1;
            } else if !in_view {
                hidden.push(entry);
            }
        }
        // Survivors shadowed by a removed duplicate take over its key
        if let (true, SequenceValue::Dict(map)) = (removed > 0, &seq) {
            for entry in hidden {
                let key = entry_key(&entry, key_field.as_deref())?;
                map.write().entry(key).or_insert(entry);
            }
        }
        if removed > 0 && seq.shape() == SequenceShape::Array {
            self.inner.cache[spec.index].invalidate();
        }
        Ok(removed)
    }

    /// Call a declared helper method with positional arguments
    ///
    /// Returns the created or initialized child for `Add` and `Init` on
    /// complex elements.
    ///
    /// # Errors
    /// Fails for unknown methods, a wrong argument count, and whatever the
    /// helper itself raises
    pub fn invoke(&self, method: &str, args: &[Value]) -> WrapperResult<Option<Self>> {
        let ty = Arc::clone(&self.inner.ty);
        let helper = ty
            .helper(method)
            .ok_or_else(|| WrapperError::unknown_method(ty.name.as_str(), method))?;
        if args.len() != helper.params.len() {
            return Err(WrapperError::ArgumentCount {
                method: method.to_string(),
                expected: helper.params.len(),
                actual: args.len(),
            });
        }

        let mut props: SmallVec<[(&str, Value); 4]> = SmallVec::new();
        for (param, arg) in helper.params.iter().zip(args) {
            props.push((param.property.as_str(), param.ty.coerce(arg.clone())?));
        }

        tracing::trace!("Invoking {}.{}", ty.name, method);
        match helper.kind {
            HelperKind::Init => self.init(&helper.field, &props),
            HelperKind::Clear => self.clear(&helper.field).map(|()| None),
            HelperKind::Add => self.add(&helper.field, &props).map(Some),
        }
    }

    // Internals

    fn accessor(&self, field: &str) -> WrapperResult<&AccessorSpec> {
        self.inner
            .ty
            .accessor(field)
            .ok_or_else(|| WrapperError::unknown_field(self.inner.ty.name.as_str(), field))
    }

    fn readable(&self, field: &str) -> WrapperResult<&AccessorSpec> {
        let spec = self.accessor(field)?;
        if !spec.getter {
            return Err(WrapperError::NotReadable {
                field: field.to_string(),
            });
        }
        Ok(spec)
    }

    fn access(&self) -> NodeAccess<'_> {
        NodeAccess::new(self.inner.doc.dom(), self.inner.node)
    }

    fn cached(&self, spec: &AccessorSpec) -> Option<CachedValue> {
        if spec.cache == CachePolicy::Uncached {
            return None;
        }
        self.inner.cache[spec.index].get()
    }

    fn remember(&self, spec: &AccessorSpec, value: CachedValue) -> CachedValue {
        if spec.cache == CachePolicy::Uncached {
            return value;
        }
        self.inner.cache[spec.index].get_or_insert(value)
    }

    fn wrap_target(
        &self,
        target: &TypeTarget,
        node: NodeId,
        parent: Option<ParentLink>,
    ) -> WrapperResult<Self> {
        let generated = self.inner.generator.generate_ref(&target.type_ref)?;
        Ok(self.child_wrapper(generated, node, parent))
    }

    fn child_wrapper(&self, generated: Arc<GeneratedType>, node: NodeId, parent: Option<ParentLink>) -> Self {
        Self::with_parent(
            self.inner.generator.clone(),
            self.inner.doc.clone(),
            node,
            generated,
            parent,
        )
    }

    /// Sequence item; keyed items link back for re-keying
    fn entry(
        &self,
        generated: &Arc<GeneratedType>,
        node: NodeId,
        field_index: usize,
        key_field: Option<&str>,
    ) -> Self {
        let parent = key_field.map(|key| ParentLink {
            owner: Arc::downgrade(&self.inner),
            field_index,
            key_field: key.to_string(),
        });
        self.child_wrapper(Arc::clone(generated), node, parent)
    }

    fn apply_props(&self, props: &[(&str, Value)]) -> WrapperResult<()> {
        for (prop, value) in resolve_props(&self.inner.ty, props)? {
            self.set(&prop.field, value)?;
        }
        Ok(())
    }

    /// Tell the owning keyed sequence that this entry's key changed
    fn notify_parent(&self, field: &str, value: &Value) {
        let Some(link) = &self.inner.parent else {
            return;
        };
        if link.key_field != field {
            return;
        }
        let Some(owner) = link.owner.upgrade() else {
            return;
        };
        if let Some(seq) = owner.cache.get(link.field_index).and_then(FieldCache::sequence) {
            seq.rekey(self.inner.node, value.key_text());
        }
    }

    /// Reject a dictionary key already held by an entry other than `except`
    fn ensure_key_free(&self, field: &str, key: &str, except: Option<NodeId>) -> WrapperResult<()> {
        if let SequenceValue::Dict(map) = self.sequence(field)? {
            let taken = map
                .read()
                .get(key)
                .is_some_and(|entry| Some(entry.node()) != except);
            if taken {
                return Err(WrapperError::duplicate_key(field, key));
            }
        }
        Ok(())
    }

    /// Reject a key write that would collide in the owning dictionary
    fn ensure_rekey_free(&self, field: &str, value: &Value) -> WrapperResult<()> {
        let Some(link) = &self.inner.parent else {
            return Ok(());
        };
        if link.key_field != field {
            return Ok(());
        }
        let Some(inner) = link.owner.upgrade() else {
            return Ok(());
        };
        let owner = Self { inner };
        match owner.inner.ty.accessors.get(link.field_index) {
            Some(spec) => owner.ensure_key_free(&spec.field, &value.key_text(), Some(self.inner.node)),
            None => Ok(()),
        }
    }

    /// Run auto-init guards unless the slot is filled
    ///
    /// Returns `false` when the guards had work but were skipped because the
    /// thread only holds a read session; the read must not be cached then.
    fn run_guards(&self, spec: &AccessorSpec) -> WrapperResult<bool> {
        if spec.guards.is_empty() || self.inner.cache[spec.index].is_filled() {
            return Ok(true);
        }

        let pending = {
            let _read = self.inner.doc.read();
            self.guards_pending(spec)?
        };
        if !pending {
            return Ok(true);
        }
        if self.inner.doc.scope() == LockScope::ReadHeld {
            tracing::trace!(
                "Skipping auto-init of {}.{} inside a read session",
                self.inner.ty.name,
                spec.field
            );
            return Ok(false);
        }

        let _write = self.inner.doc.write()?;
        let access = self.access();
        for guard in &spec.guards {
            match guard {
                Guard::EnsureElement => {
                    if let Some(name) = guarded_element(&spec.binding) {
                        access.init_element(name)?;
                    }
                }
                Guard::EnsureAttribute => {
                    if let (Binding::Attribute { name }, Some(conversion), Some(default)) =
                        (&spec.binding, &spec.conversion, &spec.default)
                    {
                        if self.inner.doc.dom().attribute(self.inner.node, name)?.is_none() {
                            access.set_attribute(name, conversion, default)?;
                        }
                    }
                }
            }
        }
        tracing::debug!("Auto-initialized {}.{}", self.inner.ty.name, spec.field);
        Ok(true)
    }

    fn guards_pending(&self, spec: &AccessorSpec) -> WrapperResult<bool> {
        for guard in &spec.guards {
            let pending = match guard {
                Guard::EnsureElement => match guarded_element(&spec.binding) {
                    Some(name) => self.access().find_element(name, false)?.is_none(),
                    None => false,
                },
                Guard::EnsureAttribute => match &spec.binding {
                    Binding::Attribute { name } => self
                        .inner
                        .doc
                        .dom()
                        .attribute(self.inner.node, name)?
                        .is_none(),
                    _ => false,
                },
            };
            if pending {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn scalar_conversion(spec: &AccessorSpec) -> WrapperResult<&Conversion> {
    match (&spec.binding, &spec.conversion) {
        (Binding::Attribute { .. } | Binding::Element { .. }, Some(conversion)) => Ok(conversion),
        (binding, _) => Err(WrapperError::wrong_binding(
            spec.field.as_str(),
            "scalar",
            binding.label(),
        )),
    }
}

fn guarded_element(binding: &Binding) -> Option<&WireName> {
    match binding {
        Binding::Element { name } | Binding::Child { name, .. } => Some(name),
        Binding::Sequence {
            container: Some(container),
            ..
        } => Some(container),
        Binding::Attribute { .. } | Binding::Sequence { container: None, .. } => None,
    }
}

/// Dictionary key of an entry; empty when the key field is unset
fn entry_key(entry: &Wrapper, key_field: Option<&str>) -> WrapperResult<String> {
    match key_field {
        Some(key) => Ok(entry.get(key)?.map(|v| v.key_text()).unwrap_or_default()),
        None => Ok(String::new()),
    }
}

/// Match properties case-insensitively onto settable scalar accessors and
/// convert their values, before anything is written
fn resolve_props<'t>(
    ty: &'t GeneratedType,
    props: &[(&str, Value)],
) -> WrapperResult<SmallVec<[(&'t AccessorSpec, Value); 4]>> {
    props
        .iter()
        .map(|(prop, value)| {
            let spec = ty
                .accessors
                .iter()
                .find(|a| a.setter && a.conversion.is_some() && a.field.eq_ignore_ascii_case(prop))
                .ok_or_else(|| WrapperError::UnknownProperty {
                    type_name: ty.name.to_string(),
                    property: (*prop).to_string(),
                })?;
            let conversion = scalar_conversion(spec)?;
            Ok((spec, conversion.prepare(value.clone())?))
        })
        .collect()
}

fn reject_props(field: &str, props: &[(&str, Value)]) -> WrapperResult<()> {
    match props.first() {
        Some((prop, _)) => Err(WrapperError::UnknownProperty {
            type_name: field.to_string(),
            property: (*prop).to_string(),
        }),
        None => Ok(()),
    }
}

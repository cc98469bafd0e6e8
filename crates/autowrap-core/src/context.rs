//! Generation context: name registry and dependency queue of one run

use crate::synthesizer::GeneratedType;
use autowrap_schema::{Introspector, SchemaError, SchemaType, TypeKey, TypeRef};
use autowrap_strategy::{GenerationScope, TypeName};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Per-run queue of schema types still to generate
///
/// Names are memoized: a type is queued once however often it is required,
/// which is what lets self-referential schemas terminate. Types committed by
/// earlier runs resolve to their existing name and are never queued.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    introspector: &'a Introspector,
    committed: &'a DashMap<TypeKey, Arc<GeneratedType>>,
    names: HashMap<TypeKey, TypeName>,
    used: HashSet<String>,
    queue: VecDeque<TypeRef>,
    dependencies: Vec<TypeName>,
}

impl<'a> GenerationContext<'a> {
    pub(crate) fn new(
        introspector: &'a Introspector,
        committed: &'a DashMap<TypeKey, Arc<GeneratedType>>,
    ) -> Self {
        let used = committed
            .iter()
            .map(|entry| entry.value().name.as_str().to_string())
            .collect();
        Self {
            introspector,
            committed,
            names: HashMap::new(),
            used,
            queue: VecDeque::new(),
            dependencies: Vec::new(),
        }
    }

    /// Next queued type and its assigned name
    ///
    /// Resets the dependency list collected for the previous type.
    pub fn drain(&mut self) -> Option<(TypeRef, TypeName)> {
        let next = self.queue.pop_front()?;
        self.dependencies.clear();
        let name = self.names.get(&next.key())?.clone();
        Some((next, name))
    }

    /// Types required since the last [`drain`](Self::drain), first use first
    pub fn take_dependencies(&mut self) -> Vec<TypeName> {
        std::mem::take(&mut self.dependencies)
    }

    /// Name assigned in this run
    #[must_use]
    pub fn name_of(&self, ty: &TypeRef) -> Option<&TypeName> {
        self.names.get(&ty.key())
    }

    /// Types still queued
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Types named in this run
    #[inline]
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.names.len()
    }

    fn assign(&mut self, ty: &TypeRef) -> TypeName {
        let base = sanitize(ty.qualified_name());
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        TypeName::new(candidate)
    }

    fn note_dependency(&mut self, name: &TypeName) {
        if !self.dependencies.contains(name) {
            self.dependencies.push(name.clone());
        }
    }
}

impl GenerationScope for GenerationContext<'_> {
    fn require_type(&mut self, ty: &TypeRef) -> TypeName {
        let key = ty.key();
        let name = if let Some(done) = self.committed.get(&key) {
            done.name.clone()
        } else if let Some(known) = self.names.get(&key) {
            known.clone()
        } else {
            let name = self.assign(ty);
            tracing::trace!("Queued {} as {}", ty.qualified_name(), name);
            self.names.insert(key, name.clone());
            self.queue.push_back(*ty);
            name
        };
        self.note_dependency(&name);
        name
    }

    fn schema_of(&mut self, ty: &TypeRef) -> Result<Arc<SchemaType>, SchemaError> {
        self.introspector.introspect(ty)
    }
}

/// Path separators and generic punctuation become `_`
fn sanitize(qualified: &str) -> String {
    let joined = qualified.replace("::", "_");
    joined
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

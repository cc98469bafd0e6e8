//! Wrapper generator and its type cache

use crate::config::GeneratorConfig;
use crate::context::GenerationContext;
use crate::document::SharedDocument;
use crate::error::{WrapperError, WrapperResult};
use crate::synthesizer::{synthesize, GeneratedType};
use crate::wrapper::Wrapper;
use autowrap_dom::NodeId;
use autowrap_schema::{Introspector, Schema, TypeKey, TypeRef};
use autowrap_strategy::{GenerationScope, StrategyRegistry, TypeName};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

struct GeneratorInner {
    config: GeneratorConfig,
    registry: StrategyRegistry,
    introspector: Introspector,
    types: DashMap<TypeKey, Arc<GeneratedType>>,
    generation: Mutex<()>,
}

/// Generates wrapper implementations and wraps DOM nodes with them
///
/// Cheap to clone; clones share one type cache. A generation run covers the
/// requested type and every nested type it reaches, and commits all of them
/// or none.
#[derive(Clone)]
pub struct WrapperGenerator {
    inner: Arc<GeneratorInner>,
}

impl fmt::Debug for WrapperGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperGenerator")
            .field("config", &self.inner.config)
            .field("types", &self.inner.types.len())
            .finish_non_exhaustive()
    }
}

impl Default for WrapperGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WrapperGenerator {
    /// Create generator with default configuration and strategies
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create generator with the given configuration
    #[must_use]
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_registry(config, StrategyRegistry::with_defaults())
    }

    /// Create generator with a custom strategy table
    #[must_use]
    pub fn with_registry(config: GeneratorConfig, registry: StrategyRegistry) -> Self {
        Self {
            inner: Arc::new(GeneratorInner {
                config,
                registry,
                introspector: Introspector::with_options(config.introspect_options()),
                types: DashMap::new(),
                generation: Mutex::new(()),
            }),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.inner.config
    }

    /// Strategy table
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &StrategyRegistry {
        &self.inner.registry
    }

    /// Generated implementation of `T`
    ///
    /// # Errors
    /// Returns the configuration error of `T` or of any nested type
    pub fn generate<T: Schema>(&self) -> WrapperResult<Arc<GeneratedType>> {
        self.generate_ref(&TypeRef::of::<T>())
    }

    /// Generated implementation of a schema type handle
    ///
    /// # Errors
    /// Returns the configuration error of the type or of any nested type
    pub fn generate_ref(&self, ty: &TypeRef) -> WrapperResult<Arc<GeneratedType>> {
        if let Some(done) = self.cached(ty.key()) {
            return Ok(done);
        }

        let _guard = self.inner.generation.lock();
        if let Some(done) = self.cached(ty.key()) {
            return Ok(done);
        }

        let (root, nested) = self.run(ty)?;
        Ok(self.commit(ty.key(), root, nested))
    }

    /// Generated implementation by identity, if generated already
    #[must_use]
    pub fn cached(&self, key: TypeKey) -> Option<Arc<GeneratedType>> {
        self.inner.types.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of generated implementations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    /// Whether nothing was generated yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }

    /// Wrap `node` as a `T`
    ///
    /// Every call returns a fresh instance with its own field caches.
    ///
    /// # Errors
    /// Returns the configuration error of `T`
    pub fn wrap<T: Schema>(&self, doc: &SharedDocument, node: NodeId) -> WrapperResult<Wrapper> {
        self.wrap_ref(&TypeRef::of::<T>(), doc, node)
    }

    /// Wrap `node` under a schema type handle
    ///
    /// # Errors
    /// Returns the configuration error of the type
    pub fn wrap_ref(&self, ty: &TypeRef, doc: &SharedDocument, node: NodeId) -> WrapperResult<Wrapper> {
        let generated = self.generate_ref(ty)?;
        doc.dom().name(node)?;
        Ok(Wrapper::new(self.clone(), doc.clone(), node, generated))
    }

    /// Wrap the document root as a `T`
    ///
    /// # Errors
    /// Fails without a root element or on a configuration error
    pub fn wrap_root<T: Schema>(&self, doc: &SharedDocument) -> WrapperResult<Wrapper> {
        let root = doc.root().ok_or(WrapperError::NoRoot)?;
        self.wrap::<T>(doc, root)
    }

    fn run(&self, ty: &TypeRef) -> WrapperResult<(GeneratedType, Vec<(TypeKey, GeneratedType)>)> {
        let inner = &*self.inner;
        let mut ctx = GenerationContext::new(&inner.introspector, &inner.types);

        let name = ctx.require_type(ty);
        // Pops `ty` itself and resets the dependency list
        let _ = ctx.drain();
        let root = self.synthesize_one(&mut ctx, ty, name)?;

        let mut nested = Vec::new();
        while let Some((next, name)) = ctx.drain() {
            let plan = self.synthesize_one(&mut ctx, &next, name)?;
            nested.push((next.key(), plan));
        }

        tracing::info!(
            "Generated {} as {} with {} nested implementation(s)",
            ty.qualified_name(),
            root.name,
            nested.len()
        );
        Ok((root, nested))
    }

    fn synthesize_one(
        &self,
        ctx: &mut GenerationContext<'_>,
        ty: &TypeRef,
        name: TypeName,
    ) -> WrapperResult<GeneratedType> {
        let schema = self.inner.introspector.introspect(ty)?;
        synthesize(ctx, name, &schema, &self.inner.registry)
    }

    fn commit(
        &self,
        key: TypeKey,
        root: GeneratedType,
        nested: Vec<(TypeKey, GeneratedType)>,
    ) -> Arc<GeneratedType> {
        let root = Arc::new(root);
        let all = std::iter::once((key, Arc::clone(&root)))
            .chain(nested.into_iter().map(|(k, g)| (k, Arc::new(g))));
        for (key, generated) in all {
            if self.inner.config.dump_generated {
                match serde_json::to_string_pretty(&*generated) {
                    Ok(json) => tracing::debug!("Generated {}:\n{}", generated.name, json),
                    Err(e) => tracing::warn!("Could not dump {}: {}", generated.name, e),
                }
            }
            self.inner.types.insert(key, generated);
        }
        root
    }
}

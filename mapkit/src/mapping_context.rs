use std::sync::Arc;

use crate::errors::MappingResult;
use crate::mapping_builder::MappingContextBuilder;
use crate::mapping_config::MappingConfig;
use crate::metadata::{Entity, TypeDescriptor, TypeRef, TypeRegistry};
use crate::path::{PropertyPath, PropertyPathResolver};

/// Entry point tying a [`TypeRegistry`] to a [`PropertyPathResolver`].
///
/// Each context owns its own resolution cache, so two contexts never see
/// each other's results. The handle is cheap to clone and can be shared
/// across threads.
///
/// # Examples
///
/// ```rust
/// use mapkit::metadata::{PropertyDescriptor, TypeDescriptor, TypeRef};
/// use mapkit::MappingContext;
///
/// let user = TypeDescriptor::builder("User")
///     .property(PropertyDescriptor::new("name", TypeRef::named("String")))
///     .build();
/// let context = MappingContext::builder().descriptor(user).build().unwrap();
///
/// let path = context.resolve_path("name", &TypeRef::named("User")).unwrap();
/// assert_eq!(path.to_dot_path(), "name");
/// ```
#[derive(Clone)]
pub struct MappingContext {
    inner: Arc<MappingContextInner>,
}

impl MappingContext {
    pub fn builder() -> MappingContextBuilder {
        MappingContextBuilder::new()
    }

    pub(crate) fn new(config: MappingConfig, registry: TypeRegistry) -> Self {
        let resolver = PropertyPathResolver::new(Arc::new(registry.clone()), config.clone());
        MappingContext {
            inner: Arc::new(MappingContextInner {
                config,
                registry,
                resolver,
            }),
        }
    }

    /// Registers an entity type after the context was built.
    ///
    /// Returns the [`TypeRef`] under which the type is known.
    pub fn register<T: Entity>(&self) -> MappingResult<TypeRef> {
        self.inner.registry.register::<T>()
    }

    /// Resolves `path` against the entity type `T`, registering `T` first
    /// if needed.
    pub fn resolve<T: Entity>(&self, path: &str) -> MappingResult<PropertyPath> {
        let root = self.register::<T>()?;
        self.inner.resolver.resolve(path, &root)
    }

    /// Resolves `path` against an already registered root type.
    pub fn resolve_path(&self, path: &str, root: &TypeRef) -> MappingResult<PropertyPath> {
        self.inner.resolver.resolve(path, root)
    }

    /// Extends `base` with `path`, resolved from the target type of its leaf.
    pub fn nested(&self, base: &PropertyPath, path: &str) -> MappingResult<PropertyPath> {
        self.inner.resolver.nested(base, path)
    }

    pub fn descriptor(&self, ty: &TypeRef) -> Option<Arc<TypeDescriptor>> {
        self.inner.registry.descriptor(ty)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    pub fn resolver(&self) -> &PropertyPathResolver {
        &self.inner.resolver
    }

    pub fn config(&self) -> &MappingConfig {
        &self.inner.config
    }
}

struct MappingContextInner {
    config: MappingConfig,
    registry: TypeRegistry,
    resolver: PropertyPathResolver,
}

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::{Entity, TypeDescriptor, TypeMetadata, TypeRef};

/// Thread-safe registry of type descriptors.
///
/// The registry is the default [`TypeMetadata`] implementation. Each type is
/// described once, on registration, and the descriptor is shared afterwards.
/// Registration is idempotent; registering a *different* descriptor under a
/// name that is already taken fails with `MetadataConflict`.
///
/// Cloning a registry is cheap and every clone shares the same descriptors.
///
/// # Examples
///
/// ```rust
/// use mapkit::metadata::{PropertyDescriptor, TypeDescriptor, TypeMetadata, TypeRef, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let address = TypeDescriptor::builder("Address")
///     .property(PropertyDescriptor::new("city", TypeRef::named("String")))
///     .build()
///     .unwrap();
/// registry.add_descriptor(address).unwrap();
///
/// assert!(registry.has_property(&TypeRef::named("Address"), "city"));
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<TypeRegistryInner>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            inner: Arc::new(TypeRegistryInner::new()),
        }
    }

    /// Registers an entity type and every entity type reachable from it.
    pub fn register<T: Entity>(&self) -> MappingResult<TypeRef> {
        let descriptor = T::type_descriptor()?;
        let type_ref = descriptor.type_ref().clone();
        if self.inner.add_descriptor(descriptor)? {
            T::register_related(self).map_err(|e| {
                log::error!("Failed to register types related to '{}': {}", type_ref, e);
                MappingError::new_with_cause(
                    &format!("Failed to register types related to '{}'", type_ref),
                    e.kind().clone(),
                    e,
                )
            })?;
        }
        Ok(type_ref)
    }

    /// Adds a descriptor built by hand.
    ///
    /// Returns `Ok(true)` if the descriptor was added, `Ok(false)` if an equal
    /// descriptor was already present.
    pub fn add_descriptor(&self, descriptor: TypeDescriptor) -> MappingResult<bool> {
        self.inner.add_descriptor(descriptor)
    }

    pub fn descriptor(&self, ty: &TypeRef) -> Option<Arc<TypeDescriptor>> {
        self.inner.descriptor(ty)
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.inner.descriptor(ty).is_some()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        self.inner.type_names()
    }

    pub fn len(&self) -> usize {
        self.inner.descriptors.read_with(|it| it.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeMetadata for TypeRegistry {
    fn has_type(&self, ty: &TypeRef) -> bool {
        self.contains(ty)
    }

    fn has_property(&self, owner: &TypeRef, name: &str) -> bool {
        self.inner
            .descriptor(owner)
            .is_some_and(|descriptor| descriptor.has_property(name))
    }

    fn property_type(&self, owner: &TypeRef, name: &str) -> Option<TypeRef> {
        self.inner.descriptor(owner).and_then(|descriptor| {
            descriptor
                .navigable_property(name)
                .map(|property| property.type_ref().clone())
        })
    }

    fn property_names(&self, owner: &TypeRef) -> Vec<String> {
        self.inner
            .descriptor(owner)
            .map(|descriptor| descriptor.property_names())
            .unwrap_or_default()
    }
}

struct TypeRegistryInner {
    descriptors: Atomic<HashMap<String, Arc<TypeDescriptor>>>,
}

impl Default for TypeRegistryInner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistryInner {
    fn new() -> Self {
        TypeRegistryInner {
            descriptors: atomic(HashMap::new()),
        }
    }

    fn add_descriptor(&self, descriptor: TypeDescriptor) -> MappingResult<bool> {
        let name = descriptor.type_name().to_string();
        self.descriptors.write_with(|descriptors| {
            if let Some(existing) = descriptors.get(&name) {
                if **existing == descriptor {
                    return Ok(false);
                }
                log::error!(
                    "A different descriptor is already registered for type '{}'",
                    name
                );
                return Err(MappingError::new(
                    &format!(
                        "A different descriptor is already registered for type '{}'",
                        name
                    ),
                    ErrorKind::MetadataConflict,
                ));
            }

            log::debug!(
                "Registered type '{}' with {} properties",
                name,
                descriptor.properties().count()
            );
            descriptors.insert(name.clone(), Arc::new(descriptor));
            Ok(true)
        })
    }

    fn descriptor(&self, ty: &TypeRef) -> Option<Arc<TypeDescriptor>> {
        let name = ty.name()?;
        self.descriptors.read_with(|it| it.get(name).cloned())
    }

    fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.descriptors.read_with(|it| it.keys().cloned().collect());
        names.sort();
        names
    }
}

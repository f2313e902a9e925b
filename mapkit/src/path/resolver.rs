use smallvec::SmallVec;
use std::sync::Arc;

use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::mapping_config::MappingConfig;
use crate::metadata::{TypeMetadata, TypeRef};
use crate::path::diagnostics::Diagnostics;
use crate::path::matcher::{SegmentMatch, SegmentMatcher};
use crate::path::property_path::ResolvedSegment;
use crate::path::syntax::check_syntax;
use crate::path::{PropertyPath, ResolutionCache};

/// Resolves property path strings against type metadata.
///
/// The resolver owns its [`ResolutionCache`]; clones share the cache. All
/// state touched during one resolution lives on the stack of the call, so a
/// resolver can be used from many threads at once.
///
/// Building a resolver freezes the [`MappingConfig`] it is given.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use mapkit::mapping_config::MappingConfig;
/// use mapkit::metadata::{PropertyDescriptor, TypeDescriptor, TypeRef, TypeRegistry};
/// use mapkit::path::PropertyPathResolver;
///
/// let registry = TypeRegistry::new();
/// registry.add_descriptor(
///     TypeDescriptor::builder("User")
///         .property(PropertyDescriptor::new("userName", TypeRef::named("String")))
///         .build()
///         .unwrap(),
/// ).unwrap();
///
/// let resolver = PropertyPathResolver::new(Arc::new(registry), MappingConfig::new());
/// let path = resolver.resolve("userName", &TypeRef::named("User")).unwrap();
/// assert_eq!(path.to_dot_path(), "userName");
/// ```
#[derive(Clone)]
pub struct PropertyPathResolver {
    inner: Arc<ResolverInner>,
}

impl PropertyPathResolver {
    pub fn new(metadata: Arc<dyn TypeMetadata>, config: MappingConfig) -> Self {
        config.initialize();
        PropertyPathResolver {
            inner: Arc::new(ResolverInner {
                metadata,
                config,
                cache: ResolutionCache::new(),
            }),
        }
    }

    /// Resolves `path` starting at `root`.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the path is blank or `root` is unknown to the metadata
    /// * `PathTooLong` - the path has more potential segments than allowed
    /// * `InvalidToken` - a segment is malformed
    /// * `UnknownProperty` - a segment names no property of the type searched
    pub fn resolve(&self, path: &str, root: &TypeRef) -> MappingResult<PropertyPath> {
        self.inner.resolve(path, root)
    }

    /// Resolves `path` relative to the leaf of `base` and returns the chain
    /// from the root of `base` through the new segments.
    pub fn nested(&self, base: &PropertyPath, path: &str) -> MappingResult<PropertyPath> {
        if path.trim().is_empty() {
            log::error!("Nested path must not be empty");
            return Err(MappingError::new(
                "Nested path must not be empty",
                ErrorKind::InvalidInput,
            ));
        }
        let full_path = format!("{}.{}", base.to_dot_path(), path);
        self.inner.resolve(&full_path, base.owning_type())
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.inner.cache
    }

    pub fn metadata(&self) -> &Arc<dyn TypeMetadata> {
        &self.inner.metadata
    }

    pub fn config(&self) -> &MappingConfig {
        &self.inner.config
    }
}

struct ResolverInner {
    metadata: Arc<dyn TypeMetadata>,
    config: MappingConfig,
    cache: ResolutionCache,
}

impl ResolverInner {
    fn resolve(&self, path: &str, root: &TypeRef) -> MappingResult<PropertyPath> {
        if path.trim().is_empty() {
            log::error!("Property path must not be empty");
            return Err(MappingError::new(
                "Property path must not be empty",
                ErrorKind::InvalidInput,
            ));
        }

        // lexical failures never reach the cache
        check_syntax(path, root, self.config.max_segments())?;

        if self.config.cache_enabled() {
            self.cache
                .get_or_resolve(path, root, || self.resolve_uncached(path, root))
        } else {
            self.resolve_uncached(path, root)
        }
    }

    fn resolve_uncached(&self, path: &str, root: &TypeRef) -> MappingResult<PropertyPath> {
        let metadata = self.metadata.as_ref();
        if !metadata.has_type(root) {
            log::error!("Type '{}' is not known to the metadata facade", root);
            return Err(MappingError::new(
                &format!("Type '{}' is not known to the metadata facade", root),
                ErrorKind::InvalidInput,
            ));
        }

        let matcher = SegmentMatcher::new(metadata);
        let mut request = ResolutionRequest::new(path, root.clone());

        while !request.is_complete() {
            let remaining = request.remaining();
            match matcher.match_segment(remaining, &request.current_type) {
                Ok(found) => {
                    if found.remainder.len() >= remaining.len() {
                        log::error!("Resolution of '{}' made no progress", path);
                        return Err(MappingError::new(
                            &format!("Resolution of '{}' made no progress", path),
                            ErrorKind::InternalError,
                        ));
                    }
                    request.advance(found, metadata);
                }
                Err(failure) => {
                    let diagnostics = Diagnostics::new(
                        metadata,
                        self.config.max_suggestions(),
                        self.config.max_suggestion_distance(),
                    );
                    return Err(diagnostics.unknown_property(
                        &failure.token,
                        &request.current_type,
                        request.traversed(),
                    ));
                }
            }
        }

        request.into_path()
    }
}

/// State of one resolution, owned by the resolving call.
struct ResolutionRequest<'p> {
    path: &'p str,
    cursor: usize,
    current_type: TypeRef,
    resolved: SmallVec<[ResolvedSegment; 4]>,
}

impl<'p> ResolutionRequest<'p> {
    fn new(path: &'p str, root: TypeRef) -> Self {
        ResolutionRequest {
            path,
            cursor: 0,
            current_type: root,
            resolved: SmallVec::new(),
        }
    }

    fn is_complete(&self) -> bool {
        self.cursor >= self.path.len()
    }

    fn remaining(&self) -> &'p str {
        &self.path[self.cursor..]
    }

    fn advance(&mut self, found: SegmentMatch<'p>, metadata: &dyn TypeMetadata) {
        let declared = found.declared_type;
        let target = unwrap_container(&declared, metadata);

        log::trace!(
            "Resolved '{}' on '{}' to '{}'",
            found.name,
            self.current_type,
            target
        );

        self.resolved.push(ResolvedSegment {
            name: found.name,
            owning_type: self.current_type.clone(),
            raw_type: declared,
            target_type: target.clone(),
        });
        self.current_type = target;
        self.cursor = self.path.len() - found.remainder.len();
    }

    fn traversed(&self) -> Option<PropertyPath> {
        PropertyPath::from_segments(self.resolved.iter().cloned())
    }

    fn into_path(self) -> MappingResult<PropertyPath> {
        let path = self.path;
        PropertyPath::from_segments(self.resolved).ok_or_else(|| {
            log::error!("Resolution of '{}' produced no segment", path);
            MappingError::new(
                &format!("Resolution of '{}' produced no segment", path),
                ErrorKind::InternalError,
            )
        })
    }
}

/// Element type for collections and arrays, value type for maps.
fn unwrap_container(declared: &TypeRef, metadata: &dyn TypeMetadata) -> TypeRef {
    let unwrapped = if metadata.is_collection_like(declared) {
        metadata.element_type(declared)
    } else if metadata.is_array(declared) {
        metadata.component_type(declared)
    } else if metadata.is_map(declared) {
        metadata.map_value_type(declared)
    } else {
        None
    };
    unwrapped.unwrap_or_else(|| declared.clone())
}

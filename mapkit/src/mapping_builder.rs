use crate::errors::{MappingError, MappingResult};
use crate::mapping_config::MappingConfig;
use crate::mapping_context::MappingContext;
use crate::metadata::{Entity, TypeDescriptor, TypeRegistry};

/// Builder for a [`MappingContext`].
///
/// Configuration and registration errors are captured as they happen; the
/// first one is returned from [`build`](MappingContextBuilder::build) and
/// later calls are ignored.
///
/// # Examples
///
/// ```rust,ignore
/// use mapkit::MappingContext;
///
/// let context = MappingContext::builder()
///     .max_segments(64)
///     .register::<User>()
///     .build()?;
/// let path = context.resolve::<User>("addressCity")?;
/// ```
#[derive(Default)]
pub struct MappingContextBuilder {
    error: Option<MappingError>,
    config: MappingConfig,
    registry: TypeRegistry,
}

impl MappingContextBuilder {
    pub fn new() -> Self {
        MappingContextBuilder {
            error: None,
            config: MappingConfig::new(),
            registry: TypeRegistry::new(),
        }
    }

    /// Sets the maximum number of potential segments a path may have.
    pub fn max_segments(mut self, max_segments: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_segments(max_segments) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets how many suggestions a failed resolution reports at most.
    pub fn max_suggestions(mut self, max_suggestions: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_suggestions(max_suggestions) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the edit distance within which a property name is suggested.
    pub fn max_suggestion_distance(mut self, distance: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_suggestion_distance(distance) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_cache_enabled(enabled) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Registers an entity type and every type it references or embeds.
    pub fn register<T: Entity>(mut self) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.registry.register::<T>() {
                self.error = Some(e);
            }
        }
        self
    }

    /// Registers a hand-built descriptor, for types without `#[derive(Entity)]`.
    pub fn descriptor(mut self, descriptor: MappingResult<TypeDescriptor>) -> Self {
        if self.error.is_none() {
            if let Err(e) = descriptor.and_then(|d| self.registry.add_descriptor(d)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Freezes the configuration and creates the context.
    ///
    /// # Errors
    ///
    /// Returns the first error captured by an earlier call.
    pub fn build(self) -> MappingResult<MappingContext> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(MappingContext::new(self.config, self.registry))
    }
}

//! Configuration of a mapping context and its path resolver.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::{DEFAULT_MAX_SEGMENTS, DEFAULT_MAX_SUGGESTIONS, DEFAULT_MAX_SUGGESTION_DISTANCE};
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// Tunable limits of property path resolution.
///
/// Values can be changed until the owning [`MappingContext`](crate::mapping_context::MappingContext)
/// is built. After that every setter fails with `InvalidOperation`.
///
/// # Examples
///
/// ```rust
/// use mapkit::mapping_config::MappingConfig;
///
/// let config = MappingConfig::new();
/// config.set_max_segments(64).unwrap();
/// assert_eq!(config.max_segments(), 64);
/// ```
#[derive(Clone)]
pub struct MappingConfig {
    inner: Arc<MappingConfigInner>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingConfig {
    pub fn new() -> Self {
        MappingConfig {
            inner: Arc::new(MappingConfigInner::new()),
        }
    }

    /// Upper bound on the number of segments a path may resolve to.
    pub fn max_segments(&self) -> usize {
        self.inner.max_segments.load(Ordering::Relaxed)
    }

    /// Sets the segment bound.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized or if `max_segments` is zero.
    pub fn set_max_segments(&self, max_segments: usize) -> MappingResult<()> {
        self.inner.set_limit("Max segments", &self.inner.max_segments, max_segments)
    }

    /// Maximum number of "did you mean" suggestions in a diagnostic.
    pub fn max_suggestions(&self) -> usize {
        self.inner.max_suggestions.load(Ordering::Relaxed)
    }

    /// Sets the suggestion count.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized or if `max_suggestions` is zero.
    pub fn set_max_suggestions(&self, max_suggestions: usize) -> MappingResult<()> {
        self.inner.set_limit("Max suggestions", &self.inner.max_suggestions, max_suggestions)
    }

    /// Maximum edit distance between a failing token and a suggestion.
    pub fn max_suggestion_distance(&self) -> usize {
        self.inner.max_suggestion_distance.load(Ordering::Relaxed)
    }

    /// Sets the suggestion distance.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized or if `distance` is zero.
    pub fn set_max_suggestion_distance(&self, distance: usize) -> MappingResult<()> {
        self.inner.set_limit(
            "Max suggestion distance",
            &self.inner.max_suggestion_distance,
            distance,
        )
    }

    /// Whether resolved paths are memoized per (path, root type).
    pub fn cache_enabled(&self) -> bool {
        self.inner.cache_enabled.load(Ordering::Relaxed)
    }

    /// Turns the resolution cache on or off.
    ///
    /// # Errors
    ///
    /// Returns error if already initialized.
    pub fn set_cache_enabled(&self, enabled: bool) -> MappingResult<()> {
        self.inner.check_not_configured("Cache setting")?;
        self.inner.cache_enabled.store(enabled, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Freezes the configuration.
    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

struct MappingConfigInner {
    configured: AtomicBool,
    max_segments: AtomicUsize,
    max_suggestions: AtomicUsize,
    max_suggestion_distance: AtomicUsize,
    cache_enabled: AtomicBool,
}

impl MappingConfigInner {
    fn new() -> Self {
        MappingConfigInner {
            configured: AtomicBool::from(false),
            max_segments: AtomicUsize::from(DEFAULT_MAX_SEGMENTS),
            max_suggestions: AtomicUsize::from(DEFAULT_MAX_SUGGESTIONS),
            max_suggestion_distance: AtomicUsize::from(DEFAULT_MAX_SUGGESTION_DISTANCE),
            cache_enabled: AtomicBool::from(true),
        }
    }

    fn check_not_configured(&self, setting: &str) -> MappingResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after initialization", setting);
            return Err(MappingError::new(
                &format!("{} cannot be changed after initialization", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_limit(&self, setting: &str, slot: &AtomicUsize, value: usize) -> MappingResult<()> {
        self.check_not_configured(setting)?;
        if value == 0 {
            log::error!("{} must be greater than zero", setting);
            return Err(MappingError::new(
                &format!("{} must be greater than zero", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        slot.store(value, Ordering::Relaxed);
        Ok(())
    }
}

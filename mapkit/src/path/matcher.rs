use std::iter::once;

use crate::common::{uncapitalize, DOT_SEPARATOR};
use crate::metadata::{TypeMetadata, TypeRef};
use crate::path::syntax::{find_separator, unescape, word_boundaries};

/// The property matched at the head of a remaining path suffix.
#[derive(Debug)]
pub(crate) struct SegmentMatch<'r> {
    /// Declared name of the matched property.
    pub(crate) name: String,
    /// Declared type of the matched property, containers not unwrapped.
    pub(crate) declared_type: TypeRef,
    /// What is left of the suffix, separators already consumed.
    pub(crate) remainder: &'r str,
}

/// No property matched; `token` is the region that was searched.
#[derive(Debug)]
pub(crate) struct MatchFailure {
    pub(crate) token: String,
}

/// Finds the next property at the head of a path suffix.
///
/// Matching order for the current `.`-delimited component:
///
/// 1. the whole component, escapes collapsed, as one property name;
/// 2. otherwise the region up to the first single `_` is mandatory: the
///    match must lie inside it and end at a camelCase boundary or at the
///    region end, trying the longest candidate first.
///
/// A candidate names a property if it equals a declared name, or equals it
/// once its first character is lower-cased.
pub(crate) struct SegmentMatcher<'a> {
    metadata: &'a dyn TypeMetadata,
}

impl<'a> SegmentMatcher<'a> {
    pub(crate) fn new(metadata: &'a dyn TypeMetadata) -> Self {
        SegmentMatcher { metadata }
    }

    pub(crate) fn match_segment<'r>(
        &self,
        remaining: &'r str,
        current: &TypeRef,
    ) -> Result<SegmentMatch<'r>, MatchFailure> {
        let (component, after_component) = match remaining.find(DOT_SEPARATOR) {
            Some(index) => (&remaining[..index], Some(&remaining[index + 1..])),
            None => (remaining, None),
        };

        let separator = find_separator(component);
        if separator.is_some() {
            if let Some((name, declared_type)) = self.lookup(current, &unescape(component)) {
                log::trace!("'{}' matched whole on '{}'", component, current);
                return Ok(SegmentMatch {
                    name,
                    declared_type,
                    remainder: after_component.unwrap_or_default(),
                });
            }
        }

        let region = match separator {
            Some(index) => &component[..index],
            None => component,
        };

        let boundaries = word_boundaries(region);
        for end in once(region.len()).chain(boundaries.into_iter().rev()) {
            let candidate = unescape(&region[..end]);
            let Some((name, declared_type)) = self.lookup(current, &candidate) else {
                continue;
            };

            let remainder = if end < region.len() {
                &remaining[end..]
            } else if let Some(index) = separator {
                &remaining[index + 1..]
            } else {
                after_component.unwrap_or_default()
            };

            log::trace!(
                "'{}' matched property '{}' on '{}', remainder '{}'",
                candidate,
                name,
                current,
                remainder
            );
            return Ok(SegmentMatch {
                name,
                declared_type,
                remainder,
            });
        }

        Err(MatchFailure {
            token: unescape(region),
        })
    }

    fn lookup(&self, owner: &TypeRef, candidate: &str) -> Option<(String, TypeRef)> {
        if self.metadata.has_property(owner, candidate) {
            return self
                .metadata
                .property_type(owner, candidate)
                .map(|ty| (candidate.to_string(), ty));
        }

        let lowered = uncapitalize(candidate);
        if lowered != candidate && self.metadata.has_property(owner, &lowered) {
            return self
                .metadata
                .property_type(owner, &lowered)
                .map(|ty| (lowered, ty));
        }

        None
    }
}

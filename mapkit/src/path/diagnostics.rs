use itertools::Itertools;

use crate::errors::{ErrorKind, MappingError, PropertyReference};
use crate::metadata::{TypeMetadata, TypeRef};
use crate::path::PropertyPath;

/// Builds structured errors for failed resolutions.
pub(crate) struct Diagnostics<'a> {
    metadata: &'a dyn TypeMetadata,
    max_suggestions: usize,
    max_distance: usize,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(
        metadata: &'a dyn TypeMetadata,
        max_suggestions: usize,
        max_distance: usize,
    ) -> Self {
        Diagnostics {
            metadata,
            max_suggestions,
            max_distance,
        }
    }

    /// Error for a token that names no property of `searched_type`.
    pub(crate) fn unknown_property(
        &self,
        token: &str,
        searched_type: &TypeRef,
        traversed: Option<PropertyPath>,
    ) -> MappingError {
        let candidates = self.metadata.property_names(searched_type);
        let suggestions = suggest(token, &candidates, self.max_distance, self.max_suggestions);

        let mut message = format!(
            "No property '{}' found for type '{}'.",
            token, searched_type
        );
        if !suggestions.is_empty() {
            let hint = suggestions.iter().map(|s| format!("'{}'", s)).join(", ");
            message.push_str(&format!(" Did you mean {}?", hint));
        }
        if let Some(traversed) = &traversed {
            message.push_str(&format!(
                " Traversed path: {}.{}.",
                traversed.owning_type(),
                traversed.to_dot_path()
            ));
        }

        log::debug!("{}", message);
        MappingError::new_with_reference(
            &message,
            ErrorKind::UnknownProperty,
            PropertyReference::new(token, searched_type.clone(), traversed, suggestions),
        )
    }
}

/// Error for a malformed token, raised before any metadata lookup.
pub(crate) fn invalid_token(token: &str, root: &TypeRef, reason: &str) -> MappingError {
    let message = format!(
        "Invalid property token '{}' for type '{}': {}",
        token, root, reason
    );
    log::debug!("{}", message);
    MappingError::new_with_reference(
        &message,
        ErrorKind::InvalidToken,
        PropertyReference::new(token, root.clone(), None, Vec::new()),
    )
}

pub(crate) fn path_too_long(segments: usize, max_segments: usize) -> MappingError {
    let message = format!(
        "Property path has more than {} segments (counted {} before giving up)",
        max_segments, segments
    );
    log::debug!("{}", message);
    MappingError::new(&message, ErrorKind::PathTooLong)
}

/// Picks the candidates closest to `token`, case-insensitively.
///
/// Only candidates within `max_distance` edits are kept. The result is
/// ordered by distance, then by name, and holds at most `limit` names.
pub fn suggest(token: &str, candidates: &[String], max_distance: usize, limit: usize) -> Vec<String> {
    let token = token.to_lowercase();
    candidates
        .iter()
        .filter_map(|candidate| {
            let distance = edit_distance(&token, &candidate.to_lowercase());
            (distance <= max_distance).then_some((distance, candidate))
        })
        .sorted()
        .take(limit)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

/// Levenshtein distance over chars, two rows.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

//! Lexical rules of property paths.
//!
//! A path is split into components by `.`, and each component into pieces by
//! single `_` separators. A doubled `__` is an escaped underscore and stays
//! inside its piece. Inside a piece, a lower-case letter or digit followed by
//! an upper-case letter is a camelCase word boundary.

use regex::Regex;
use std::sync::LazyLock;

use crate::common::{DOT_SEPARATOR, ESCAPED_UNDERSCORE, UNDERSCORE_SEPARATOR};
use crate::errors::MappingResult;
use crate::metadata::TypeRef;
use crate::path::diagnostics::{invalid_token, path_too_long};

static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_$]+$").expect("component pattern is valid"));

/// Validates `path` without consulting any metadata and returns the upper
/// bound of the number of segments it can resolve to.
///
/// Fails with `PathTooLong` as soon as the bound exceeds `max_segments`, and
/// with `InvalidToken` on empty pieces, leading or trailing separators,
/// digit-led pieces and disallowed characters.
pub(crate) fn check_syntax(path: &str, root: &TypeRef, max_segments: usize) -> MappingResult<usize> {
    let mut segments = 0usize;

    for component in path.split(DOT_SEPARATOR) {
        if component.is_empty() {
            return Err(invalid_token(path, root, "contains an empty segment"));
        }

        if !COMPONENT_PATTERN.is_match(component) {
            return Err(invalid_token(component, root, "contains characters that are not allowed"));
        }

        let mut rest = component;
        loop {
            let (piece, next) = match find_separator(rest) {
                Some(index) => (&rest[..index], Some(&rest[index + 1..])),
                None => (rest, None),
            };

            if piece.is_empty() {
                return Err(invalid_token(
                    component,
                    root,
                    "starts or ends with a separator",
                ));
            }

            if piece.starts_with(|c: char| c.is_numeric()) {
                return Err(invalid_token(&unescape(piece), root, "starts with a digit"));
            }

            segments += 1 + word_boundaries(piece).len();
            if segments > max_segments {
                return Err(path_too_long(segments, max_segments));
            }

            match next {
                Some(next) => rest = next,
                None => break,
            }
        }
    }

    Ok(segments)
}

/// Collapses every escaped `__` into a literal `_`.
pub(crate) fn unescape(raw: &str) -> String {
    if raw.contains(ESCAPED_UNDERSCORE) {
        raw.replace(ESCAPED_UNDERSCORE, "_")
    } else {
        raw.to_string()
    }
}

/// Byte index of the first single `_` separator, skipping escaped `__`.
pub(crate) fn find_separator(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    let separator = UNDERSCORE_SEPARATOR as u8;
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == separator {
            if bytes.get(index + 1) == Some(&separator) {
                index += 2;
                continue;
            }
            return Some(index);
        }
        index += 1;
    }
    None
}

/// Byte indices at which a camelCase word starts, in ascending order.
pub(crate) fn word_boundaries(raw: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut previous: Option<char> = None;
    for (index, c) in raw.char_indices() {
        if let Some(prev) = previous {
            if c.is_uppercase() && (prev.is_lowercase() || prev.is_numeric()) {
                boundaries.push(index);
            }
        }
        previous = Some(c);
    }
    boundaries
}

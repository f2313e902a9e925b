//! Property path resolution.
//!
//! A property path is a string such as `"userAddressCity"`,
//! `"user_address.city"` or `"user.address.city"` that names a chain of
//! nested properties starting at a root type. Resolution turns it into a
//! [`PropertyPath`] by consulting a [`TypeMetadata`](crate::metadata::TypeMetadata).
//!
//! Segmentation rules:
//!
//! * `.` always separates segments.
//! * A single `_` separates segments unless the whole `.`-delimited
//!   component names a property, in which case the literal name wins.
//! * `__` is an escaped `_` and never separates.
//! * Inside a piece, the longest prefix that names a property is taken,
//!   cutting only at camelCase word boundaries. A capitalized candidate
//!   also matches its uncapitalized property name.
//! * Each hop unwraps one level of collection, array or map (value side).
//!
//! A matched segment is never revisited; if what follows it cannot be
//! resolved, resolution fails with a diagnostic.

mod cache;
mod diagnostics;
mod matcher;
mod property_path;
mod resolver;
mod syntax;

pub use cache::*;
pub use diagnostics::suggest;
pub use property_path::{PathIter, PropertyPath};
pub use resolver::*;

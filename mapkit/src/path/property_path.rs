use itertools::Itertools;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::common::{ESCAPED_UNDERSCORE, UNDERSCORE_SEPARATOR};
use crate::metadata::TypeRef;

/// One resolved hop, before it is linked into a [`PropertyPath`].
#[derive(Clone, Debug)]
pub(crate) struct ResolvedSegment {
    pub(crate) name: String,
    pub(crate) owning_type: TypeRef,
    pub(crate) raw_type: TypeRef,
    pub(crate) target_type: TypeRef,
}

/// An immutable, resolved chain of property references.
///
/// A `PropertyPath` is the head of a singly linked list of segments. Every
/// segment names exactly one declared property on exactly one type, and the
/// owning type of a segment is the target type of the one before it. Target
/// types are already unwrapped: a segment over `Vec<Order>` targets `Order`,
/// while [`raw_type`](PropertyPath::raw_type) keeps the declared container.
///
/// Chains are reference counted and cheap to clone. Equality and hashing use
/// the pair (dot path, root type).
///
/// # Examples
///
/// ```rust,ignore
/// let path = context.resolve::<User>("addressCity")?;
/// assert_eq!(path.segment(), "address");
/// assert_eq!(path.leaf().segment(), "city");
/// assert_eq!(path.to_dot_path(), "address.city");
/// ```
#[derive(Clone)]
pub struct PropertyPath {
    inner: Arc<PathNode>,
}

struct PathNode {
    segment: ResolvedSegment,
    next: Option<PropertyPath>,
}

impl PropertyPath {
    /// Links resolved segments root to leaf. Returns `None` for no segments.
    pub(crate) fn from_segments<I>(segments: I) -> Option<PropertyPath>
    where
        I: IntoIterator<Item = ResolvedSegment>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut next: Option<PropertyPath> = None;
        for segment in segments.into_iter().rev() {
            next = Some(PropertyPath {
                inner: Arc::new(PathNode { segment, next }),
            });
        }
        next
    }

    /// The declared property name of this segment.
    pub fn segment(&self) -> &str {
        &self.inner.segment.name
    }

    pub fn has_next(&self) -> bool {
        self.inner.next.is_some()
    }

    pub fn next(&self) -> Option<&PropertyPath> {
        self.inner.next.as_ref()
    }

    /// The last segment of the chain.
    pub fn leaf(&self) -> &PropertyPath {
        let mut current = self;
        while let Some(next) = current.next() {
            current = next;
        }
        current
    }

    /// The type on which this segment was matched.
    pub fn owning_type(&self) -> &TypeRef {
        &self.inner.segment.owning_type
    }

    /// The type resolution continues with, after container unwrapping.
    pub fn target_type(&self) -> &TypeRef {
        &self.inner.segment.target_type
    }

    /// The declared type of the property, containers not unwrapped.
    pub fn raw_type(&self) -> &TypeRef {
        &self.inner.segment.raw_type
    }

    pub fn is_collection(&self) -> bool {
        self.raw_type().is_collection_like()
    }

    pub fn is_map(&self) -> bool {
        self.raw_type().is_map()
    }

    pub fn is_array(&self) -> bool {
        self.raw_type().is_array()
    }

    /// Number of segments from this one to the leaf.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a chain holds at least one segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Segment names joined with `.`, from this segment to the leaf.
    ///
    /// Names that would not parse back as themselves, such as `_id`, have
    /// their underscores escaped as `__`.
    pub fn to_dot_path(&self) -> String {
        self.iter()
            .map(|path| escape_name(&path.inner.segment.name))
            .join(".")
    }

    /// Iterates the chain root to leaf. Each item is the sub-chain starting
    /// at that segment.
    pub fn iter(&self) -> PathIter<'_> {
        PathIter {
            current: Some(self),
        }
    }

    /// Returns true if both handles point at the same chain instance.
    pub fn ptr_eq(&self, other: &PropertyPath) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for PropertyPath {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.owning_type() == other.owning_type()
                && self.to_dot_path() == other.to_dot_path())
    }
}

impl Eq for PropertyPath {}

impl Hash for PropertyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owning_type().hash(state);
        self.to_dot_path().hash(state);
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dot_path())
    }
}

impl Debug for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owning_type(), self.to_dot_path())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropertyPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_dot_path())
    }
}

fn escape_name(name: &str) -> Cow<'_, str> {
    let needs_escape = name.contains(UNDERSCORE_SEPARATOR)
        && name
            .split(UNDERSCORE_SEPARATOR)
            .any(|piece| piece.is_empty() || piece.starts_with(|c: char| c.is_numeric()));
    if needs_escape {
        Cow::Owned(name.replace(UNDERSCORE_SEPARATOR, ESCAPED_UNDERSCORE))
    } else {
        Cow::Borrowed(name)
    }
}

/// Root-to-leaf iterator over a [`PropertyPath`].
pub struct PathIter<'a> {
    current: Option<&'a PropertyPath>,
}

impl<'a> Iterator for PathIter<'a> {
    type Item = &'a PropertyPath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.next();
        Some(current)
    }
}

impl<'a> IntoIterator for &'a PropertyPath {
    type Item = &'a PropertyPath;
    type IntoIter = PathIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, owner: &str, raw: TypeRef) -> ResolvedSegment {
        ResolvedSegment {
            name: name.to_string(),
            owning_type: TypeRef::named(owner),
            target_type: raw.actual_type().clone(),
            raw_type: raw,
        }
    }

    fn user_orders_total() -> PropertyPath {
        PropertyPath::from_segments(vec![
            segment("orders", "User", TypeRef::collection(TypeRef::named("Order"))),
            segment("total", "Order", TypeRef::named("f64")),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_segments_links_in_order() {
        let path = user_orders_total();
        assert_eq!(path.segment(), "orders");
        assert!(path.has_next());
        let next = path.next().unwrap();
        assert_eq!(next.segment(), "total");
        assert!(!next.has_next());
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_from_no_segments_is_none() {
        assert!(PropertyPath::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn test_owner_of_next_is_target_of_current() {
        let path = user_orders_total();
        assert_eq!(path.target_type(), path.next().unwrap().owning_type());
        assert_eq!(path.target_type(), &TypeRef::named("Order"));
        assert!(path.is_collection());
        assert!(!path.is_map());
        assert!(!path.is_array());
    }

    #[test]
    fn test_leaf_and_dot_path() {
        let path = user_orders_total();
        assert_eq!(path.leaf().segment(), "total");
        assert_eq!(path.to_dot_path(), "orders.total");
        assert_eq!(path.leaf().to_dot_path(), "total");
        assert_eq!(path.to_string(), "orders.total");
        assert_eq!(format!("{:?}", path), "User.orders.total");
    }

    #[test]
    fn test_dot_path_escapes_unparseable_names() {
        let path = PropertyPath::from_segments(vec![
            segment("_id", "Account", TypeRef::named("String")),
        ])
        .unwrap();
        assert_eq!(path.to_dot_path(), "__id");

        assert_eq!(escape_name("user_name"), "user_name");
        assert_eq!(escape_name("line_2"), "line__2");
        assert_eq!(escape_name("a__b"), "a____b");
        assert_eq!(escape_name("plain"), "plain");
    }

    #[test]
    fn test_iter_is_restartable() {
        let path = user_orders_total();
        let first: Vec<_> = path.iter().map(|p| p.segment().to_string()).collect();
        let second: Vec<_> = (&path).into_iter().map(|p| p.segment().to_string()).collect();
        assert_eq!(first, vec!["orders", "total"]);
        assert_eq!(first, second);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_as_dot_path() {
        let json = serde_json::to_string(&user_orders_total()).unwrap();
        assert_eq!(json, r#""orders.total""#);
    }

    #[test]
    fn test_structural_equality() {
        let a = user_orders_total();
        let b = user_orders_total();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert!(a.ptr_eq(&a.clone()));
        assert_ne!(a, *a.next().unwrap());
    }
}

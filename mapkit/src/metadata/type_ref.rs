use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Structural shape of a type as seen by the metadata layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// A plain named type such as `String` or `Address`.
    Named(String),
    /// A sequence or set of elements (`Vec<T>`, `HashSet<T>`, ...).
    Collection(TypeRef),
    /// A fixed or boxed array of components (`[T; N]`, `Box<[T]>`).
    Array(TypeRef),
    /// A map from keys to values. Only the value type is navigable.
    Map { key: TypeRef, value: TypeRef },
}

/// A cheap-to-clone handle to a type known to the metadata facade.
///
/// Two handles are equal when their shapes are equal, so a `TypeRef` can be
/// rebuilt from a type name at any time and still compare equal to the one
/// stored in a [`TypeDescriptor`](crate::metadata::TypeDescriptor).
///
/// # Examples
///
/// ```rust
/// use mapkit::metadata::TypeRef;
///
/// let users = TypeRef::collection(TypeRef::named("User"));
/// assert!(users.is_collection_like());
/// assert_eq!(users.element_type(), Some(&TypeRef::named("User")));
/// assert_eq!(users.to_string(), "Collection<User>");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    inner: Arc<TypeShape>,
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef {
            inner: Arc::new(TypeShape::Named(name.to_string())),
        }
    }

    pub fn collection(element: TypeRef) -> Self {
        TypeRef {
            inner: Arc::new(TypeShape::Collection(element)),
        }
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef {
            inner: Arc::new(TypeShape::Array(component)),
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef {
            inner: Arc::new(TypeShape::Map { key, value }),
        }
    }

    pub fn shape(&self) -> &TypeShape {
        &self.inner
    }

    /// Returns the name of a named type, `None` for containers.
    pub fn name(&self) -> Option<&str> {
        match self.shape() {
            TypeShape::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_collection_like(&self) -> bool {
        matches!(self.shape(), TypeShape::Collection(_))
    }

    pub fn element_type(&self) -> Option<&TypeRef> {
        match self.shape() {
            TypeShape::Collection(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape(), TypeShape::Array(_))
    }

    pub fn component_type(&self) -> Option<&TypeRef> {
        match self.shape() {
            TypeShape::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self.shape(), TypeShape::Map { .. })
    }

    pub fn map_key_type(&self) -> Option<&TypeRef> {
        match self.shape() {
            TypeShape::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn map_value_type(&self) -> Option<&TypeRef> {
        match self.shape() {
            TypeShape::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Unwraps exactly one level of container nesting.
    ///
    /// Collections yield their element type, arrays their component type and
    /// maps their value type. Named types are returned unchanged.
    pub fn actual_type(&self) -> &TypeRef {
        match self.shape() {
            TypeShape::Named(_) => self,
            TypeShape::Collection(element) => element,
            TypeShape::Array(component) => component,
            TypeShape::Map { value, .. } => value,
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.shape() {
            TypeShape::Named(name) => write!(f, "{}", name),
            TypeShape::Collection(element) => write!(f, "Collection<{}>", element),
            TypeShape::Array(component) => write!(f, "{}[]", component),
            TypeShape::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
        }
    }
}

impl Debug for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeRef({})", self)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::named(name)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_type() {
        let ty = TypeRef::named("Address");
        assert_eq!(ty.name(), Some("Address"));
        assert!(!ty.is_collection_like());
        assert!(!ty.is_array());
        assert!(!ty.is_map());
        assert_eq!(ty.actual_type(), &ty);
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(TypeRef::named("User"), TypeRef::from("User"));
        assert_ne!(
            TypeRef::collection(TypeRef::named("User")),
            TypeRef::array(TypeRef::named("User"))
        );
    }

    #[test]
    fn test_collection_unwraps_element() {
        let ty = TypeRef::collection(TypeRef::named("FooBar"));
        assert!(ty.is_collection_like());
        assert_eq!(ty.element_type(), Some(&TypeRef::named("FooBar")));
        assert_eq!(ty.actual_type(), &TypeRef::named("FooBar"));
        assert_eq!(ty.name(), None);
    }

    #[test]
    fn test_map_unwraps_value_not_key() {
        let ty = TypeRef::map(TypeRef::named("String"), TypeRef::named("Bar"));
        assert!(ty.is_map());
        assert_eq!(ty.map_key_type(), Some(&TypeRef::named("String")));
        assert_eq!(ty.map_value_type(), Some(&TypeRef::named("Bar")));
        assert_eq!(ty.actual_type(), &TypeRef::named("Bar"));
    }

    #[test]
    fn test_actual_type_unwraps_one_level_only() {
        let inner = TypeRef::collection(TypeRef::named("Foo"));
        let ty = TypeRef::array(inner.clone());
        assert_eq!(ty.component_type(), Some(&inner));
        assert_eq!(ty.actual_type(), &inner);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeRef::named("User").to_string(), "User");
        assert_eq!(TypeRef::array(TypeRef::named("u8")).to_string(), "u8[]");
        assert_eq!(
            TypeRef::map(TypeRef::named("String"), TypeRef::named("User")).to_string(),
            "Map<String, User>"
        );
        assert_eq!(format!("{:?}", TypeRef::named("User")), "TypeRef(User)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_as_display() {
        let ty = TypeRef::collection(TypeRef::named("User"));
        assert_eq!(serde_json::to_string(&ty).unwrap(), r#""Collection<User>""#);
    }
}

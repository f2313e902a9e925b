//! Type metadata: what properties a type declares and what their types are.
//!
//! The path resolver never inspects types itself. It asks a [`TypeMetadata`]
//! implementation, which by default is the [`TypeRegistry`] filled from
//! `#[derive(Entity)]` descriptors.

mod descriptor;
mod entity;
mod registry;
mod type_ref;

pub use descriptor::*;
pub use entity::*;
pub use registry::*;
pub use type_ref::*;

/// Read-only view of type metadata consumed by the path resolver.
///
/// Implementations must be immutable for the lifetime of any resolution:
/// a type's property set is not expected to change once it is visible.
///
/// The container queries have default implementations based on the shape of
/// the [`TypeRef`]; implementations only need to answer property questions.
pub trait TypeMetadata: Send + Sync {
    /// Returns true if the facade knows `ty` as a root or owner type.
    fn has_type(&self, ty: &TypeRef) -> bool;

    /// Returns true if `owner` declares a navigable property called `name`.
    fn has_property(&self, owner: &TypeRef, name: &str) -> bool;

    /// Declared type of the property, before any container unwrapping.
    fn property_type(&self, owner: &TypeRef, name: &str) -> Option<TypeRef>;

    /// Names of the navigable properties of `owner`, used for suggestions.
    fn property_names(&self, owner: &TypeRef) -> Vec<String>;

    fn is_collection_like(&self, ty: &TypeRef) -> bool {
        ty.is_collection_like()
    }

    fn element_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        ty.element_type().cloned()
    }

    fn is_map(&self, ty: &TypeRef) -> bool {
        ty.is_map()
    }

    fn map_value_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        ty.map_value_type().cloned()
    }

    fn is_array(&self, ty: &TypeRef) -> bool {
        ty.is_array()
    }

    fn component_type(&self, ty: &TypeRef) -> Option<TypeRef> {
        ty.component_type().cloned()
    }
}

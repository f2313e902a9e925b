use crate::errors::MappingResult;
use crate::metadata::{TypeDescriptor, TypeRef, TypeRegistry};

/// Trait that exposes the metadata of a domain type.
///
/// # Purpose
/// Describes the declared properties of a struct so it can be registered
/// in a [`TypeRegistry`] and used as the root of property paths.
/// Implemented automatically by `#[derive(Entity)]`.
///
/// # Usage
/// ```ignore
/// #[derive(Entity)]
/// #[entity(id(field = "id"), rename_all = "camelCase")]
/// pub struct User {
///     id: u64,
///     user_name: String,
///     #[property(embedded)]
///     address: Address,
///     #[property(reference)]
///     orders: Vec<Order>,
/// }
/// ```
pub trait Entity {
    /// Handle under which the type is registered.
    fn type_ref() -> TypeRef;

    /// Builds the descriptor of this type.
    fn type_descriptor() -> MappingResult<TypeDescriptor>;

    /// Registers the entity types reachable from this one (embedded and
    /// referenced properties). Called once after the type itself has been
    /// registered, so cyclic references terminate.
    fn register_related(_registry: &TypeRegistry) -> MappingResult<()> {
        Ok(())
    }
}

#![recursion_limit = "128"]
//! # Mapkit Derive Macros
//!
//! This crate provides the `Entity` derive macro, which describes a struct
//! to the mapkit type registry.
//!
//! ## Struct attributes
//!
//! - `#[entity(name = "...")]` - external entity name, defaults to the type name
//! - `#[entity(id(field = "..."))]` - marks a field as the identifier
//! - `#[entity(rename_all = "camelCase" | "snake_case")]` - property naming
//!
//! ## Field attributes
//!
//! - `#[property(name = "...")]` - explicit property name
//! - `#[property(id)]` - marks the field as the identifier
//! - `#[property(transient)]` - declared but never navigable
//! - `#[property(reference)]` - association to another entity, registered along
//! - `#[property(embedded)]` - nested entity, registered along
//!
//! # Examples
//!
//! ```rust,ignore
//! use mapkit_derive::Entity;
//!
//! #[derive(Entity)]
//! #[entity(name = "users", id(field = "id"), rename_all = "camelCase")]
//! pub struct User {
//!     pub id: u64,
//!     pub user_name: String,
//!     #[property(embedded)]
//!     pub address: Address,
//!     #[property(reference)]
//!     pub orders: Vec<Order>,
//!     #[property(transient)]
//!     pub session: Option<String>,
//! }
//! ```

extern crate proc_macro;
mod entity;

use crate::entity::generate_entity_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Entity` trait for a struct with named fields.
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum, a union, a tuple struct or a unit struct
/// - An attribute is unknown or malformed
/// - The id field named in `#[entity(id(field = ...))]` does not exist
/// - More than one field is marked as identifier
/// - A field type cannot be described (tuples, function pointers, ...)
#[proc_macro_derive(Entity, attributes(entity, property))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => e.to_compile_error().into(),
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for enums. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for unions. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
    }
}

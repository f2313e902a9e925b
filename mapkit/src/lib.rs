//! # Mapkit - Entity metadata and property path resolution
//!
//! Mapkit describes the structure of domain types (which properties they
//! declare, which one is the identifier, which ones are associations) and
//! resolves query-method style property paths such as `"userAddressCity"`
//! or `"user_address.city"` into validated chains of property references.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mapkit::MappingContext;
//! use mapkit_derive::Entity;
//!
//! #[derive(Entity)]
//! #[entity(id(field = "id"), rename_all = "camelCase")]
//! struct User {
//!     id: u64,
//!     user_name: String,
//!     #[property(embedded)]
//!     address: Address,
//! }
//!
//! #[derive(Entity)]
//! struct Address {
//!     city: String,
//! }
//!
//! let context = MappingContext::builder().register::<User>().build()?;
//!
//! let path = context.resolve::<User>("addressCity")?;
//! assert_eq!(path.to_dot_path(), "address.city");
//!
//! let err = context.resolve::<User>("userAme").unwrap_err();
//! assert!(err.suggestions().contains(&"userName".to_string()));
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Shared constants and lock helpers
//! - [`errors`] - Error types and result definitions
//! - [`metadata`] - Type references, descriptors, the registry and the `Entity` trait
//! - [`path`] - Property path resolution, caching and diagnostics
//! - [`mapping_config`] - Resolution limits
//! - [`mapping_builder`] - Builder of a mapping context
//! - [`mapping_context`] - Registry and resolver bundled together

pub mod common;
pub mod errors;
pub mod mapping_builder;
pub mod mapping_config;
pub mod mapping_context;
pub mod metadata;
pub mod path;

pub use errors::{ErrorKind, MappingError, MappingResult};
pub use mapping_builder::MappingContextBuilder;
pub use mapping_config::MappingConfig;
pub use mapping_context::MappingContext;
pub use path::PropertyPath;

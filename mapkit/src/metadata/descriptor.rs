use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::TypeRef;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").expect("name pattern is valid")
});

/// Describes one declared property of a type.
///
/// # Usage
/// ```rust
/// use mapkit::metadata::{PropertyDescriptor, TypeRef};
///
/// let orders = PropertyDescriptor::new("orders", TypeRef::collection(TypeRef::named("Order")))
///     .association();
/// assert!(orders.is_association());
/// assert!(!orders.is_id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    type_ref: TypeRef,
    is_id: bool,
    is_association: bool,
    is_transient: bool,
}

impl PropertyDescriptor {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        PropertyDescriptor {
            name: name.to_string(),
            type_ref,
            is_id: false,
            is_association: false,
            is_transient: false,
        }
    }

    /// Marks the property as the identifier of its owning type.
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// Marks the property as a reference to another entity.
    pub fn association(mut self) -> Self {
        self.is_association = true;
        self
    }

    /// Marks the property as not persistent. Transient properties are kept
    /// for introspection but are never navigable through a property path.
    pub fn transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type, before any container unwrapping.
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn is_id(&self) -> bool {
        self.is_id
    }

    pub fn is_association(&self) -> bool {
        self.is_association
    }

    pub fn is_transient(&self) -> bool {
        self.is_transient
    }
}

/// Metadata about one type: its properties in declaration order, its
/// identifier and its associations.
///
/// Descriptors are immutable once built. They are produced either by
/// `#[derive(Entity)]` or by hand through [`TypeDescriptor::builder`].
///
/// # Usage
/// ```rust
/// use mapkit::metadata::{PropertyDescriptor, TypeDescriptor, TypeRef};
///
/// let user = TypeDescriptor::builder("User")
///     .property(PropertyDescriptor::new("id", TypeRef::named("u64")).id())
///     .property(PropertyDescriptor::new("userName", TypeRef::named("String")))
///     .build()
///     .unwrap();
///
/// assert_eq!(user.id_property().map(|p| p.name()), Some("id"));
/// assert!(user.has_property("userName"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    type_ref: TypeRef,
    entity_name: String,
    properties: IndexMap<String, PropertyDescriptor>,
    id_property: Option<String>,
}

impl TypeDescriptor {
    pub fn builder(type_name: &str) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(type_name)
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn type_name(&self) -> &str {
        self.type_ref.name().unwrap_or_default()
    }

    /// The external name of the entity, defaults to the type name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Looks up a declared property, transient or not.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// All declared properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Returns true if `name` is a navigable (non-transient) property.
    pub fn has_property(&self, name: &str) -> bool {
        self.navigable_property(name).is_some()
    }

    pub fn navigable_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name).filter(|p| !p.is_transient())
    }

    /// Names of all navigable properties in declaration order.
    pub fn property_names(&self) -> Vec<String> {
        self.properties
            .values()
            .filter(|p| !p.is_transient())
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.id_property
            .as_ref()
            .and_then(|name| self.properties.get(name))
    }

    pub fn associations(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values().filter(|p| p.is_association())
    }
}

/// Builder for [`TypeDescriptor`].
///
/// Validation happens in [`build`](TypeDescriptorBuilder::build): names must
/// be identifiers, property names must be unique, and at most one property
/// may be the identifier.
pub struct TypeDescriptorBuilder {
    type_name: String,
    entity_name: Option<String>,
    id_field: Option<String>,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptorBuilder {
    fn new(type_name: &str) -> Self {
        TypeDescriptorBuilder {
            type_name: type_name.to_string(),
            entity_name: None,
            id_field: None,
            properties: Vec::new(),
        }
    }

    pub fn entity_name(mut self, entity_name: &str) -> Self {
        self.entity_name = Some(entity_name.to_string());
        self
    }

    /// Marks an already declared (or later declared) property as identifier.
    pub fn id_field(mut self, field_name: &str) -> Self {
        self.id_field = Some(field_name.to_string());
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> MappingResult<TypeDescriptor> {
        if !NAME_PATTERN.is_match(&self.type_name) {
            log::error!("Invalid type name '{}'", self.type_name);
            return Err(MappingError::new(
                &format!("Invalid type name '{}'", self.type_name),
                ErrorKind::InvalidMetadata,
            ));
        }

        let mut properties = IndexMap::with_capacity(self.properties.len());
        let mut id_property: Option<String> = None;

        for mut property in self.properties {
            if !NAME_PATTERN.is_match(property.name()) {
                log::error!(
                    "Invalid property name '{}' on type '{}'",
                    property.name(),
                    self.type_name
                );
                return Err(MappingError::new(
                    &format!(
                        "Invalid property name '{}' on type '{}'",
                        property.name(),
                        self.type_name
                    ),
                    ErrorKind::InvalidMetadata,
                ));
            }

            if self.id_field.as_deref() == Some(property.name()) {
                property.is_id = true;
            }

            if property.is_id() {
                if let Some(existing) = &id_property {
                    log::error!(
                        "Type '{}' declares multiple id properties: '{}' and '{}'",
                        self.type_name,
                        existing,
                        property.name()
                    );
                    return Err(MappingError::new(
                        &format!(
                            "Type '{}' declares multiple id properties: '{}' and '{}'",
                            self.type_name,
                            existing,
                            property.name()
                        ),
                        ErrorKind::InvalidMetadata,
                    ));
                }
                id_property = Some(property.name().to_string());
            }

            let name = property.name().to_string();
            if properties.insert(name.clone(), property).is_some() {
                log::error!(
                    "Property '{}' declared more than once on type '{}'",
                    name,
                    self.type_name
                );
                return Err(MappingError::new(
                    &format!(
                        "Property '{}' declared more than once on type '{}'",
                        name, self.type_name
                    ),
                    ErrorKind::InvalidMetadata,
                ));
            }
        }

        if let Some(id_field) = &self.id_field {
            if !properties.contains_key(id_field) {
                log::error!(
                    "Id field '{}' not found on type '{}'",
                    id_field,
                    self.type_name
                );
                return Err(MappingError::new(
                    &format!("Id field '{}' not found on type '{}'", id_field, self.type_name),
                    ErrorKind::InvalidMetadata,
                ));
            }
        }

        let entity_name = self.entity_name.unwrap_or_else(|| self.type_name.clone());
        Ok(TypeDescriptor {
            type_ref: TypeRef::named(&self.type_name),
            entity_name,
            properties,
            id_property,
        })
    }
}

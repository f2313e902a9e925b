use mapkit::metadata::{Entity, TypeMetadata, TypeRef, TypeRegistry};
use mapkit_derive::Entity;
use mapkit_int_test::model::{Account, Address, Order, User};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_type_ref_and_entity_name() {
    assert_eq!(User::type_ref(), TypeRef::named("User"));

    let descriptor = User::type_descriptor().unwrap();
    assert_eq!(descriptor.type_name(), "User");
    assert_eq!(descriptor.entity_name(), "users");

    let descriptor = Address::type_descriptor().unwrap();
    assert_eq!(descriptor.entity_name(), "Address");
}

#[test]
fn test_camel_case_properties_in_declaration_order() {
    let descriptor = User::type_descriptor().unwrap();
    let names: Vec<&str> = descriptor.properties().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec!["id", "userName", "firstName", "address", "orders", "friends"]
    );
}

#[test]
fn test_id_from_struct_attribute() {
    let descriptor = Order::type_descriptor().unwrap();
    let id = descriptor.id_property().unwrap();
    assert_eq!(id.name(), "orderId");
    assert!(id.is_id());
}

#[test]
fn test_id_with_renamed_property() {
    let descriptor = Account::type_descriptor().unwrap();
    assert_eq!(descriptor.id_property().map(|p| p.name()), Some("_id"));
    assert!(descriptor.has_property("user_name"));
}

#[test]
fn test_field_type_mapping() {
    let user = User::type_descriptor().unwrap();
    assert_eq!(
        user.property("orders").unwrap().type_ref(),
        &TypeRef::collection(TypeRef::named("Order"))
    );
    assert_eq!(
        user.property("friends").unwrap().type_ref(),
        &TypeRef::collection(TypeRef::named("User"))
    );

    let address = Address::type_descriptor().unwrap();
    assert_eq!(
        address.property("location").unwrap().type_ref(),
        &TypeRef::named("Location")
    );

    let order = Order::type_descriptor().unwrap();
    assert_eq!(
        order.property("customer").unwrap().type_ref(),
        &TypeRef::named("User")
    );

    let account = Account::type_descriptor().unwrap();
    assert_eq!(
        account.property("settings").unwrap().type_ref(),
        &TypeRef::map(TypeRef::named("String"), TypeRef::named("Setting"))
    );
    assert_eq!(
        account.property("scores").unwrap().type_ref(),
        &TypeRef::array(TypeRef::named("u32"))
    );
    assert_eq!(
        account.property("history").unwrap().type_ref(),
        &TypeRef::array(TypeRef::named("Snapshot"))
    );
}

#[test]
fn test_associations_and_transient() {
    let user = User::type_descriptor().unwrap();
    let associations: Vec<&str> = user.associations().map(|p| p.name()).collect();
    assert_eq!(associations, vec!["orders", "friends"]);
    assert!(!user.property("address").unwrap().is_association());

    let account = Account::type_descriptor().unwrap();
    let session = account.property("session_token").unwrap();
    assert!(session.is_transient());
    assert!(!account.has_property("session_token"));
    assert!(!account.property_names().contains(&"session_token".to_string()));
}

#[test]
fn test_register_follows_references_and_cycles() {
    let registry = TypeRegistry::new();
    registry.register::<User>().unwrap();

    assert_eq!(
        registry.type_names(),
        vec!["Address", "LineItem", "Location", "Order", "User"]
    );
    assert!(registry.has_property(&TypeRef::named("LineItem"), "productName"));
}

#[test]
fn test_register_is_idempotent() {
    let registry = TypeRegistry::new();
    registry.register::<User>().unwrap();
    let count = registry.len();
    registry.register::<User>().unwrap();
    registry.register::<Order>().unwrap();
    assert_eq!(registry.len(), count);
}

#[test]
fn test_locally_declared_entity() {
    #[derive(Entity)]
    #[entity(rename_all = "snake_case")]
    #[allow(dead_code)]
    struct Book {
        #[property(id)]
        isbn: String,
        #[property(name = "bookTitle")]
        title: String,
        page_count: u32,
    }

    let descriptor = Book::type_descriptor().unwrap();
    assert_eq!(descriptor.id_property().map(|p| p.name()), Some("isbn"));
    assert!(descriptor.has_property("bookTitle"));
    assert!(descriptor.has_property("page_count"));
}

#[test]
fn test_conflicting_type_names() {
    mod other {
        use mapkit_derive::Entity;

        #[derive(Entity)]
        #[allow(dead_code)]
        pub struct User {
            pub nickname: String,
        }
    }

    let registry = TypeRegistry::new();
    registry.register::<User>().unwrap();
    let err = registry.register::<other::User>().unwrap_err();
    assert_eq!(err.kind(), &mapkit::ErrorKind::MetadataConflict);
}

use mapkit::metadata::TypeRef;
use mapkit::ErrorKind;
use mapkit_int_test::model::{Account, User};
use mapkit_int_test::test_util::{
    create_test_context, create_uncached_test_context, run_test, segments,
};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_camel_case_chain() {
    run_test(create_test_context, |ctx| {
        let path = ctx.context().resolve::<User>("addressZipCode")?;
        assert_eq!(segments(&path), vec!["address", "zipCode"]);
        assert_eq!(path.owning_type(), &TypeRef::named("User"));
        assert_eq!(path.leaf().owning_type(), &TypeRef::named("Address"));
        assert_eq!(path.leaf().target_type(), &TypeRef::named("String"));
        assert_eq!(path.len(), 2);
        Ok(())
    });
}

#[test]
fn test_longest_match_through_collections() {
    run_test(create_test_context, |ctx| {
        let path = ctx.context().resolve::<User>("ordersLineItemsProductName")?;
        assert_eq!(path.to_dot_path(), "orders.lineItems.productName");
        assert!(path.is_collection());
        assert_eq!(path.target_type(), &TypeRef::named("Order"));
        assert_eq!(
            path.raw_type(),
            &TypeRef::collection(TypeRef::named("Order"))
        );
        Ok(())
    });
}

#[test]
fn test_literal_underscore_name_wins() {
    run_test(create_test_context, |ctx| {
        let path = ctx.resolve("user_name", "Account")?;
        assert_eq!(segments(&path), vec!["user_name"]);
        Ok(())
    });
}

#[test]
fn test_separator_splits_when_no_literal_name() {
    run_test(create_test_context, |ctx| {
        let path = ctx.resolve("user_firstName", "Account")?;
        assert_eq!(segments(&path), vec!["user", "firstName"]);

        let dotted = ctx.resolve("user.firstName", "Account")?;
        assert_eq!(path, dotted);
        Ok(())
    });
}

#[test]
fn test_map_and_array_unwrapping() {
    run_test(create_test_context, |ctx| {
        let path = ctx.resolve("settingsValue", "Account")?;
        assert!(path.is_map());
        assert_eq!(path.leaf().owning_type(), &TypeRef::named("Setting"));

        let path = ctx.resolve("history.taken_at", "Account")?;
        assert!(path.is_array());
        assert_eq!(path.leaf().owning_type(), &TypeRef::named("Snapshot"));

        let path = ctx.resolve("scores", "Account")?;
        assert!(path.is_array());
        assert_eq!(path.target_type(), &TypeRef::named("u32"));
        Ok(())
    });
}

#[test]
fn test_dot_notation_equivalence() {
    run_test(create_test_context, |ctx| {
        let context = ctx.context();
        let camel = context.resolve::<User>("addressLocationLatitude")?;
        let dotted = context.resolve::<User>("address.location.latitude")?;
        let mixed = context.resolve::<User>("address_location.latitude")?;
        assert_eq!(camel, dotted);
        assert_eq!(dotted, mixed);
        Ok(())
    });
}

#[test]
fn test_round_trip() {
    run_test(create_test_context, |ctx| {
        let context = ctx.context();
        for raw in [
            "addressZipCode",
            "ordersCustomerFriendsUserName",
            "ordersLineItemsLabels",
            "address_city",
        ] {
            let path = context.resolve::<User>(raw)?;
            let again = context.resolve::<User>(&path.to_dot_path())?;
            assert_eq!(path, again, "{}", raw);
        }

        for raw in ["user_name", "user_addressCity", "settings.overrides", "__id"] {
            let path = context.resolve::<Account>(raw)?;
            let again = context.resolve::<Account>(&path.to_dot_path())?;
            assert_eq!(path, again, "{}", raw);
        }
        Ok(())
    });
}

#[test]
fn test_cached_results_are_identical() {
    run_test(create_test_context, |ctx| {
        let context = ctx.context();
        let first = context.resolve::<User>("addressCity")?;
        let second = context.resolve::<User>("addressCity")?;
        assert!(first.ptr_eq(&second));
        Ok(())
    });
}

#[test]
fn test_uncached_results_are_equal() {
    run_test(create_uncached_test_context, |ctx| {
        let context = ctx.context();
        let first = context.resolve::<User>("addressCity")?;
        let second = context.resolve::<User>("addressCity")?;
        assert!(!first.ptr_eq(&second));
        assert_eq!(first, second);
        assert!(context.resolver().cache().is_empty());
        Ok(())
    });
}

#[test]
fn test_did_you_mean() {
    run_test(create_test_context, |ctx| {
        let err = ctx.context().resolve::<User>("userAme").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownProperty);
        assert!(err.suggestions().contains(&"userName".to_string()));

        let reference = err.reference().unwrap();
        assert_eq!(reference.token(), "userAme");
        assert_eq!(reference.searched_type(), &TypeRef::named("User"));
        Ok(())
    });
}

#[test]
fn test_failure_keeps_traversed_path() {
    run_test(create_test_context, |ctx| {
        let err = ctx
            .context()
            .resolve::<User>("ordersLineItemsQuantiti")
            .unwrap_err();
        let reference = err.reference().unwrap();
        assert_eq!(reference.token(), "Quantiti");
        assert_eq!(reference.searched_type(), &TypeRef::named("LineItem"));
        assert_eq!(
            reference.traversed().map(|p| p.to_dot_path()),
            Some("orders.lineItems".to_string())
        );
        assert_eq!(reference.suggestions(), &["quantity".to_string()]);
        assert!(err
            .message()
            .contains("Traversed path: User.orders.lineItems."));
        Ok(())
    });
}

#[test]
fn test_leading_underscore() {
    run_test(create_test_context, |ctx| {
        let err = ctx.resolve("_id", "Account").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert_eq!(err.reference().unwrap().token(), "_id");

        let path = ctx.resolve("__id", "Account")?;
        assert_eq!(path.segment(), "_id");
        Ok(())
    });
}

#[test]
fn test_transient_not_navigable() {
    run_test(create_test_context, |ctx| {
        let err = ctx.resolve("session_token", "Account").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownProperty);
        Ok(())
    });
}

#[test]
fn test_depth_guard() {
    run_test(create_test_context, |ctx| {
        let path = vec!["address"; 1001].join(".");
        let err = ctx.context().resolve::<User>(&path).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::PathTooLong);

        let err = ctx.context().resolve::<User>("address-city").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert!(ctx.context().resolver().cache().is_empty());
        Ok(())
    });
}

#[test]
fn test_invalid_input() {
    run_test(create_test_context, |ctx| {
        assert_eq!(
            ctx.resolve("", "User").unwrap_err().kind(),
            &ErrorKind::InvalidInput
        );
        assert_eq!(
            ctx.resolve("city", "Unregistered").unwrap_err().kind(),
            &ErrorKind::InvalidInput
        );
        Ok(())
    });
}

#[test]
fn test_nested_resolution() {
    run_test(create_test_context, |ctx| {
        let context = ctx.context();
        let orders = context.resolve::<User>("orders")?;
        let nested = context.nested(&orders, "customerAddressCity")?;
        assert_eq!(nested.to_dot_path(), "orders.customer.address.city");
        assert_eq!(nested.owning_type(), &TypeRef::named("User"));
        Ok(())
    });
}

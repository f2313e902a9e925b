//! Domain model shared by the integration tests.

use indexmap::IndexSet;
use mapkit_derive::Entity;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

#[derive(Entity)]
#[entity(name = "users", id(field = "id"), rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub user_name: String,
    pub first_name: String,
    #[property(embedded)]
    pub address: Address,
    #[property(reference)]
    pub orders: Vec<Order>,
    #[property(reference)]
    pub friends: HashSet<User>,
}

#[derive(Entity)]
#[entity(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: String,
    #[property(embedded)]
    pub location: Option<Location>,
}

#[derive(Entity)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Entity)]
#[entity(name = "orders", id(field = "order_id"), rename_all = "camelCase")]
pub struct Order {
    pub order_id: u64,
    pub total: f64,
    #[property(reference)]
    pub line_items: Vec<LineItem>,
    #[property(reference)]
    pub customer: Arc<User>,
}

#[derive(Entity)]
#[entity(rename_all = "camelCase")]
pub struct LineItem {
    pub product_name: String,
    pub quantity: u32,
    pub labels: IndexSet<String>,
}

/// Property names here are kept verbatim, so `user_name` is a literal
/// underscore name next to the `user` association.
#[derive(Entity)]
#[entity(id(field = "id"))]
pub struct Account {
    #[property(name = "_id")]
    pub id: String,
    #[property(reference)]
    pub user: User,
    pub user_name: String,
    #[property(transient)]
    pub session_token: Option<String>,
    #[property(embedded)]
    pub settings: HashMap<String, Setting>,
    pub scores: [u32; 3],
    #[property(embedded)]
    pub history: Box<[Snapshot]>,
}

#[derive(Entity)]
pub struct Setting {
    pub value: String,
    pub overrides: BTreeMap<String, String>,
}

#[derive(Entity)]
pub struct Snapshot {
    pub taken_at: u64,
}

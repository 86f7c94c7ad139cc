//! In-memory implementation of every repository port.
//!
//! All tables live in one [`State`] behind a single `tokio::sync::RwLock`, so each trait method
//! runs under one lock acquisition. Checkout holds the write lock from reading the cart until
//! the cart is cleared, which gives it the same all-or-nothing behaviour as the Postgres
//! transaction. Nothing is durable: state is lost on restart.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use lemon_core::domain::{
    CartLine, Category, MenuItem, MenuItemChanges, MenuItemQuery, NewCartLine, NewCategory,
    NewMenuItem, NewUser, Order, OrderChanges, OrderScope, OrderStatus, Role, RoleSet, User,
};
use lemon_core::error::DomainError;
use lemon_core::repositories::{
    CartRepository, CategoryRepository, GroupRepository, MenuItemRepository, OrderRepository,
    Repositories, StoreHealth, UserRepository,
};
use lemon_core::services::checkout::build_order;
use lemon_shared::{EntityId, Pagination};
use tokio::sync::RwLock;
use tracing::debug;

/// Monotonic id sequences, one per table.
#[derive(Debug, Default)]
struct Sequences {
    users: EntityId,
    categories: EntityId,
    menu_items: EntityId,
    cart_lines: EntityId,
    orders: EntityId,
    order_items: EntityId,
}

fn next(seq: &mut EntityId) -> EntityId {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct State {
    seq: Sequences,
    users: BTreeMap<EntityId, User>,
    memberships: BTreeSet<(EntityId, Role)>,
    categories: BTreeMap<EntityId, Category>,
    menu_items: BTreeMap<EntityId, MenuItem>,
    cart_lines: BTreeMap<EntityId, CartLine>,
    orders: BTreeMap<EntityId, Order>,
}

impl State {
    fn menu_item_ordered(&self, menu_item_id: EntityId) -> bool {
        self.orders
            .values()
            .flat_map(|o| o.items.iter())
            .any(|i| i.menu_item_id == menu_item_id)
    }
}

fn page<T>(items: impl Iterator<Item = T>, page: Pagination) -> Vec<T> {
    items
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

/// Process-local store backing the `memory` storage backend and the test suites.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Wires a fresh in-memory store behind every repository port.
pub fn memory_repositories() -> Repositories {
    let store = Arc::new(InMemoryStore::new());
    Repositories {
        categories: store.clone(),
        menu_items: store.clone(),
        cart: store.clone(),
        orders: store.clone(),
        users: store.clone(),
        groups: store.clone(),
        health: store,
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.state.read().await.categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Category>, DomainError> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.slug == category.slug) {
            return Err(DomainError::CategorySlugAlreadyExists(category.slug.clone()));
        }
        let id = next(&mut state.seq.categories);
        let created = Category { id, title: category.title.clone(), slug: category.slug.clone() };
        state.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn is_referenced(&self, id: EntityId) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state.menu_items.values().any(|m| m.category.id == id))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.menu_items.values().any(|m| m.category.id == id) {
            return Err(DomainError::CategoryInUse(id));
        }
        Ok(state.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryStore {
    async fn list(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, DomainError> {
        let state = self.state.read().await;
        let mut items: Vec<MenuItem> = state
            .menu_items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        query.sort(&mut items);
        Ok(page(items.into_iter(), query.pagination))
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<MenuItem>, DomainError> {
        Ok(self.state.read().await.menu_items.get(&id).cloned())
    }

    async fn create(&self, item: &NewMenuItem) -> Result<MenuItem, DomainError> {
        let mut state = self.state.write().await;
        let category = state
            .categories
            .get(&item.category_id)
            .cloned()
            .ok_or(DomainError::CategoryNotFound(item.category_id))?;

        let id = next(&mut state.seq.menu_items);
        let created = MenuItem {
            id,
            title: item.title.clone(),
            price: item.price,
            featured: item.featured,
            inventory: item.inventory,
            category,
        };
        state.menu_items.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: EntityId,
        changes: &MenuItemChanges,
    ) -> Result<Option<MenuItem>, DomainError> {
        let mut state = self.state.write().await;
        let category = match changes.category_id {
            Some(category_id) => Some(
                state
                    .categories
                    .get(&category_id)
                    .cloned()
                    .ok_or(DomainError::CategoryNotFound(category_id))?,
            ),
            None => None,
        };

        Ok(state.menu_items.get_mut(&id).map(|item| {
            changes.apply(item, category);
            item.clone()
        }))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.menu_item_ordered(id) {
            return Err(DomainError::MenuItemInUse(id));
        }
        if state.menu_items.remove(&id).is_none() {
            return Ok(false);
        }
        state.cart_lines.retain(|_, line| line.menu_item_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn list_for_user(&self, user_id: EntityId) -> Result<Vec<CartLine>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .cart_lines
            .values()
            .filter(|line| line.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add(&self, line: &NewCartLine) -> Result<CartLine, DomainError> {
        let mut state = self.state.write().await;
        if !state.menu_items.contains_key(&line.menu_item_id) {
            return Err(DomainError::MenuItemNotFound(line.menu_item_id));
        }
        let duplicate = state
            .cart_lines
            .values()
            .any(|l| l.user_id == line.user_id && l.menu_item_id == line.menu_item_id);
        if duplicate {
            return Err(DomainError::DuplicateCartItem(line.menu_item_id));
        }

        let id = next(&mut state.seq.cart_lines);
        let created = line.clone().into_line(id);
        state.cart_lines.insert(id, created.clone());
        Ok(created)
    }

    async fn clear_for_user(&self, user_id: EntityId) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.cart_lines.len();
        state.cart_lines.retain(|_, line| line.user_id != user_id);
        Ok((before - state.cart_lines.len()) as u64)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn list(&self, scope: OrderScope, page_req: Pagination) -> Result<Vec<Order>, DomainError> {
        let state = self.state.read().await;
        Ok(page(
            state.orders.values().filter(|o| scope.includes(o)).cloned(),
            page_req,
        ))
    }

    async fn find_by_id(&self, id: EntityId, scope: OrderScope) -> Result<Option<Order>, DomainError> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).filter(|o| scope.includes(o)).cloned())
    }

    async fn checkout(&self, user_id: EntityId, date: NaiveDate) -> Result<Order, DomainError> {
        let mut state = self.state.write().await;

        let lines: Vec<CartLine> = state
            .cart_lines
            .values()
            .filter(|line| line.user_id == user_id)
            .cloned()
            .collect();
        let draft = build_order(user_id, &lines, date)?;

        let order_id = next(&mut state.seq.orders);
        let mut items = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            let item_id = next(&mut state.seq.order_items);
            items.push(item.into_item(item_id, order_id));
        }
        let order = Order {
            id: order_id,
            user_id,
            delivery_crew_id: None,
            status: OrderStatus::NotDelivered,
            date: draft.date,
            total: draft.total,
            items,
        };

        state.orders.insert(order_id, order.clone());
        state.cart_lines.retain(|_, line| line.user_id != user_id);
        debug!("Checkout for user {} moved {} cart rows", user_id, lines.len());
        Ok(order)
    }

    async fn update(&self, id: EntityId, changes: &OrderChanges) -> Result<Option<Order>, DomainError> {
        let mut state = self.state.write().await;
        if let Some(Some(crew_id)) = changes.delivery_crew_id {
            if !state.users.contains_key(&crew_id) {
                return Err(DomainError::ValidationError(
                    "Delivery crew user does not exist".to_string(),
                ));
            }
        }
        Ok(state.orders.get_mut(&id).map(|order| {
            changes.apply(order);
            order.clone()
        }))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.orders.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists(user.username.clone()));
        }
        let id = next(&mut state.seq.users);
        let created = User {
            id,
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_superuser: user.is_superuser,
            password_hash: user.password_hash.clone(),
            date_joined: Utc::now(),
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn roles_of(&self, user_id: EntityId) -> Result<RoleSet, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .filter(|(member, _)| *member == user_id)
            .map(|(_, role)| *role)
            .collect())
    }

    async fn members(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .filter(|(_, r)| *r == role)
            .filter_map(|(user_id, _)| state.users.get(user_id).cloned())
            .collect())
    }

    async fn is_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        Ok(self.state.read().await.memberships.contains(&(user_id, role)))
    }

    async fn add_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }
        Ok(state.memberships.insert((user_id, role)))
    }

    async fn remove_member(&self, user_id: EntityId, role: Role) -> Result<bool, DomainError> {
        Ok(self.state.write().await.memberships.remove(&(user_id, role)))
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        let new_user = NewUser::new(username.to_string(), None, None, None, "x".to_string()).unwrap();
        UserRepository::create(store, &new_user).await.unwrap()
    }

    async fn seed_item(store: &InMemoryStore, title: &str, price: i64) -> MenuItem {
        let category = match CategoryRepository::list(store).await.unwrap().into_iter().next() {
            Some(c) => c,
            None => {
                let new = NewCategory::new("Mains".to_string(), None).unwrap();
                CategoryRepository::create(store, &new).await.unwrap()
            }
        };
        let new = NewMenuItem::new(title.to_string(), Decimal::new(price, 0), false, 10, category.id)
            .unwrap();
        MenuItemRepository::create(store, &new).await.unwrap()
    }

    async fn add_to_cart(store: &InMemoryStore, user_id: EntityId, item: &MenuItem, qty: i32) {
        let line = NewCartLine::for_item(user_id, item, qty).unwrap();
        CartRepository::add(store, &line).await.unwrap();
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_moves_cart_into_order() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "mario").await;
        let soup = seed_item(&store, "Soup", 10).await;
        let bread = seed_item(&store, "Bread", 5).await;
        add_to_cart(&store, user.id, &soup, 1).await;
        add_to_cart(&store, user.id, &bread, 1).await;

        let order = store.checkout(user.id, date()).await.unwrap();
        assert_eq!(order.total, Decimal::new(15, 0));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, OrderStatus::NotDelivered);
        assert!(store.list_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_checkout_creates_nothing() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "mario").await;

        let result = store.checkout(user.id, date()).await;
        assert!(matches!(result, Err(DomainError::EmptyCart)));
        let orders = OrderRepository::list(&store, OrderScope::All, Pagination::default())
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart_and_creates_no_order() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "mario").await;
        let soup = seed_item(&store, "Soup", 10).await;
        let bread = seed_item(&store, "Bread", 5).await;
        // Each line fits a money column on its own; together they overflow the order total.
        for item in [&soup, &bread] {
            let line = NewCartLine {
                user_id: user.id,
                menu_item_id: item.id,
                quantity: 1,
                unit_price: Decimal::new(60_000_000, 0),
                price: Decimal::new(60_000_000, 0),
            };
            CartRepository::add(&store, &line).await.unwrap();
        }
        let before = store.list_for_user(user.id).await.unwrap();

        let result = store.checkout(user.id, date()).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        assert_eq!(store.list_for_user(user.id).await.unwrap(), before);
        let orders = OrderRepository::list(&store, OrderScope::All, Pagination::default())
            .await
            .unwrap();
        assert!(orders.is_empty());

        // Nothing was consumed: a normal cart still checks out as order 1.
        CartRepository::clear_for_user(&store, user.id).await.unwrap();
        add_to_cart(&store, user.id, &soup, 1).await;
        let order = store.checkout(user.id, date()).await.unwrap();
        assert_eq!(order.id, 1);
    }

    #[tokio::test]
    async fn test_checkout_leaves_other_carts_alone() {
        let store = InMemoryStore::new();
        let mario = seed_user(&store, "mario").await;
        let luigi = seed_user(&store, "luigi").await;
        let soup = seed_item(&store, "Soup", 10).await;
        add_to_cart(&store, mario.id, &soup, 1).await;
        add_to_cart(&store, luigi.id, &soup, 2).await;

        store.checkout(mario.id, date()).await.unwrap();
        let remaining = store.list_for_user(luigi.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].price, Decimal::new(20, 0));
    }

    #[tokio::test]
    async fn test_duplicate_cart_line_rejected() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "mario").await;
        let soup = seed_item(&store, "Soup", 10).await;
        add_to_cart(&store, user.id, &soup, 1).await;

        let line = NewCartLine::for_item(user.id, &soup, 3).unwrap();
        let result = CartRepository::add(&store, &line).await;
        assert!(matches!(result, Err(DomainError::DuplicateCartItem(id)) if id == soup.id));
    }

    #[tokio::test]
    async fn test_order_scopes() {
        let store = InMemoryStore::new();
        let mario = seed_user(&store, "mario").await;
        let crew = seed_user(&store, "crew").await;
        let soup = seed_item(&store, "Soup", 10).await;
        add_to_cart(&store, mario.id, &soup, 1).await;
        let order = store.checkout(mario.id, date()).await.unwrap();

        let hidden = OrderRepository::find_by_id(&store, order.id, OrderScope::AssignedTo(crew.id))
            .await
            .unwrap();
        assert!(hidden.is_none());

        let changes = OrderChanges { delivery_crew_id: Some(Some(crew.id)), ..Default::default() };
        OrderRepository::update(&store, order.id, &changes).await.unwrap();

        let assigned = OrderRepository::list(&store, OrderScope::AssignedTo(crew.id), Pagination::default())
            .await
            .unwrap();
        assert_eq!(assigned.len(), 1);
        let owned = OrderRepository::list(&store, OrderScope::OwnedBy(crew.id), Pagination::default())
            .await
            .unwrap();
        assert!(owned.is_empty());
    }

    #[tokio::test]
    async fn test_ordered_menu_item_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "mario").await;
        let soup = seed_item(&store, "Soup", 10).await;
        add_to_cart(&store, user.id, &soup, 1).await;
        store.checkout(user.id, date()).await.unwrap();

        let result = MenuItemRepository::delete(&store, soup.id).await;
        assert!(matches!(result, Err(DomainError::MenuItemInUse(_))));
    }

    #[tokio::test]
    async fn test_menu_listing_filters_and_sorts() {
        let store = InMemoryStore::new();
        seed_item(&store, "Lemon Cake", 8).await;
        seed_item(&store, "Greek Salad", 12).await;
        seed_item(&store, "Lemon Tart", 6).await;

        let query = MenuItemQuery {
            search: Some("lemon".to_string()),
            ordering: lemon_core::domain::MenuItemOrdering::parse_list("-price").unwrap(),
            ..Default::default()
        };
        let titles: Vec<String> = MenuItemRepository::list(&store, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Lemon Cake".to_string(), "Lemon Tart".to_string()]);
    }

    #[tokio::test]
    async fn test_group_membership_roundtrip() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "crew").await;

        assert!(store.add_member(user.id, Role::DeliveryCrew).await.unwrap());
        assert!(!store.add_member(user.id, Role::DeliveryCrew).await.unwrap());
        assert!(store.roles_of(user.id).await.unwrap().contains(&Role::DeliveryCrew));
        assert_eq!(store.members(Role::DeliveryCrew).await.unwrap().len(), 1);
        assert!(store.remove_member(user.id, Role::DeliveryCrew).await.unwrap());
        assert!(store.roles_of(user.id).await.unwrap().is_empty());
    }
}

//! In-memory store double for engine and service tests.
//!
//! Mirrors the Postgres semantics the services rely on: compare-and-swap
//! cart saves, all-or-nothing sale finalization, and check-and-set discount
//! activation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Cart, CartOwner, Category, Discount, DiscountError, Product, Sale, SaleStatus, StatusJob,
};

use super::{
    CartStore, CategoryStore, DiscountStore, ProductFilter, ProductStore, SaleStore, StoreError,
    StoredCart,
};

#[derive(Default)]
struct State {
    products: HashMap<Uuid, Product>,
    // user id -> (cart slot, version)
    users: HashMap<Uuid, (Option<Cart>, i64)>,
    guests: HashMap<String, (Cart, i64)>,
    sales: HashMap<Uuid, Sale>,
    jobs: Vec<StatusJob>,
    discounts: HashMap<Uuid, Discount>,
    categories: HashMap<Uuid, Category>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record so member cart saves have somewhere to land.
    pub fn put_user(&self, user_id: Uuid) {
        self.state.lock().unwrap().users.insert(user_id, (None, 0));
    }

    pub fn seed_product(&self, product: Product) {
        self.state.lock().unwrap().products.insert(product.id(), product);
    }

    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.state.lock().unwrap().products.get(&id).cloned()
    }

    pub fn jobs(&self) -> Vec<StatusJob> {
        self.state.lock().unwrap().jobs.clone()
    }

    pub fn sale(&self, id: Uuid) -> Option<Sale> {
        self.state.lock().unwrap().sales.get(&id).cloned()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.state.lock().unwrap().products.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), StoreError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<Product> = state
            .products
            .values()
            .filter(|p| (p.visible() || filter.include_hidden))
            .filter(|p| filter.category.map_or(true, |c| p.category_id() == Some(c)))
            .cloned()
            .collect();
        matching.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        self.state.lock().unwrap().products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.products.get_mut(&product.id()) {
            Some(slot) => {
                *slot = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.lock().unwrap().products.remove(&id).is_some())
    }

    async fn restock(&self, id: Uuid, quantity: u32) -> Result<Option<Product>, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.products.get_mut(&id).map(|p| {
            p.restock(quantity);
            p.clone()
        }))
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.products.values().filter(|p| p.category_id() == Some(category_id)).count() as i64)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn load(&self, owner: &CartOwner) -> Result<StoredCart, StoreError> {
        let state = self.state.lock().unwrap();
        match owner {
            CartOwner::Member(user_id) => {
                let (cart, version) = state.users.get(user_id).ok_or(StoreError::NotFound("user"))?;
                Ok(StoredCart { cart: cart.clone(), version: *version })
            }
            CartOwner::Guest(session_id) => Ok(match state.guests.get(session_id) {
                Some((cart, version)) => StoredCart { cart: Some(cart.clone()), version: *version },
                None => StoredCart { cart: None, version: 0 },
            }),
        }
    }

    async fn save(
        &self,
        owner: &CartOwner,
        cart: &Cart,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        let mut state = self.state.lock().unwrap();
        match owner {
            CartOwner::Member(user_id) => {
                let slot = state.users.get_mut(user_id).ok_or(StoreError::NotFound("user"))?;
                if slot.1 != expected_version {
                    return Err(StoreError::VersionConflict);
                }
                *slot = (Some(cart.clone()), expected_version + 1);
                Ok(expected_version + 1)
            }
            CartOwner::Guest(session_id) => match state.guests.get_mut(session_id) {
                Some(slot) => {
                    if slot.1 != expected_version {
                        return Err(StoreError::VersionConflict);
                    }
                    *slot = (cart.clone(), expected_version + 1);
                    Ok(expected_version + 1)
                }
                None => {
                    if expected_version != 0 {
                        return Err(StoreError::VersionConflict);
                    }
                    state.guests.insert(session_id.clone(), (cart.clone(), 1));
                    Ok(1)
                }
            },
        }
    }

    async fn clear(&self, owner: &CartOwner) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        match owner {
            CartOwner::Member(user_id) => {
                if let Some(slot) = state.users.get_mut(user_id) {
                    *slot = (None, slot.1 + 1);
                }
            }
            CartOwner::Guest(session_id) => {
                state.guests.remove(session_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn finalize(&self, sale: &Sale, jobs: &[StatusJob]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        // check every line before touching anything, so a failure leaves
        // stock untouched
        for line in sale.cart().items() {
            let product = state
                .products
                .get(&line.product_id)
                .ok_or(StoreError::OutOfStock { product: line.name.clone() })?;
            if product.stock_quantity() < line.quantity {
                return Err(StoreError::OutOfStock { product: line.name.clone() });
            }
        }
        for line in sale.cart().items() {
            if let Some(product) = state.products.get_mut(&line.product_id) {
                product
                    .decrement_stock(line.quantity)
                    .map_err(|_| StoreError::OutOfStock { product: line.name.clone() })?;
            }
        }
        state.sales.insert(sale.id(), sale.clone());
        state.jobs.extend_from_slice(jobs);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Sale>, StoreError> {
        Ok(self.state.lock().unwrap().sales.get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Sale>, i64), StoreError> {
        let state = self.state.lock().unwrap();
        let mut sales: Vec<Sale> = state.sales.values().cloned().collect();
        sales.sort_by_key(|s| std::cmp::Reverse(s.created_at()));
        let total = sales.len() as i64;
        let page = sales.into_iter().skip(offset as usize).take(limit as usize).collect();
        Ok((page, total))
    }

    async fn set_status(&self, id: Uuid, status: SaleStatus) -> Result<Option<Sale>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(sale) = state.sales.get_mut(&id) else { return Ok(None) };
        sale.status = status;
        sale.updated_at = Utc::now();
        let updated = sale.clone();
        state.jobs.retain(|job| job.sale_id != id);
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.jobs.retain(|job| job.sale_id != id);
        Ok(state.sales.remove(&id).is_some())
    }

    async fn due_jobs(&self, now: DateTime<Utc>) -> Result<Vec<StatusJob>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut due: Vec<StatusJob> =
            state.jobs.iter().filter(|job| job.due_at <= now).cloned().collect();
        due.sort_by_key(|job| job.due_at);
        Ok(due)
    }

    async fn apply_job(&self, job: &StatusJob) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.jobs.retain(|j| j.id != job.id);
        let Some(sale) = state.sales.get_mut(&job.sale_id) else { return Ok(false) };
        if sale.status != job.from_status {
            return Ok(false);
        }
        sale.status = job.to_status;
        sale.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl DiscountStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Discount>, StoreError> {
        Ok(self.state.lock().unwrap().discounts.get(&id).cloned())
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Discount>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .discounts
            .values()
            .find(|d| d.is_active() && d.promo_code() == Some(code))
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Discount>, i64), StoreError> {
        let state = self.state.lock().unwrap();
        let mut discounts: Vec<Discount> = state.discounts.values().cloned().collect();
        discounts.sort_by_key(|d| std::cmp::Reverse(d.created_at));
        let total = discounts.len() as i64;
        let page = discounts.into_iter().skip(offset as usize).take(limit as usize).collect();
        Ok((page, total))
    }

    async fn insert(&self, discount: &Discount) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = discount.promo_code() {
            if state.discounts.values().any(|d| d.promo_code() == Some(code)) {
                return Err(StoreError::Duplicate(format!("promo code `{code}`")));
            }
        }
        state.discounts.insert(discount.id(), discount.clone());
        Ok(())
    }

    async fn update(&self, discount: &Discount) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.discounts.get_mut(&discount.id()) {
            Some(slot) => {
                *slot = discount.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.lock().unwrap().discounts.remove(&id).is_some())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Discount, StoreError> {
        let mut state = self.state.lock().unwrap();
        let mut discount = state.discounts.get(&id).cloned().ok_or(StoreError::NotFound("discount"))?;

        if active {
            discount.ensure_activatable().map_err(|e| match e {
                DiscountError::NoProducts => StoreError::Invalid(e.to_string()),
                other => StoreError::Conflict(other.to_string()),
            })?;
            for product_id in discount.product_ids() {
                let product =
                    state.products.get(product_id).ok_or(StoreError::NotFound("product"))?;
                if product.on_discount() {
                    return Err(StoreError::Conflict(format!(
                        "product `{}` already carries an active discount",
                        product.name()
                    )));
                }
            }
            let rate = discount.rate();
            for product_id in discount.product_ids().to_vec() {
                if let Some(product) = state.products.get_mut(&product_id) {
                    product.apply_discount(rate).map_err(|e| StoreError::Conflict(e.to_string()))?;
                }
            }
            discount.set_active_flag(true);
        } else {
            discount
                .ensure_deactivatable()
                .map_err(|e| StoreError::Conflict(e.to_string()))?;
            for product_id in discount.product_ids().to_vec() {
                if let Some(product) = state.products.get_mut(&product_id) {
                    product.clear_discount();
                }
            }
            discount.set_active_flag(false);
        }

        state.discounts.insert(id, discount.clone());
        Ok(discount)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.state.lock().unwrap().categories.get(&id).cloned())
    }

    async fn list(&self, parent: Option<Uuid>) -> Result<Vec<Category>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| parent.map_or(true, |p| c.parent_id() == Some(p)))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(categories)
    }

    async fn insert(&self, category: &Category) -> Result<(), StoreError> {
        self.state.lock().unwrap().categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.categories.get_mut(&category.id()) {
            Some(slot) => {
                *slot = category.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.lock().unwrap().categories.remove(&id).is_some())
    }
}

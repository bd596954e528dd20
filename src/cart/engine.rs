//! Pricing and consolidation engine.
//!
//! Every read and write starts with a full re-pricing pass: each referenced
//! product is re-fetched, line totals are recomputed from current prices,
//! lines whose product no longer resolves are dropped, and the running total
//! is rebuilt. The cart is never trusted to be pre-consistent. Saves are
//! compare-and-swap on the cart version, so concurrent writers conflict
//! instead of clobbering each other.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Cart, CartOwner, Product};
use crate::domain::events::DomainEvent;
use crate::error::ApiError;
use crate::events::EventPublisher;
use crate::store::{CartStore, DiscountStore, ProductStore, StoreError};

#[derive(Debug, Clone, Deserialize)]
pub struct CartUpdate {
    pub action: String,
    pub id: Option<Uuid>,
    pub quantity: Option<i64>,
}

enum Action {
    Add,
    Remove,
    RemoveProduct,
    RemoveAll,
}

impl Action {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "removeProduct" => Ok(Self::RemoveProduct),
            "removeAll" => Ok(Self::RemoveAll),
            other => Err(ApiError::Validation(format!("unknown cart action `{other}`"))),
        }
    }
}

#[derive(Clone)]
pub struct CartEngine {
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
    discounts: Arc<dyn DiscountStore>,
    events: EventPublisher,
    currency: String,
}

impl CartEngine {
    pub fn new(
        products: Arc<dyn ProductStore>,
        carts: Arc<dyn CartStore>,
        discounts: Arc<dyn DiscountStore>,
        events: EventPublisher,
        currency: &str,
    ) -> Self {
        Self { products, carts, discounts, events, currency: currency.to_string() }
    }

    /// Read the owner's cart, freshly re-priced. The refreshed state is
    /// written back; losing that save to a concurrent writer is harmless on
    /// a read, the response is still freshly priced.
    pub async fn get_cart(&self, owner: &CartOwner) -> Result<Cart, ApiError> {
        let (cart, version, changed) = self.load_repriced(owner).await?;
        if changed {
            match self.carts.save(owner, &cart, version).await {
                Ok(_) => {}
                Err(StoreError::VersionConflict) => {
                    debug!(owner = %owner, "re-priced cart save lost to a concurrent writer");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(cart)
    }

    pub async fn add_item(
        &self,
        owner: &CartOwner,
        product_id: Uuid,
        quantity: i64,
    ) -> Result<Cart, ApiError> {
        let quantity = positive_quantity(quantity)?;
        let (mut cart, version, _) = self.load_repriced(owner).await?;
        let product = self.fetch_sellable(product_id).await?;
        cart.merge_line(&product, quantity);
        self.carts.save(owner, &cart, version).await?;
        debug!(owner = %owner, product = %product_id, quantity, "item added to cart");
        Ok(cart)
    }

    pub async fn update_cart(&self, owner: &CartOwner, update: CartUpdate) -> Result<Cart, ApiError> {
        let action = Action::parse(&update.action)?;
        let (mut cart, version, _) = self.load_repriced(owner).await?;
        match action {
            Action::RemoveAll => {
                if update.id.is_some() || update.quantity.is_some() {
                    return Err(ApiError::Validation(
                        "removeAll does not take id or quantity".to_string(),
                    ));
                }
                cart.clear();
            }
            Action::Add => {
                let (id, quantity) = require_target(&update)?;
                let quantity = positive_quantity(quantity)?;
                let product = self.fetch_sellable(id).await?;
                cart.merge_line(&product, quantity);
            }
            Action::Remove => {
                let (id, quantity) = require_target(&update)?;
                let quantity = positive_quantity(quantity)?;
                cart.decrement_line(id, quantity)?;
            }
            Action::RemoveProduct => {
                let (id, _) = require_target(&update)?;
                cart.remove_line(id)?;
            }
        }
        self.carts.save(owner, &cart, version).await?;
        debug!(owner = %owner, action = %update.action, "cart updated");
        Ok(cart)
    }

    /// Consolidate a guest session cart into the member cart on login, with
    /// add-item merge semantics, then destroy the guest cart. Merging an
    /// absent or empty guest cart is a no-op; the operation is idempotent
    /// because the guest cart is consumed.
    pub async fn merge_carts(&self, session_id: &str, user_id: Uuid) -> Result<Cart, ApiError> {
        let guest_owner = CartOwner::Guest(session_id.to_string());
        let member_owner = CartOwner::Member(user_id);

        let guest = self.carts.load(&guest_owner).await?;
        let Some(guest_cart) = guest.cart.filter(|c| !c.is_empty()) else {
            return self.get_cart(&member_owner).await;
        };

        let (mut cart, version, _) = self.load_repriced(&member_owner).await?;
        let mut merged = 0usize;
        for line in guest_cart.items() {
            if let Some(product) = self.products.find(line.product_id).await? {
                cart.merge_line(&product, line.quantity);
                merged += 1;
            }
        }
        self.carts.save(&member_owner, &cart, version).await?;
        self.carts.clear(&guest_owner).await?;
        info!(user_id = %user_id, merged, "guest cart merged into member cart");
        self.events
            .publish(&DomainEvent::CartMerged { user_id, merged_lines: merged })
            .await;
        Ok(cart)
    }

    /// Annotate a guest cart with promo-reduced display totals. The
    /// annotation is informational only: the next re-pricing pass recomputes
    /// every line from the catalog and drops it.
    pub async fn apply_promo_code(&self, owner: &CartOwner, code: &str) -> Result<Cart, ApiError> {
        if owner.is_member() {
            return Err(ApiError::Validation("promo codes apply to guest carts only".to_string()));
        }
        let discount = self
            .discounts
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| ApiError::NotFound("unknown or inactive promo code".to_string()))?;
        let (mut cart, version, _) = self.load_repriced(owner).await?;
        let annotated = cart.apply_promo(discount.rate(), discount.product_ids());
        self.carts.save(owner, &cart, version).await?;
        debug!(owner = %owner, code, annotated, "promo code applied");
        Ok(cart)
    }

    async fn load_repriced(&self, owner: &CartOwner) -> Result<(Cart, i64, bool), ApiError> {
        let stored = self.carts.load(owner).await?;
        let mut cart = stored.cart.unwrap_or_else(|| Cart::empty(&self.currency));
        let before = cart.clone();
        let mut catalog = HashMap::new();
        for product_id in cart.product_ids() {
            if let Some(product) = self.products.find(product_id).await? {
                catalog.insert(product_id, product);
            }
        }
        cart.reprice_with(&catalog);
        let changed = cart != before;
        Ok((cart, stored.version, changed))
    }

    async fn fetch_sellable(&self, product_id: Uuid) -> Result<Product, ApiError> {
        let product = self
            .products
            .find(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;
        // availability is checked at add time, not reserved; the checkout
        // floor check is what actually guards stock
        if !product.is_in_stock() {
            return Err(ApiError::OutOfStock(product.name().to_string()));
        }
        Ok(product)
    }
}

fn require_target(update: &CartUpdate) -> Result<(Uuid, i64), ApiError> {
    match (update.id, update.quantity) {
        (Some(id), Some(quantity)) => Ok((id, quantity)),
        _ => Err(ApiError::Validation(
            "action requires id, quantity and action".to_string(),
        )),
    }
}

fn positive_quantity(raw: i64) -> Result<u32, ApiError> {
    if raw <= 0 {
        return Err(ApiError::Validation("quantity must be greater than zero".to_string()));
    }
    u32::try_from(raw).map_err(|_| ApiError::Validation("quantity too large".to_string()))
}

//! Cart Aggregate
//!
//! One shape for both cart lifecycles: a guest cart keyed by session and a
//! member cart stored on the account record. The invariant after every
//! mutation is `total == sum(line.total_price)`; totals are never trusted
//! from storage, the pricing engine recomputes them from the catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;
use crate::domain::value_objects::{Money, Percent};

/// Whichever of {guest session, authenticated account} holds a cart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartOwner {
    Guest(String),
    Member(Uuid),
}

impl CartOwner {
    pub fn is_member(&self) -> bool { matches!(self, Self::Member(_)) }
}

impl std::fmt::Display for CartOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest(session) => write!(f, "guest:{session}"),
            Self::Member(id) => write!(f, "member:{id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    /// Promo shadow fields, set only on guest carts for display. The next
    /// re-pricing pass recomputes the line from the catalog and drops them.
    #[serde(default, skip_serializing_if = "is_false")]
    pub promo_code_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_rate: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_total_price: Option<Money>,
}

fn is_false(b: &bool) -> bool { !*b }

impl CartLine {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id(),
            name: product.name().to_string(),
            quantity,
            unit_price: product.price().clone(),
            total_price: product.price().multiply(quantity),
            promo_code_active: false,
            promo_rate: None,
            original_total_price: None,
        }
    }

    /// Recompute the line from the product's current catalog state.
    fn reprice(&mut self, product: &Product) {
        self.name = product.name().to_string();
        self.unit_price = product.price().clone();
        self.total_price = self.unit_price.multiply(self.quantity);
        self.promo_code_active = false;
        self.promo_rate = None;
        self.original_total_price = None;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub(crate) items: Vec<CartLine>,
    pub(crate) total: Money,
    pub(crate) currency: String,
}

impl Cart {
    pub fn empty(currency: &str) -> Self {
        Self { items: vec![], total: Money::zero(currency), currency: currency.to_string() }
    }

    pub fn items(&self) -> &[CartLine] { &self.items }
    pub fn total(&self) -> &Money { &self.total }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn line_count(&self) -> usize { self.items.len() }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|line| line.product_id).collect()
    }

    /// Merge `quantity` of a product into the cart: increment an existing
    /// line or append a new one, then restore the total invariant.
    pub fn merge_line(&mut self, product: &Product, quantity: u32) {
        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product.id()) {
            line.quantity = line.quantity.saturating_add(quantity);
            line.reprice(product);
        } else {
            self.items.push(CartLine::new(product, quantity));
        }
        self.recalculate();
    }

    /// Remove `quantity` of a product. Removing at least the held quantity
    /// drops the line entirely; a line never survives at quantity zero.
    pub fn decrement_line(&mut self, product_id: Uuid, quantity: u32) -> Result<(), CartError> {
        let index = self
            .items
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;
        if quantity >= self.items[index].quantity {
            self.items.remove(index);
        } else {
            let line = &mut self.items[index];
            line.quantity -= quantity;
            line.total_price = line.unit_price.multiply(line.quantity);
        }
        self.recalculate();
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: Uuid) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|l| l.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.recalculate();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Re-pricing pass: rebuild every line from the catalog snapshot, drop
    /// lines whose product no longer resolves, recompute the total.
    pub fn reprice_with(&mut self, catalog: &HashMap<Uuid, Product>) {
        self.items = self
            .items
            .drain(..)
            .filter_map(|mut line| {
                catalog.get(&line.product_id).map(|product| {
                    line.reprice(product);
                    line
                })
            })
            .collect();
        self.recalculate();
    }

    /// Annotate lines covered by a promo discount with display-only reduced
    /// totals. An empty product list covers the whole cart. Returns the
    /// number of annotated lines.
    pub fn apply_promo(&mut self, rate: Percent, product_ids: &[Uuid]) -> usize {
        let mut annotated = 0;
        for line in &mut self.items {
            if !product_ids.is_empty() && !product_ids.contains(&line.product_id) {
                continue;
            }
            line.original_total_price = Some(line.total_price.clone());
            line.total_price = line.total_price.percent_off(rate);
            line.promo_code_active = true;
            line.promo_rate = Some(rate);
            annotated += 1;
        }
        self.recalculate();
        annotated
    }

    fn recalculate(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(Money::zero(&self.currency), |acc, l| acc.add(&l.total_price).unwrap_or(acc));
    }
}

#[derive(Debug, Clone)]
pub enum CartError { ItemNotFound }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product not in cart")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(price: i64) -> Product {
        Product::create("Widget", "", Money::new(Decimal::new(price, 0), "USD"), 10, None)
    }

    #[test]
    fn test_merge_increments_existing_line() {
        let p = product(10);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&p, 2);
        cart.merge_line(&p, 1);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total().amount(), Decimal::new(30, 0));
    }

    #[test]
    fn test_decrement_below_held_quantity_reprices() {
        let p = product(10);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&p, 5);
        cart.decrement_line(p.id(), 2).unwrap();
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[0].total_price.amount(), Decimal::new(30, 0));
        assert_eq!(cart.total().amount(), Decimal::new(30, 0));
    }

    #[test]
    fn test_decrement_at_or_above_held_quantity_drops_line() {
        let p = product(10);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&p, 2);
        cart.decrement_line(p.id(), 2).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_decrement_missing_line_fails() {
        let mut cart = Cart::empty("USD");
        assert!(cart.decrement_line(Uuid::new_v4(), 1).is_err());
    }

    #[test]
    fn test_reprice_drops_unresolved_products_and_recomputes() {
        let kept = product(100);
        let dropped = product(10);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&kept, 2);
        cart.merge_line(&dropped, 1);

        let mut repriced = kept.clone();
        repriced.update_details("Widget", "", Money::new(Decimal::new(80, 0), "USD"), None).unwrap();
        let catalog = HashMap::from([(kept.id(), repriced)]);

        cart.reprice_with(&catalog);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].total_price.amount(), Decimal::new(160, 0));
        assert_eq!(cart.total().amount(), Decimal::new(160, 0));
    }

    #[test]
    fn test_promo_annotation_is_display_only() {
        let p = product(100);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&p, 2);
        let annotated = cart.apply_promo(Percent::new(10).unwrap(), &[]);
        assert_eq!(annotated, 1);
        assert!(cart.items()[0].promo_code_active);
        assert_eq!(cart.items()[0].total_price.amount(), Decimal::new(180, 0));
        assert_eq!(cart.items()[0].original_total_price.as_ref().unwrap().amount(), Decimal::new(200, 0));
        assert_eq!(cart.total().amount(), Decimal::new(180, 0));

        // the next re-pricing pass recomputes from the catalog
        let catalog = HashMap::from([(p.id(), p.clone())]);
        cart.reprice_with(&catalog);
        assert!(!cart.items()[0].promo_code_active);
        assert_eq!(cart.total().amount(), Decimal::new(200, 0));
    }

    #[test]
    fn test_promo_scoped_to_listed_products() {
        let covered = product(100);
        let other = product(50);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&covered, 1);
        cart.merge_line(&other, 1);
        let annotated = cart.apply_promo(Percent::new(50).unwrap(), &[covered.id()]);
        assert_eq!(annotated, 1);
        assert_eq!(cart.total().amount(), Decimal::new(100, 0));
    }
}

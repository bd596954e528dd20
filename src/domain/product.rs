//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{Money, Percent, Quantity};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) description: String,
    /// Current selling price, possibly reduced by an active discount.
    pub(crate) price: Money,
    pub(crate) original_price: Money,
    pub(crate) stock_quantity: Quantity,
    pub(crate) on_discount: bool,
    pub(crate) discount_rate: Option<Percent>,
    pub(crate) visible: bool,
    pub(crate) category_id: Option<Uuid>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
        category_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            original_price: price.clone(),
            price,
            stock_quantity: Quantity::new(stock),
            on_discount: false,
            discount_rate: None,
            visible: true,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn description(&self) -> &str { &self.description }
    pub fn price(&self) -> &Money { &self.price }
    pub fn original_price(&self) -> &Money { &self.original_price }
    pub fn stock_quantity(&self) -> u32 { self.stock_quantity.value() }
    pub fn on_discount(&self) -> bool { self.on_discount }
    pub fn discount_rate(&self) -> Option<Percent> { self.discount_rate }
    pub fn visible(&self) -> bool { self.visible }
    pub fn category_id(&self) -> Option<Uuid> { self.category_id }
    pub fn is_in_stock(&self) -> bool { !self.stock_quantity.is_zero() }

    /// Reduce the current price by `rate` and flag the product as discounted.
    pub fn apply_discount(&mut self, rate: Percent) -> Result<(), ProductError> {
        if self.on_discount { return Err(ProductError::AlreadyDiscounted); }
        self.price = self.price.percent_off(rate);
        self.on_discount = true;
        self.discount_rate = Some(rate);
        self.touch();
        Ok(())
    }

    /// Restore the pre-discount price and clear the discount flags.
    pub fn clear_discount(&mut self) {
        self.price = self.original_price.clone();
        self.on_discount = false;
        self.discount_rate = None;
        self.touch();
    }

    pub fn decrement_stock(&mut self, qty: u32) -> Result<(), ProductError> {
        self.stock_quantity = self
            .stock_quantity
            .subtract(qty)
            .ok_or(ProductError::InsufficientStock)?;
        self.touch();
        Ok(())
    }

    pub fn restock(&mut self, qty: u32) {
        self.stock_quantity = self.stock_quantity.add(qty);
        self.touch();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.touch();
    }

    /// Edit catalog fields. The price may not change while an active discount
    /// manages it.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        category_id: Option<Uuid>,
    ) -> Result<(), ProductError> {
        if self.on_discount {
            if price != self.price { return Err(ProductError::PriceLocked); }
        } else {
            self.original_price = price.clone();
            self.price = price;
        }
        self.name = name.into();
        self.description = description.into();
        self.category_id = category_id;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone)]
pub enum ProductError { AlreadyDiscounted, InsufficientStock, PriceLocked }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyDiscounted => write!(f, "product already carries an active discount"),
            Self::InsufficientStock => write!(f, "insufficient stock"),
            Self::PriceLocked => write!(f, "price is managed by an active discount"),
        }
    }
}

//! Discount Aggregate
//!
//! A percentage reduction over a fixed product set. Activation freezes
//! structural edits until the discount is deactivated again; a product may
//! belong to at most one active discount at a time (checked transactionally
//! at activation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Percent;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub(crate) id: Uuid,
    pub(crate) description: String,
    pub(crate) rate: Percent,
    pub(crate) is_active: bool,
    pub(crate) promo_code: Option<String>,
    pub(crate) product_ids: Vec<Uuid>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Discount {
    pub fn create(description: impl Into<String>, rate: Percent, promo_code: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            rate,
            is_active: false,
            promo_code,
            product_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn description(&self) -> &str { &self.description }
    pub fn rate(&self) -> Percent { self.rate }
    pub fn is_active(&self) -> bool { self.is_active }
    pub fn promo_code(&self) -> Option<&str> { self.promo_code.as_deref() }
    pub fn product_ids(&self) -> &[Uuid] { &self.product_ids }

    pub fn ensure_editable(&self) -> Result<(), DiscountError> {
        if self.is_active { return Err(DiscountError::ActiveIsFrozen); }
        Ok(())
    }

    pub fn ensure_activatable(&self) -> Result<(), DiscountError> {
        if self.is_active { return Err(DiscountError::AlreadyActive); }
        if self.promo_code.is_none() && self.product_ids.is_empty() {
            return Err(DiscountError::NoProducts);
        }
        Ok(())
    }

    pub fn ensure_deactivatable(&self) -> Result<(), DiscountError> {
        if !self.is_active { return Err(DiscountError::AlreadyInactive); }
        Ok(())
    }

    pub fn update(
        &mut self,
        description: impl Into<String>,
        rate: Percent,
        promo_code: Option<String>,
    ) -> Result<(), DiscountError> {
        self.ensure_editable()?;
        self.description = description.into();
        self.rate = rate;
        self.promo_code = promo_code;
        self.touch();
        Ok(())
    }

    pub fn add_product(&mut self, product_id: Uuid) -> Result<(), DiscountError> {
        self.ensure_editable()?;
        if self.product_ids.contains(&product_id) {
            return Err(DiscountError::ProductAlreadyListed);
        }
        self.product_ids.push(product_id);
        self.touch();
        Ok(())
    }

    pub fn remove_product(&mut self, product_id: Uuid) -> Result<(), DiscountError> {
        self.ensure_editable()?;
        let before = self.product_ids.len();
        self.product_ids.retain(|id| *id != product_id);
        if self.product_ids.len() == before {
            return Err(DiscountError::ProductNotListed);
        }
        self.touch();
        Ok(())
    }

    pub(crate) fn set_active_flag(&mut self, active: bool) {
        self.is_active = active;
        self.touch();
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone)]
pub enum DiscountError {
    ActiveIsFrozen,
    AlreadyActive,
    AlreadyInactive,
    NoProducts,
    ProductAlreadyListed,
    ProductNotListed,
}
impl std::error::Error for DiscountError {}
impl std::fmt::Display for DiscountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActiveIsFrozen => write!(f, "discount must be deactivated before editing"),
            Self::AlreadyActive => write!(f, "discount is already active"),
            Self::AlreadyInactive => write!(f, "discount is already inactive"),
            Self::NoProducts => write!(f, "discount has no applicable products"),
            Self::ProductAlreadyListed => write!(f, "product is already listed on this discount"),
            Self::ProductNotListed => write!(f, "product is not listed on this discount"),
        }
    }
}

//! Persistence behind traits.
//!
//! The HTTP-facing services hold trait objects so the engine and finalizer
//! can be exercised against an in-memory double in tests. The Postgres
//! implementation owns every multi-row invariant: compare-and-swap cart
//! saves, floor-checked stock decrements and the discount check-and-set all
//! happen inside a single statement or transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Cart, CartOwner, Category, Discount, Product, Sale, SaleStatus, StatusJob};

pub mod pg;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A compare-and-swap cart save lost against a concurrent writer.
    #[error("concurrent modification detected")]
    VersionConflict,
    #[error("{0}")]
    Conflict(String),
    #[error("{product} is out of stock")]
    OutOfStock { product: String },
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    Invalid(String),
    #[error("stored document corrupt: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("23505") {
                return Self::Duplicate(db.message().to_string());
            }
        }
        Self::Database(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub include_hidden: bool,
    pub category: Option<Uuid>,
}

/// A cart as it sits in storage. `cart` is `None` when the owner has no cart
/// yet; `version` feeds the compare-and-swap save.
#[derive(Debug, Clone)]
pub struct StoredCart {
    pub cart: Option<Cart>,
    pub version: i64,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), StoreError>;
    async fn insert(&self, product: &Product) -> Result<(), StoreError>;
    async fn update(&self, product: &Product) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Atomic stock increment; returns the updated product.
    async fn restock(&self, id: Uuid, quantity: u32) -> Result<Option<Product>, StoreError>;
    async fn count_in_category(&self, category_id: Uuid) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the owner's cart. A member without a user record is an error; an
    /// owner without a cart yields `cart: None` at version 0.
    async fn load(&self, owner: &CartOwner) -> Result<StoredCart, StoreError>;
    /// Compare-and-swap save: fails with `VersionConflict` when the stored
    /// version no longer matches `expected_version`. Returns the new version.
    async fn save(&self, owner: &CartOwner, cart: &Cart, expected_version: i64) -> Result<i64, StoreError>;
    async fn clear(&self, owner: &CartOwner) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Persist the sale, its scheduled status transitions, and decrement
    /// stock for every cart line, all-or-nothing. Any line failing the
    /// `stock_quantity >= quantity` floor fails the whole sale.
    async fn finalize(&self, sale: &Sale, jobs: &[StatusJob]) -> Result<(), StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<Sale>, StoreError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Sale>, i64), StoreError>;
    /// Admin status write; also cancels any still-pending scheduled
    /// transitions for the sale.
    async fn set_status(&self, id: Uuid, status: SaleStatus) -> Result<Option<Sale>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn due_jobs(&self, now: DateTime<Utc>) -> Result<Vec<StatusJob>, StoreError>;
    /// Apply one scheduled transition: moves the sale only if it still sits
    /// in the job's source status, and consumes the job either way.
    async fn apply_job(&self, job: &StatusJob) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait DiscountStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Discount>, StoreError>;
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Discount>, StoreError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Discount>, i64), StoreError>;
    async fn insert(&self, discount: &Discount) -> Result<(), StoreError>;
    async fn update(&self, discount: &Discount) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Transactional check-and-set activation toggle. Activating applies the
    /// percentage to every applicable product and fails with a conflict if
    /// any of them already carries another active discount; deactivating
    /// restores original prices. Nothing is applied on failure.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Discount, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, StoreError>;
    async fn list(&self, parent: Option<Uuid>) -> Result<Vec<Category>, StoreError>;
    async fn insert(&self, category: &Category) -> Result<(), StoreError>;
    async fn update(&self, category: &Category) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

//! Sale finalizer.
//!
//! Converts the active cart into an immutable sale snapshot. Stock is
//! decremented per line with a floor check inside the same transaction as
//! the sale insert, so an oversell fails the whole sale and nothing is
//! applied. Status progression is not an in-process timer: two scheduled
//! transitions are persisted alongside the sale and applied by the
//! scheduler worker, so they survive restarts and can be canceled.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::cart::CartEngine;
use crate::domain::events::DomainEvent;
use crate::domain::{CartOwner, CustomerInfo, PaymentMethod, Sale, SaleStatus, StatusJob};
use crate::error::ApiError;
use crate::events::EventPublisher;
use crate::store::{CartStore, SaleStore};

#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
}

#[derive(Clone)]
pub struct CheckoutService {
    engine: CartEngine,
    carts: Arc<dyn CartStore>,
    sales: Arc<dyn SaleStore>,
    events: EventPublisher,
    register_delay_secs: u64,
    process_delay_secs: u64,
}

impl CheckoutService {
    pub fn new(
        engine: CartEngine,
        carts: Arc<dyn CartStore>,
        sales: Arc<dyn SaleStore>,
        events: EventPublisher,
        register_delay_secs: u64,
        process_delay_secs: u64,
    ) -> Self {
        Self { engine, carts, sales, events, register_delay_secs, process_delay_secs }
    }

    /// Finalize the owner's active cart into a sale. Fails fast with
    /// `NoActiveCart` when no owner resolves or the cart is empty.
    pub async fn create_sale(
        &self,
        owner: Option<&CartOwner>,
        new_sale: NewSale,
    ) -> Result<Sale, ApiError> {
        let owner = owner.ok_or(ApiError::NoActiveCart)?;
        // one re-pricing pass so the snapshot embeds live prices
        let cart = self.engine.get_cart(owner).await?;
        if cart.is_empty() {
            return Err(ApiError::NoActiveCart);
        }

        let sale = Sale::create(sale_number(), new_sale.customer, new_sale.payment_method, cart);
        let registered_at = Utc::now() + Duration::seconds(self.register_delay_secs as i64);
        let processing_at = registered_at + Duration::seconds(self.process_delay_secs as i64);
        let jobs = [
            StatusJob::new(sale.id(), SaleStatus::Pending, SaleStatus::Registered, registered_at),
            StatusJob::new(sale.id(), SaleStatus::Registered, SaleStatus::Processing, processing_at),
        ];
        self.sales.finalize(&sale, &jobs).await?;
        self.carts.clear(owner).await?;

        info!(sale_id = %sale.id(), sale_number = sale.sale_number(), total = %sale.total(), "sale created");
        self.events
            .publish(&DomainEvent::SaleCreated {
                sale_id: sale.id(),
                sale_number: sale.sale_number().to_string(),
                total: sale.total().amount(),
                currency: sale.total().currency().to_string(),
            })
            .await;
        Ok(sale)
    }

    pub async fn get_sale(&self, id: Uuid) -> Result<Sale, ApiError> {
        self.sales
            .find(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("sale not found".to_string()))
    }

    pub async fn list_sales(&self, limit: i64, offset: i64) -> Result<(Vec<Sale>, i64), ApiError> {
        Ok(self.sales.list(limit, offset).await?)
    }

    /// Explicit admin status write. Cancels any still-scheduled progression
    /// for the sale. Delivered sales are final.
    pub async fn update_status(&self, id: Uuid, to: SaleStatus) -> Result<Sale, ApiError> {
        let mut sale = self.get_sale(id).await?;
        let from = sale.status();
        sale.set_status(to)?;
        let updated = self
            .sales
            .set_status(id, to)
            .await?
            .ok_or_else(|| ApiError::NotFound("sale not found".to_string()))?;
        info!(sale_id = %id, from = %from, to = %to, "sale status updated");
        self.events
            .publish(&DomainEvent::SaleStatusChanged { sale_id: id, from, to })
            .await;
        Ok(updated)
    }

    pub async fn delete_sale(&self, id: Uuid) -> Result<(), ApiError> {
        let sale = self.get_sale(id).await?;
        if !sale.can_delete() {
            return Err(ApiError::Conflict("delivered sales cannot be deleted".to_string()));
        }
        if !self.sales.delete(id).await? {
            return Err(ApiError::NotFound("sale not found".to_string()));
        }
        info!(sale_id = %id, "sale deleted");
        Ok(())
    }
}

fn sale_number() -> String {
    format!("SALE-{:08}", rand::random::<u32>() % 100_000_000)
}

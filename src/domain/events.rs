//! Domain events

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::sale::SaleStatus;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    SaleCreated { sale_id: Uuid, sale_number: String, total: Decimal, currency: String },
    SaleStatusChanged { sale_id: Uuid, from: SaleStatus, to: SaleStatus },
    CartMerged { user_id: Uuid, merged_lines: usize },
    DiscountActivated { discount_id: Uuid, products: usize },
    DiscountDeactivated { discount_id: Uuid },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::SaleCreated { .. } => "cartwright.sales.created",
            Self::SaleStatusChanged { .. } => "cartwright.sales.status",
            Self::CartMerged { .. } => "cartwright.carts.merged",
            Self::DiscountActivated { .. } => "cartwright.discounts.activated",
            Self::DiscountDeactivated { .. } => "cartwright.discounts.deactivated",
        }
    }
}

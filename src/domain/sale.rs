//! Sale Aggregate
//!
//! A sale is an immutable snapshot of the cart at the moment of purchase.
//! After creation only the status moves, either through the scheduled
//! progression worker or explicit admin action. Delivered is final.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::value_objects::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Registered,
    Processing,
    InTransit,
    Delay,
    Delivered,
    Canceled,
    Refused,
    Refund,
    Lost,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Registered => "registered",
            Self::Processing => "processing",
            Self::InTransit => "in_transit",
            Self::Delay => "delay",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
            Self::Refused => "refused",
            Self::Refund => "refund",
            Self::Lost => "lost",
        }
    }
}

impl FromStr for SaleStatus {
    type Err = ParseStatusError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "registered" => Ok(Self::Registered),
            "processing" => Ok(Self::Processing),
            "in_transit" => Ok(Self::InTransit),
            "delay" => Ok(Self::Delay),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            "refused" => Ok(Self::Refused),
            "refund" => Ok(Self::Refund),
            "lost" => Ok(Self::Lost),
            _ => Err(ParseStatusError),
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ParseStatusError;
impl std::error::Error for ParseStatusError {}
impl std::fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sale status")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::Card => "card",
            Self::Transfer => "transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseStatusError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            "card" => Ok(Self::Card),
            "transfer" => Ok(Self::Transfer),
            _ => Err(ParseStatusError),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub(crate) id: Uuid,
    pub(crate) sale_number: String,
    pub(crate) customer: CustomerInfo,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) cart: Cart,
    pub(crate) total: Money,
    pub(crate) status: SaleStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn create(
        sale_number: String,
        customer: CustomerInfo,
        payment_method: PaymentMethod,
        cart: Cart,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sale_number,
            customer,
            payment_method,
            total: cart.total().clone(),
            cart,
            status: SaleStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn sale_number(&self) -> &str { &self.sale_number }
    pub fn customer(&self) -> &CustomerInfo { &self.customer }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn total(&self) -> &Money { &self.total }
    pub fn status(&self) -> SaleStatus { self.status }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn set_status(&mut self, to: SaleStatus) -> Result<(), SaleError> {
        if self.status == SaleStatus::Delivered {
            return Err(SaleError::DeliveredIsFinal);
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn can_delete(&self) -> bool { self.status != SaleStatus::Delivered }
}

/// A persisted, re-enterable status transition: applied by the scheduler
/// once due, and only while the sale still sits in `from_status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusJob {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub from_status: SaleStatus,
    pub to_status: SaleStatus,
    pub due_at: DateTime<Utc>,
}

impl StatusJob {
    pub fn new(sale_id: Uuid, from: SaleStatus, to: SaleStatus, due_at: DateTime<Utc>) -> Self {
        Self { id: Uuid::new_v4(), sale_id, from_status: from, to_status: to, due_at }
    }
}

#[derive(Debug, Clone)]
pub enum SaleError { DeliveredIsFinal }
impl std::error::Error for SaleError {}
impl std::fmt::Display for SaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "delivered sales are final")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Product;
    use rust_decimal::Decimal;

    fn snapshot() -> Cart {
        let p = Product::create("Widget", "", Money::new(Decimal::new(25, 0), "USD"), 4, None);
        let mut cart = Cart::empty("USD");
        cart.merge_line(&p, 2);
        cart
    }

    #[test]
    fn test_sale_snapshots_cart_total() {
        let customer = CustomerInfo {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            address: "1 Engine St".into(),
        };
        let sale = Sale::create("SALE-00000001".into(), customer, PaymentMethod::Card, snapshot());
        assert_eq!(sale.status(), SaleStatus::Pending);
        assert_eq!(sale.total().amount(), Decimal::new(50, 0));
        assert_eq!(sale.cart().line_count(), 1);
    }

    #[test]
    fn test_delivered_is_final() {
        let customer = CustomerInfo {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            address: "1 Engine St".into(),
        };
        let mut sale = Sale::create("SALE-00000002".into(), customer, PaymentMethod::Card, snapshot());
        sale.set_status(SaleStatus::Delivered).unwrap();
        assert!(matches!(sale.set_status(SaleStatus::Canceled), Err(SaleError::DeliveredIsFinal)));
        assert!(!sale.can_delete());
    }

    #[test]
    fn test_status_roundtrips_through_strings() {
        for status in [
            SaleStatus::Pending,
            SaleStatus::Registered,
            SaleStatus::Processing,
            SaleStatus::InTransit,
            SaleStatus::Delay,
            SaleStatus::Delivered,
            SaleStatus::Canceled,
            SaleStatus::Refused,
            SaleStatus::Refund,
            SaleStatus::Lost,
        ] {
            assert_eq!(status.as_str().parse::<SaleStatus>().unwrap(), status);
        }
    }
}

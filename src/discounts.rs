//! Discount applier and CRUD.
//!
//! Structural edits are only allowed while a discount is inactive. The
//! activation toggle itself runs as a transactional check-and-set in the
//! store: a product already under another active discount fails the whole
//! activation with a conflict.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::domain::{Discount, Percent};
use crate::error::ApiError;
use crate::events::EventPublisher;
use crate::store::{DiscountStore, ProductStore};

#[derive(Debug, Clone)]
pub struct NewDiscount {
    pub description: String,
    pub rate: u8,
    pub promo_code: Option<String>,
}

#[derive(Clone)]
pub struct DiscountService {
    discounts: Arc<dyn DiscountStore>,
    products: Arc<dyn ProductStore>,
    events: EventPublisher,
}

impl DiscountService {
    pub fn new(
        discounts: Arc<dyn DiscountStore>,
        products: Arc<dyn ProductStore>,
        events: EventPublisher,
    ) -> Self {
        Self { discounts, products, events }
    }

    pub async fn create(&self, new: NewDiscount) -> Result<Discount, ApiError> {
        let rate = parse_rate(new.rate)?;
        let discount = Discount::create(new.description, rate, new.promo_code);
        self.discounts.insert(&discount).await?;
        Ok(discount)
    }

    pub async fn get(&self, id: Uuid) -> Result<Discount, ApiError> {
        self.discounts
            .find(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("discount not found".to_string()))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Discount>, i64), ApiError> {
        Ok(self.discounts.list(limit, offset).await?)
    }

    pub async fn update(&self, id: Uuid, new: NewDiscount) -> Result<Discount, ApiError> {
        let mut discount = self.get(id).await?;
        let rate = parse_rate(new.rate)?;
        discount.update(new.description, rate, new.promo_code)?;
        self.discounts.update(&discount).await?;
        Ok(discount)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let discount = self.get(id).await?;
        discount.ensure_editable()?;
        self.discounts.delete(id).await?;
        Ok(())
    }

    pub async fn add_product(&self, id: Uuid, product_id: Uuid) -> Result<Discount, ApiError> {
        let mut discount = self.get(id).await?;
        self.products
            .find(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("product not found".to_string()))?;
        discount.add_product(product_id)?;
        self.discounts.update(&discount).await?;
        Ok(discount)
    }

    pub async fn remove_product(&self, id: Uuid, product_id: Uuid) -> Result<Discount, ApiError> {
        let mut discount = self.get(id).await?;
        discount.remove_product(product_id)?;
        self.discounts.update(&discount).await?;
        Ok(discount)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Discount, ApiError> {
        let discount = self.discounts.set_active(id, active).await?;
        info!(discount_id = %id, active, "discount toggled");
        let event = if active {
            DomainEvent::DiscountActivated { discount_id: id, products: discount.product_ids().len() }
        } else {
            DomainEvent::DiscountDeactivated { discount_id: id }
        };
        self.events.publish(&event).await;
        Ok(discount)
    }
}

fn parse_rate(rate: u8) -> Result<Percent, ApiError> {
    Percent::new(rate).map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, Product};
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;

    fn service(store: &Arc<MemoryStore>) -> DiscountService {
        DiscountService::new(store.clone(), store.clone(), EventPublisher::new(None))
    }

    fn product(name: &str, price: i64) -> Product {
        Product::create(name, "", Money::new(Decimal::new(price, 0), "USD"), 10, None)
    }

    fn spring(rate: u8) -> NewDiscount {
        NewDiscount { description: "spring sale".into(), rate, promo_code: None }
    }

    #[tokio::test]
    async fn activation_applies_the_rate_to_every_product() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let a = product("A", 100);
        let b = product("B", 40);
        store.seed_product(a.clone());
        store.seed_product(b.clone());

        let discount = service.create(spring(20)).await.unwrap();
        service.add_product(discount.id(), a.id()).await.unwrap();
        service.add_product(discount.id(), b.id()).await.unwrap();

        let activated = service.set_active(discount.id(), true).await.unwrap();
        assert!(activated.is_active());

        let a = store.product(a.id()).unwrap();
        assert!(a.on_discount());
        assert_eq!(a.price().amount(), Decimal::new(80, 0));
        assert_eq!(a.original_price().amount(), Decimal::new(100, 0));
        let b = store.product(b.id()).unwrap();
        assert_eq!(b.price().amount(), Decimal::new(32, 0));
    }

    #[tokio::test]
    async fn deactivation_restores_original_prices() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let a = product("A", 100);
        store.seed_product(a.clone());

        let discount = service.create(spring(25)).await.unwrap();
        service.add_product(discount.id(), a.id()).await.unwrap();
        service.set_active(discount.id(), true).await.unwrap();
        service.set_active(discount.id(), false).await.unwrap();

        let a = store.product(a.id()).unwrap();
        assert!(!a.on_discount());
        assert!(a.discount_rate().is_none());
        assert_eq!(a.price().amount(), Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn activation_conflicts_when_a_product_is_already_discounted() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let clean = product("Clean", 100);
        let shared = product("Shared", 100);
        store.seed_product(clean.clone());
        store.seed_product(shared.clone());

        let first = service.create(spring(10)).await.unwrap();
        service.add_product(first.id(), shared.id()).await.unwrap();
        service.set_active(first.id(), true).await.unwrap();

        let second = service.create(NewDiscount {
            description: "flash sale".into(),
            rate: 50,
            promo_code: None,
        })
        .await
        .unwrap();
        service.add_product(second.id(), clean.id()).await.unwrap();
        service.add_product(second.id(), shared.id()).await.unwrap();

        let err = service.set_active(second.id(), true).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // nothing was applied, including to the clean product
        let clean = store.product(clean.id()).unwrap();
        assert!(!clean.on_discount());
        assert_eq!(clean.price().amount(), Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn activation_requires_products_unless_promo_coded() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let plain = service.create(spring(10)).await.unwrap();
        let err = service.set_active(plain.id(), true).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let promo = service.create(NewDiscount {
            description: "welcome".into(),
            rate: 10,
            promo_code: Some("WELCOME".into()),
        })
        .await
        .unwrap();
        assert!(service.set_active(promo.id(), true).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn double_toggle_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let a = product("A", 100);
        store.seed_product(a.clone());
        let discount = service.create(spring(10)).await.unwrap();
        service.add_product(discount.id(), a.id()).await.unwrap();

        service.set_active(discount.id(), true).await.unwrap();
        assert!(matches!(
            service.set_active(discount.id(), true).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
        service.set_active(discount.id(), false).await.unwrap();
        assert!(matches!(
            service.set_active(discount.id(), false).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn structural_edits_are_frozen_while_active() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let a = product("A", 100);
        let b = product("B", 50);
        store.seed_product(a.clone());
        store.seed_product(b.clone());
        let discount = service.create(spring(10)).await.unwrap();
        service.add_product(discount.id(), a.id()).await.unwrap();
        service.set_active(discount.id(), true).await.unwrap();

        assert!(matches!(
            service.add_product(discount.id(), b.id()).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            service.update(discount.id(), spring(50)).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            service.delete(discount.id()).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn rate_above_100_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let err = service.create(spring(101)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

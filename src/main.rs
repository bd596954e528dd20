//! Cartwright - Self-hosted E-commerce Backend

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartwright::api::{self, AppState};
use cartwright::cart::CartEngine;
use cartwright::checkout::CheckoutService;
use cartwright::config::AppConfig;
use cartwright::discounts::DiscountService;
use cartwright::events::EventPublisher;
use cartwright::scheduler::StatusScheduler;
use cartwright::store::pg::PgStore;
use cartwright::store::{CartStore, CategoryStore, DiscountStore, ProductStore, SaleStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new().max_connections(10).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "NATS unavailable, event publishing disabled");
                None
            }
        },
        None => None,
    };
    let events = EventPublisher::new(nats);

    let store = Arc::new(PgStore::new(db));
    let products: Arc<dyn ProductStore> = store.clone();
    let carts: Arc<dyn CartStore> = store.clone();
    let sales: Arc<dyn SaleStore> = store.clone();
    let discounts: Arc<dyn DiscountStore> = store.clone();
    let categories: Arc<dyn CategoryStore> = store;

    let engine = CartEngine::new(
        products.clone(),
        carts.clone(),
        discounts.clone(),
        events.clone(),
        &config.currency,
    );
    let checkout = CheckoutService::new(
        engine.clone(),
        carts,
        sales.clone(),
        events.clone(),
        config.sale_register_delay_secs,
        config.sale_process_delay_secs,
    );
    let discount_service = DiscountService::new(discounts, products.clone(), events.clone());

    let scheduler = StatusScheduler::new(
        sales,
        events,
        Duration::from_secs(config.scheduler_poll_secs),
    );
    tokio::spawn(scheduler.run());

    let state = AppState {
        products,
        categories,
        engine,
        checkout,
        discounts: discount_service,
        currency: config.currency.clone(),
        cart_cookie_max_age: config.cart_cookie_max_age_secs,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("🚀 cartwright listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}

//! Sale status progression worker.
//!
//! Polls the persisted `sale_status_jobs` table and applies due
//! transitions. A job only moves a sale that still sits in the job's source
//! status, so an explicit admin write supersedes the schedule; either way
//! the job is consumed. Because the schedule lives in the store, it
//! survives process restarts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::events::DomainEvent;
use crate::events::EventPublisher;
use crate::store::{SaleStore, StoreError};

pub struct StatusScheduler {
    sales: Arc<dyn SaleStore>,
    events: EventPublisher,
    poll: Duration,
}

impl StatusScheduler {
    pub fn new(sales: Arc<dyn SaleStore>, events: EventPublisher, poll: Duration) -> Self {
        Self { sales, events, poll }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.poll);
        loop {
            ticker.tick().await;
            if let Err(e) = self.tick().await {
                warn!(error = %e, "status progression tick failed");
            }
        }
    }

    /// Apply every due transition once. Returns the number applied.
    pub async fn tick(&self) -> Result<u32, StoreError> {
        let jobs = self.sales.due_jobs(Utc::now()).await?;
        let mut applied = 0;
        for job in jobs {
            match self.sales.apply_job(&job).await {
                Ok(true) => {
                    applied += 1;
                    info!(sale_id = %job.sale_id, from = %job.from_status, to = %job.to_status, "sale status progressed");
                    self.events
                        .publish(&DomainEvent::SaleStatusChanged {
                            sale_id: job.sale_id,
                            from: job.from_status,
                            to: job.to_status,
                        })
                        .await;
                }
                Ok(false) => {
                    debug!(sale_id = %job.sale_id, "transition skipped, sale left its source status");
                }
                Err(e) => {
                    warn!(sale_id = %job.sale_id, error = %e, "failed to apply status transition");
                }
            }
        }
        Ok(applied)
    }
}

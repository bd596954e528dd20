//! Best-effort domain event publishing over NATS.
//!
//! Publishing failures are logged and never surfaced to clients.

use crate::domain::events::DomainEvent;

#[derive(Clone)]
pub struct EventPublisher {
    client: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(client: Option<async_nats::Client>) -> Self {
        Self { client }
    }

    pub async fn publish(&self, event: &DomainEvent) {
        let Some(client) = &self.client else { return };
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode domain event");
                return;
            }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            tracing::warn!(error = %e, subject = event.subject(), "failed to publish domain event");
        }
    }
}

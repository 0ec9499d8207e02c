use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::onboarding::EventPublisher;

/// Publishes events as structured log records. Used when no broker is configured.
#[derive(Default)]
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, topic: &str, payload: Map<String, Value>) -> Result<()> {
        let payload = serde_json::to_string(&payload)?;
        tracing::info!(topic = %topic, payload = %payload, "📣 Onboarding event");
        Ok(())
    }
}

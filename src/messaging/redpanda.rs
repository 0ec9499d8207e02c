use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde_json::{Map, Value};

use crate::domain::onboarding::EventPublisher;
use crate::utils::{BreakerConfig, BreakerError, CircuitBreaker};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedpandaClient {
    producer: FutureProducer,
    circuit_breaker: CircuitBreaker,
}

impl RedpandaClient {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| anyhow::anyhow!("Failed to create Redpanda producer: {}", e))?;

        let breaker_config = BreakerConfig {
            failure_threshold: 5,
            cool_down: Duration::from_secs(30),
            probe_successes: 3,
        };

        Ok(Self {
            producer,
            circuit_breaker: CircuitBreaker::new("redpanda", breaker_config),
        })
    }

    pub async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<()> {
        let result = self
            .circuit_breaker
            .guard(async {
                let record = FutureRecord::to(topic).key(key).payload(payload);

                self.producer
                    .send(record, rdkafka::util::Timeout::After(SEND_TIMEOUT))
                    .await
                    .map_err(|(e, _)| anyhow::anyhow!("Kafka send error: {}", e))?;

                Ok::<(), anyhow::Error>(())
            })
            .await;

        match result {
            Ok(()) => {
                tracing::info!(topic = %topic, key = %key, "Published to Redpanda");
                Ok(())
            }
            Err(BreakerError::Open) => {
                tracing::error!(topic = %topic, "Circuit breaker open - Redpanda unavailable");
                Err(anyhow::anyhow!("Circuit breaker open for Redpanda"))
            }
            Err(BreakerError::Inner(e)) => {
                tracing::error!(error = %e, topic = %topic, "Failed to publish to Redpanda");
                Err(e)
            }
        }
    }
}

// ============================================================================
// Redpanda Event Publisher
// ============================================================================
//
// Maps onboarding events onto Redpanda topics named `<prefix><topic>`.
// The record key is the subject of the event (national_id or customer_id)
// so all events about one person land on the same partition.
//
// ============================================================================

pub struct RedpandaEventPublisher {
    client: RedpandaClient,
    topic_prefix: String,
}

impl RedpandaEventPublisher {
    pub fn new(client: RedpandaClient, topic_prefix: impl Into<String>) -> Self {
        Self {
            client,
            topic_prefix: topic_prefix.into(),
        }
    }
}

fn record_key(payload: &Map<String, Value>) -> String {
    ["national_id", "customer_id"]
        .iter()
        .find_map(|field| payload.get(*field).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl EventPublisher for RedpandaEventPublisher {
    async fn publish(&self, topic: &str, payload: Map<String, Value>) -> Result<()> {
        let key = record_key(&payload);
        let body = serde_json::to_string(&payload)?;
        let full_topic = format!("{}{}", self.topic_prefix, topic);

        self.client.publish(&full_topic, &key, &body).await
    }
}

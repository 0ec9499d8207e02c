use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::metrics::Metrics;

use super::errors::OnboardingError;
use super::events::{OnboardingEvent, RejectionReason};
use super::outcome::OnboardingOutcome;
use super::ports::{AddressNormalizer, CustomerStore, EventPublisher, SanctionsOracle};
use super::value_objects::{CustomerApplication, NormalizedCustomerRecord};

// ============================================================================
// Onboarding Service
// ============================================================================
//
// Orchestrates: Sanctions → Dedup → Normalize → Create → Publish
//
// Each gate may end the attempt early. Every path publishes exactly one event.
// The service holds no mutable state; one instance serves concurrent calls.
//
// ============================================================================

#[derive(Clone)]
pub struct OnboardingService {
    sanctions: Arc<dyn SanctionsOracle>,
    normalizer: Arc<dyn AddressNormalizer>,
    store: Arc<dyn CustomerStore>,
    publisher: Arc<dyn EventPublisher>,
    metrics: Option<Arc<Metrics>>,
}

impl OnboardingService {
    pub fn new(
        sanctions: Arc<dyn SanctionsOracle>,
        normalizer: Arc<dyn AddressNormalizer>,
        store: Arc<dyn CustomerStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            sanctions,
            normalizer,
            store,
            publisher,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one onboarding attempt to completion
    pub async fn onboard(
        &self,
        application: &CustomerApplication,
    ) -> Result<OnboardingOutcome, OnboardingError> {
        let span = tracing::info_span!("onboard", national_id = %application.national_id);
        let started = Instant::now();

        let result = self.run(application).instrument(span.clone()).await;

        if let Ok(outcome) = &result {
            span.in_scope(|| {
                tracing::info!(
                    status = outcome.status(),
                    customer_id = ?outcome.customer_id(),
                    "Onboarding finished"
                );
            });
        }

        if let Some(metrics) = &self.metrics {
            let elapsed = started.elapsed().as_secs_f64();
            match &result {
                Ok(outcome) => metrics.record_outcome(outcome.status(), elapsed),
                Err(e) => metrics.record_failure(e.stage(), elapsed),
            }
        }

        result
    }

    async fn run(
        &self,
        application: &CustomerApplication,
    ) -> Result<OnboardingOutcome, OnboardingError> {
        // 1) Compliance gate
        let hit = self
            .sanctions
            .check(&application.name, &application.dob)
            .await
            .map_err(OnboardingError::SanctionsCheck)?;

        if hit {
            tracing::warn!("Sanctions hit, rejecting application");
            self.emit(OnboardingEvent::Rejected {
                reason: RejectionReason::SanctionsHit,
                national_id: application.national_id.clone(),
            })
            .await?;
            return Ok(OnboardingOutcome::Rejected);
        }

        // 2) Deduplication gate
        let existing = self
            .store
            .lookup(&application.national_id)
            .await
            .map_err(OnboardingError::Lookup)?;

        if let Some(existing) = existing {
            tracing::info!(customer_id = %existing.customer_id, "Customer already onboarded");
            self.emit(OnboardingEvent::Duplicate {
                national_id: application.national_id.clone(),
            })
            .await?;
            return Ok(OnboardingOutcome::Duplicate);
        }

        // 3) Best-effort address normalization
        let address = self.normalize_address(&application.address).await;
        let record = NormalizedCustomerRecord::from_application(application, address);

        // 4) Persist
        let customer_id = self
            .store
            .create(&record)
            .await
            .map_err(OnboardingError::Create)?;

        tracing::info!(customer_id = %customer_id, "✅ Customer created");

        // 5) Notify
        self.emit(OnboardingEvent::Completed { customer_id }).await?;

        Ok(OnboardingOutcome::Created { customer_id })
    }

    /// Any normalizer error is swallowed and the raw address is used instead.
    async fn normalize_address(&self, raw: &str) -> String {
        match self.normalizer.normalize(raw).await {
            Ok(normalized) => normalized,
            Err(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_normalization_fallback();
                }
                raw.to_string()
            }
        }
    }

    async fn emit(&self, event: OnboardingEvent) -> Result<(), OnboardingError> {
        let topic = event.topic();

        self.publisher
            .publish(topic, event.payload())
            .await
            .map_err(|source| OnboardingError::Publish { topic, source })?;

        if let Some(metrics) = &self.metrics {
            metrics.record_event_published(topic);
        }

        tracing::debug!(topic = %topic, "Published onboarding event");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::testing::{
        make_application, Call, CallLog, FailingPublisher, StubNormalizer, StubOracle,
        StubPublisher, StubStore,
    };
    use crate::domain::onboarding::value_objects::{CustomerId, StoredCustomer};
    use serde_json::{json, Value};
    use uuid::Uuid;

    struct Harness {
        log: CallLog,
        publisher: Arc<StubPublisher>,
        store: Arc<StubStore>,
        service: OnboardingService,
    }

    fn harness(
        hit: anyhow::Result<bool>,
        existing: Option<StoredCustomer>,
        normalized: anyhow::Result<String>,
        created: CustomerId,
    ) -> Harness {
        let log = CallLog::default();
        let publisher = Arc::new(StubPublisher::new(log.clone()));
        let store = Arc::new(StubStore::new(log.clone(), Ok(existing), Ok(created)));
        let service = OnboardingService::new(
            Arc::new(StubOracle::new(log.clone(), hit)),
            Arc::new(StubNormalizer::new(log.clone(), normalized)),
            store.clone(),
            publisher.clone(),
        );
        Harness { log, publisher, store, service }
    }

    fn fixed_id() -> CustomerId {
        CustomerId(Uuid::from_u128(42))
    }

    fn existing_customer() -> StoredCustomer {
        let app = make_application();
        StoredCustomer::from_record(
            CustomerId(Uuid::from_u128(7)),
            &NormalizedCustomerRecord::from_application(&app, app.address.clone()),
        )
    }

    #[tokio::test]
    async fn test_normalizes_address_and_creates() {
        let app = make_application();
        let h = harness(
            Ok(false),
            None,
            Ok("Pilekrogen 49, 1451 København K (N)".to_string()),
            fixed_id(),
        );

        let out = h.service.onboard(&app).await.unwrap();

        assert_eq!(out, OnboardingOutcome::Created { customer_id: fixed_id() });
        assert_eq!(
            h.log.calls(),
            vec![
                Call::Check { name: app.name.clone(), dob: app.dob.clone() },
                Call::Lookup { national_id: app.national_id.clone() },
                Call::Normalize { address: app.address.clone() },
                Call::Create,
                Call::Publish { topic: "onboarding_completed".to_string() },
            ]
        );

        let created = h.store.created();
        assert_eq!(
            created,
            vec![NormalizedCustomerRecord {
                name: app.name.clone(),
                dob: app.dob.clone(),
                national_id: app.national_id.clone(),
                address: "Pilekrogen 49, 1451 København K (N)".to_string(),
            }]
        );

        assert_eq!(
            h.publisher.published(),
            vec![(
                "onboarding_completed".to_string(),
                json!({"customer_id": fixed_id().to_string()})
            )]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_raw_address_when_normalizer_fails() {
        let app = make_application();
        let h = harness(Ok(false), None, Err(anyhow::anyhow!("API down")), fixed_id());

        let out = h.service.onboard(&app).await.unwrap();

        assert_eq!(out.status(), "created");
        assert_eq!(out.customer_id(), Some(fixed_id()));
        assert_eq!(h.store.created()[0].address, app.address);
        assert_eq!(
            h.publisher.published(),
            vec![(
                "onboarding_completed".to_string(),
                json!({"customer_id": fixed_id().to_string()})
            )]
        );
    }

    #[tokio::test]
    async fn test_rejects_on_sanctions_hit_without_touching_other_collaborators() {
        let app = make_application();
        let h = harness(Ok(true), None, Ok("unused".to_string()), fixed_id());

        let out = h.service.onboard(&app).await.unwrap();

        assert_eq!(out, OnboardingOutcome::Rejected);
        assert_eq!(out.customer_id(), None);
        assert_eq!(
            h.log.calls(),
            vec![
                Call::Check { name: app.name.clone(), dob: app.dob.clone() },
                Call::Publish { topic: "onboarding_rejected".to_string() },
            ]
        );
        assert_eq!(
            h.publisher.published(),
            vec![(
                "onboarding_rejected".to_string(),
                json!({"reason": "sanctions_hit", "national_id": app.national_id})
            )]
        );
    }

    #[tokio::test]
    async fn test_duplicate_skips_normalization_and_create() {
        let app = make_application();
        let h = harness(Ok(false), Some(existing_customer()), Ok("unused".to_string()), fixed_id());

        let out = h.service.onboard(&app).await.unwrap();

        assert_eq!(out, OnboardingOutcome::Duplicate);
        assert_eq!(
            h.log.calls(),
            vec![
                Call::Check { name: app.name.clone(), dob: app.dob.clone() },
                Call::Lookup { national_id: app.national_id.clone() },
                Call::Publish { topic: "onboarding_duplicate".to_string() },
            ]
        );
        assert!(h.store.created().is_empty());
        assert_eq!(
            h.publisher.published(),
            vec![(
                "onboarding_duplicate".to_string(),
                json!({"national_id": app.national_id})
            )]
        );
    }

    #[tokio::test]
    async fn test_sanctions_failure_propagates() {
        let app = make_application();
        let h = harness(Err(anyhow::anyhow!("watchlist offline")), None, Ok("n".to_string()), fixed_id());

        let err = h.service.onboard(&app).await.unwrap_err();

        assert!(matches!(err, OnboardingError::SanctionsCheck(_)));
        assert_eq!(h.log.calls().len(), 1);
        assert!(h.publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let app = make_application();
        let log = CallLog::default();
        let publisher = Arc::new(StubPublisher::new(log.clone()));
        let service = OnboardingService::new(
            Arc::new(StubOracle::new(log.clone(), Ok(false))),
            Arc::new(StubNormalizer::new(log.clone(), Ok("n".to_string()))),
            Arc::new(StubStore::new(log.clone(), Err(anyhow::anyhow!("store down")), Ok(fixed_id()))),
            publisher.clone(),
        );

        let err = service.onboard(&app).await.unwrap_err();

        assert!(matches!(err, OnboardingError::Lookup(_)));
        assert!(!log.calls().contains(&Call::Create));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_propagates_without_event() {
        let app = make_application();
        let log = CallLog::default();
        let publisher = Arc::new(StubPublisher::new(log.clone()));
        let service = OnboardingService::new(
            Arc::new(StubOracle::new(log.clone(), Ok(false))),
            Arc::new(StubNormalizer::new(log.clone(), Ok("n".to_string()))),
            Arc::new(StubStore::new(log.clone(), Ok(None), Err(anyhow::anyhow!("constraint violated")))),
            publisher.clone(),
        );

        let err = service.onboard(&app).await.unwrap_err();

        assert!(matches!(err, OnboardingError::Create(_)));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_after_create_keeps_record() {
        let app = make_application();
        let log = CallLog::default();
        let store = Arc::new(StubStore::new(log.clone(), Ok(None), Ok(fixed_id())));
        let service = OnboardingService::new(
            Arc::new(StubOracle::new(log.clone(), Ok(false))),
            Arc::new(StubNormalizer::new(log.clone(), Ok("n".to_string()))),
            store.clone(),
            Arc::new(FailingPublisher),
        );

        let err = service.onboard(&app).await.unwrap_err();

        match err {
            OnboardingError::Publish { topic, .. } => assert_eq!(topic, "onboarding_completed"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.created().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_on_short_circuit_paths_propagates_without_create() {
        let cases: Vec<(bool, Option<StoredCustomer>, &str)> = vec![
            (true, None, "onboarding_rejected"),
            (false, Some(existing_customer()), "onboarding_duplicate"),
        ];

        for (hit, existing, expected_topic) in cases {
            let log = CallLog::default();
            let store = Arc::new(StubStore::new(log.clone(), Ok(existing), Ok(fixed_id())));
            let service = OnboardingService::new(
                Arc::new(StubOracle::new(log.clone(), Ok(hit))),
                Arc::new(StubNormalizer::new(log.clone(), Ok("n".to_string()))),
                store.clone(),
                Arc::new(FailingPublisher),
            );

            let err = service.onboard(&make_application()).await.unwrap_err();

            match err {
                OnboardingError::Publish { topic, .. } => assert_eq!(topic, expected_topic),
                other => panic!("unexpected error: {other}"),
            }
            let calls = log.calls();
            assert!(!calls.contains(&Call::Create));
            assert_eq!(calls.iter().any(|c| matches!(c, Call::Lookup { .. })), !hit);
            assert!(store.created().is_empty());
        }
    }

    #[tokio::test]
    async fn test_exactly_one_event_per_outcome() {
        let cases: Vec<(anyhow::Result<bool>, Option<StoredCustomer>)> = vec![
            (Ok(true), None),
            (Ok(false), Some(existing_customer())),
            (Ok(false), None),
        ];

        for (hit, existing) in cases {
            let h = harness(hit, existing, Ok("n".to_string()), fixed_id());
            let out = h.service.onboard(&make_application()).await.unwrap();

            let published = h.publisher.published();
            assert_eq!(published.len(), 1);
            let expected_topic = match out {
                OnboardingOutcome::Rejected => "onboarding_rejected",
                OnboardingOutcome::Duplicate => "onboarding_duplicate",
                OnboardingOutcome::Created { .. } => "onboarding_completed",
            };
            assert_eq!(published[0].0, expected_topic);
            assert_eq!(out.customer_id().is_some(), out.status() == "created");
        }
    }

    #[tokio::test]
    async fn test_metrics_record_outcome_and_fallback() {
        let app = make_application();
        let metrics = Arc::new(Metrics::new().unwrap());
        let h = harness(Ok(false), None, Err(anyhow::anyhow!("timeout")), fixed_id());
        let service = h.service.clone().with_metrics(metrics.clone());

        service.onboard(&app).await.unwrap();

        assert_eq!(metrics.normalization_fallbacks.get(), 1);
        assert_eq!(metrics.onboarding_outcomes.with_label_values(&["created"]).get(), 1);
        assert_eq!(
            metrics.events_published.with_label_values(&["onboarding_completed"]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_completed_payload_carries_created_id() {
        let app = make_application();
        let id = CustomerId(Uuid::new_v4());
        let h = harness(Ok(false), None, Ok("n".to_string()), id);

        let out = h.service.onboard(&app).await.unwrap();

        let (_, payload) = &h.publisher.published()[0];
        assert_eq!(payload["customer_id"], Value::from(id.to_string()));
        assert_eq!(out.customer_id(), Some(id));
    }
}

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for onboarding
// ============================================================================
//
// Tracks:
// - Onboarding outcomes (rejected / duplicate / created)
// - Failures of must-succeed collaborators, by workflow stage
// - Address normalization fallbacks
// - Events published, by topic
// - End-to-end onboarding latency
//
// Exposed through GET /metrics (see server.rs).
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub onboarding_outcomes: IntCounterVec,
    pub onboarding_failures: IntCounterVec,
    pub onboarding_duration: HistogramVec,
    pub normalization_fallbacks: IntCounter,
    pub events_published: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let onboarding_outcomes = IntCounterVec::new(
            Opts::new("onboarding_outcomes_total", "Onboarding attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(onboarding_outcomes.clone()))?;

        let onboarding_failures = IntCounterVec::new(
            Opts::new("onboarding_failures_total", "Onboarding attempts aborted by a collaborator failure"),
            &["stage"],
        )?;
        registry.register(Box::new(onboarding_failures.clone()))?;

        let onboarding_duration = HistogramVec::new(
            HistogramOpts::new("onboarding_duration_seconds", "Onboarding attempt duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(onboarding_duration.clone()))?;

        let normalization_fallbacks = IntCounter::new(
            "address_normalization_fallbacks_total",
            "Onboardings that persisted the raw address because normalization failed",
        )?;
        registry.register(Box::new(normalization_fallbacks.clone()))?;

        let events_published = IntCounterVec::new(
            Opts::new("onboarding_events_published_total", "Domain events published"),
            &["topic"],
        )?;
        registry.register(Box::new(events_published.clone()))?;

        Ok(Self {
            registry,
            onboarding_outcomes,
            onboarding_failures,
            onboarding_duration,
            normalization_fallbacks,
            events_published,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_outcome(&self, outcome: &str, duration_secs: f64) {
        self.onboarding_outcomes.with_label_values(&[outcome]).inc();
        self.onboarding_duration.with_label_values(&[outcome]).observe(duration_secs);
    }

    pub fn record_failure(&self, stage: &str, duration_secs: f64) {
        self.onboarding_failures.with_label_values(&[stage]).inc();
        self.onboarding_duration.with_label_values(&["error"]).observe(duration_secs);
    }

    pub fn record_normalization_fallback(&self) {
        self.normalization_fallbacks.inc();
    }

    pub fn record_event_published(&self, topic: &str) {
        self.events_published.with_label_values(&[topic]).inc();
    }
}

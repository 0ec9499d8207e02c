use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// ============================================================================
// Circuit Breaker
// ============================================================================
//
// Guards an outbound dependency (the event broker). After `failure_threshold`
// consecutive failures calls are refused without touching the dependency for
// `cool_down`; the next call afterwards is a probe, and `probe_successes`
// successful probes close the breaker again.
//
//   Closed --failures--> Open --cool_down--> HalfOpen --successes--> Closed
//                          ^                     |
//                          +------failure--------+
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub cool_down: Duration,
    pub probe_successes: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cool_down: Duration::from_secs(30),
            probe_successes: 3,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E> {
    #[error("Circuit breaker is open")]
    Open,

    #[error("Guarded call failed: {0}")]
    Inner(E),
}

struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    probe_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Clone)]
pub struct CircuitBreaker {
    name: &'static str,
    config: BreakerConfig,
    inner: Arc<Mutex<Inner>>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: BreakerConfig) -> Self {
        Self {
            name,
            config,
            inner: Arc::new(Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                probe_successes: 0,
                opened_at: None,
            })),
        }
    }

    /// Run `call` unless the breaker is open
    pub async fn guard<F, T, E>(&self, call: F) -> Result<T, BreakerError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.admit::<E>().await?;

        match call.await {
            Ok(value) => {
                self.on_success().await;
                Ok(value)
            }
            Err(e) => {
                self.on_failure().await;
                Err(BreakerError::Inner(e))
            }
        }
    }

    async fn admit<E>(&self) -> Result<(), BreakerError<E>> {
        let mut inner = self.inner.lock().await;
        if inner.state != BreakerState::Open {
            return Ok(());
        }

        let cooled = inner
            .opened_at
            .map(|at| at.elapsed() >= self.config.cool_down)
            .unwrap_or(true);
        if !cooled {
            return Err(BreakerError::Open);
        }

        tracing::info!(breaker = self.name, "Circuit breaker half-open, probing");
        inner.state = BreakerState::HalfOpen;
        inner.probe_successes = 0;
        Ok(())
    }

    async fn on_success(&self) {
        let mut inner = self.inner.lock().await;
        inner.consecutive_failures = 0;

        if inner.state == BreakerState::HalfOpen {
            inner.probe_successes += 1;
            if inner.probe_successes >= self.config.probe_successes {
                tracing::info!(breaker = self.name, "Circuit breaker closed");
                inner.state = BreakerState::Closed;
                inner.probe_successes = 0;
                inner.opened_at = None;
            }
        }
    }

    async fn on_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.consecutive_failures += 1;

        let trip = match inner.state {
            BreakerState::HalfOpen => true,
            BreakerState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            BreakerState::Open => false,
        };

        if trip {
            tracing::warn!(
                breaker = self.name,
                failures = inner.consecutive_failures,
                "Circuit breaker opened"
            );
            inner.state = BreakerState::Open;
            inner.opened_at = Some(Instant::now());
            inner.probe_successes = 0;
        }
    }
}

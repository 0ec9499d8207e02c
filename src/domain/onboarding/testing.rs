// Recording collaborator doubles shared by the onboarding tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ports::{AddressNormalizer, CustomerStore, EventPublisher, SanctionsOracle};
use super::value_objects::{CustomerApplication, CustomerId, NormalizedCustomerRecord, StoredCustomer};

pub fn make_application() -> CustomerApplication {
    CustomerApplication {
        name: "Simone L. Laursen".to_string(),
        dob: "1968-12-15".to_string(),
        national_id: "1512680824".to_string(),
        address: "Pilekrogen 49, 1451 København K".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Check { name: String, dob: String },
    Lookup { national_id: String },
    Normalize { address: String },
    Create,
    Publish { topic: String },
}

/// Ordered log of collaborator calls, shared across all stubs of one test
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

fn replay<T: Clone>(result: &Result<T, String>) -> Result<T> {
    result.clone().map_err(anyhow::Error::msg)
}

fn freeze<T>(result: Result<T>) -> Result<T, String> {
    result.map_err(|e| e.to_string())
}

pub struct StubOracle {
    log: CallLog,
    hit: Result<bool, String>,
}

impl StubOracle {
    pub fn new(log: CallLog, hit: Result<bool>) -> Self {
        Self { log, hit: freeze(hit) }
    }
}

#[async_trait]
impl SanctionsOracle for StubOracle {
    async fn check(&self, name: &str, dob: &str) -> Result<bool> {
        self.log.push(Call::Check { name: name.to_string(), dob: dob.to_string() });
        replay(&self.hit)
    }
}

pub struct StubNormalizer {
    log: CallLog,
    normalized: Result<String, String>,
}

impl StubNormalizer {
    pub fn new(log: CallLog, normalized: Result<String>) -> Self {
        Self { log, normalized: freeze(normalized) }
    }
}

#[async_trait]
impl AddressNormalizer for StubNormalizer {
    async fn normalize(&self, address: &str) -> Result<String> {
        self.log.push(Call::Normalize { address: address.to_string() });
        replay(&self.normalized)
    }
}

pub struct StubStore {
    log: CallLog,
    existing: Result<Option<StoredCustomer>, String>,
    created_id: Result<CustomerId, String>,
    created: Mutex<Vec<NormalizedCustomerRecord>>,
}

impl StubStore {
    pub fn new(
        log: CallLog,
        existing: Result<Option<StoredCustomer>>,
        created_id: Result<CustomerId>,
    ) -> Self {
        Self {
            log,
            existing: freeze(existing),
            created_id: freeze(created_id),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Records passed to `create`, in call order
    pub fn created(&self) -> Vec<NormalizedCustomerRecord> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CustomerStore for StubStore {
    async fn lookup(&self, national_id: &str) -> Result<Option<StoredCustomer>> {
        self.log.push(Call::Lookup { national_id: national_id.to_string() });
        replay(&self.existing)
    }

    async fn create(&self, record: &NormalizedCustomerRecord) -> Result<CustomerId> {
        self.log.push(Call::Create);
        self.created.lock().unwrap().push(record.clone());
        replay(&self.created_id)
    }
}

pub struct StubPublisher {
    log: CallLog,
    published: Mutex<Vec<(String, Value)>>,
}

impl StubPublisher {
    pub fn new(log: CallLog) -> Self {
        Self { log, published: Mutex::new(Vec::new()) }
    }

    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for StubPublisher {
    async fn publish(&self, topic: &str, payload: Map<String, Value>) -> Result<()> {
        self.log.push(Call::Publish { topic: topic.to_string() });
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), Value::Object(payload)));
        Ok(())
    }
}

pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _payload: Map<String, Value>) -> Result<()> {
        anyhow::bail!("broker unreachable")
    }
}

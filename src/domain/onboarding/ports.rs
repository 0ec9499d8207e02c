use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::value_objects::{CustomerId, NormalizedCustomerRecord, StoredCustomer};

// ============================================================================
// Collaborator Ports
// ============================================================================
//
// The onboarding service only sees these traits. Concrete adapters live in
// compliance/, address/, store/ and messaging/.
//
// ============================================================================

/// Decides whether a person is on a sanctions watchlist
#[async_trait]
pub trait SanctionsOracle: Send + Sync {
    async fn check(&self, name: &str, dob: &str) -> Result<bool>;
}

/// Canonicalizes a free-text address. Failures are tolerated by the caller.
#[async_trait]
pub trait AddressNormalizer: Send + Sync {
    async fn normalize(&self, address: &str) -> Result<String>;
}

/// Durable customer records keyed by `national_id`.
///
/// Implementations should reject a second `create` for the same
/// `national_id`; the service does not serialize concurrent duplicate checks.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn lookup(&self, national_id: &str) -> Result<Option<StoredCustomer>>;

    async fn create(&self, record: &NormalizedCustomerRecord) -> Result<CustomerId>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Map<String, Value>) -> Result<()>;
}

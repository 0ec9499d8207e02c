use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::onboarding::{CustomerId, CustomerStore, NormalizedCustomerRecord, StoredCustomer};

use super::StoreError;

// ============================================================================
// In-Memory Customer Store
// ============================================================================
//
// Process-local store keyed by national_id. `create` checks and inserts under
// one write lock, so a second record for the same national_id is refused even
// when two onboardings race past the lookup gate.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<HashMap<String, StoredCustomer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn lookup(&self, national_id: &str) -> Result<Option<StoredCustomer>> {
        Ok(self.customers.read().await.get(national_id).cloned())
    }

    async fn create(&self, record: &NormalizedCustomerRecord) -> Result<CustomerId> {
        let mut customers = self.customers.write().await;

        if customers.contains_key(&record.national_id) {
            return Err(StoreError::DuplicateNationalId(record.national_id.clone()).into());
        }

        let customer_id = CustomerId::generate();
        customers.insert(
            record.national_id.clone(),
            StoredCustomer::from_record(customer_id, record),
        );

        tracing::debug!(customer_id = %customer_id, "Stored customer in memory");
        Ok(customer_id)
    }
}

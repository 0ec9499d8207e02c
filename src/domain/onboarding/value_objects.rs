use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Onboarding Value Objects
// ============================================================================

/// Identifier generated by the customer store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Prospective customer as submitted by the caller.
///
/// `national_id` is the unique business key used for deduplication.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerApplication {
    pub name: String,
    pub dob: String,
    pub national_id: String,
    pub address: String,
}

/// Record handed to the store: the application with its address replaced by
/// the normalized form, or the raw address when normalization failed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCustomerRecord {
    pub name: String,
    pub dob: String,
    pub national_id: String,
    pub address: String,
}

impl NormalizedCustomerRecord {
    pub(crate) fn from_application(application: &CustomerApplication, address: String) -> Self {
        Self {
            name: application.name.clone(),
            dob: application.dob.clone(),
            national_id: application.national_id.clone(),
            address,
        }
    }
}

/// Customer as persisted by a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCustomer {
    pub customer_id: CustomerId,
    pub name: String,
    pub dob: String,
    pub national_id: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl StoredCustomer {
    pub fn from_record(customer_id: CustomerId, record: &NormalizedCustomerRecord) -> Self {
        Self {
            customer_id,
            name: record.name.clone(),
            dob: record.dob.clone(),
            national_id: record.national_id.clone(),
            address: record.address.clone(),
            created_at: Utc::now(),
        }
    }
}

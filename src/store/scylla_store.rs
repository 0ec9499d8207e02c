use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::value::{CqlValue, Row};
use uuid::Uuid;

use crate::domain::onboarding::{CustomerId, CustomerStore, NormalizedCustomerRecord, StoredCustomer};

use super::StoreError;

// ============================================================================
// ScyllaDB Customer Store
// ============================================================================
//
// One table, partitioned by national_id:
//
//   customers_by_national_id (national_id PK, customer_id, name, dob,
//                             address, created_at)
//
// Inserts are lightweight transactions (IF NOT EXISTS), so the table itself
// guarantees at most one customer per national_id.
//
// ============================================================================

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS customers_by_national_id (
    national_id text PRIMARY KEY,
    customer_id uuid,
    name text,
    dob text,
    address text,
    created_at timestamp
)";

const SELECT_BY_NATIONAL_ID: &str = "SELECT customer_id, name, dob, national_id, address, created_at
     FROM customers_by_national_id
     WHERE national_id = ?";

const INSERT_IF_NOT_EXISTS: &str = "INSERT INTO customers_by_national_id (
        national_id, customer_id, name, dob, address, created_at
    ) VALUES (?, ?, ?, ?, ?, ?) IF NOT EXISTS";

type CustomerRow = (Uuid, String, String, String, String, DateTime<Utc>);

pub struct ScyllaCustomerStore {
    session: Arc<Session>,
}

impl ScyllaCustomerStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Connect, create the keyspace and table if missing, and switch to the keyspace
    pub async fn connect(uri: &str, keyspace: &str) -> Result<Self> {
        tracing::info!(uri = %uri, keyspace = %keyspace, "Connecting to ScyllaDB...");

        let session: Session = SessionBuilder::new()
            .known_node(uri)
            .build()
            .await
            .with_context(|| format!("Failed to connect to ScyllaDB at {uri}"))?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
                ),
                &[],
            )
            .await?;

        session.use_keyspace(keyspace, false).await?;
        session.query_unpaged(CREATE_TABLE, &[]).await?;

        Ok(Self::new(Arc::new(session)))
    }
}

#[async_trait]
impl CustomerStore for ScyllaCustomerStore {
    async fn lookup(&self, national_id: &str) -> Result<Option<StoredCustomer>> {
        let result = self
            .session
            .query_unpaged(SELECT_BY_NATIONAL_ID, (national_id,))
            .await?;

        // A SELECT always returns rows; anything else is a driver or schema fault
        let rows_result = result.into_rows_result()?;
        let row = rows_result.maybe_first_row::<CustomerRow>()?;
        Ok(row.map(stored_customer))
    }

    async fn create(&self, record: &NormalizedCustomerRecord) -> Result<CustomerId> {
        let customer_id = CustomerId::generate();

        let result = self
            .session
            .query_unpaged(
                INSERT_IF_NOT_EXISTS,
                (
                    record.national_id.as_str(),
                    customer_id.as_uuid(),
                    record.name.as_str(),
                    record.dob.as_str(),
                    record.address.as_str(),
                    Utc::now(),
                ),
            )
            .await?;

        let row = result.into_rows_result()?.first_row::<Row>()?;
        if !lwt_applied(&row)? {
            return Err(StoreError::DuplicateNationalId(record.national_id.clone()).into());
        }

        tracing::info!(
            customer_id = %customer_id,
            national_id = %record.national_id,
            "Inserted customer into ScyllaDB"
        );
        Ok(customer_id)
    }
}

fn stored_customer(row: CustomerRow) -> StoredCustomer {
    let (customer_id, name, dob, national_id, address, created_at) = row;
    StoredCustomer {
        customer_id: CustomerId(customer_id),
        name,
        dob,
        national_id,
        address,
        created_at,
    }
}

/// Reads the `[applied]` column a lightweight transaction returns first
fn lwt_applied(row: &Row) -> Result<bool> {
    match row.columns.first() {
        Some(Some(CqlValue::Boolean(applied))) => Ok(*applied),
        other => anyhow::bail!("Unexpected LWT result column: {:?}", other),
    }
}

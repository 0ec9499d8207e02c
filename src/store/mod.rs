// ============================================================================
// Customer Store Adapters
// ============================================================================
//
// - memory       - process-local store for development and tests
// - scylla_store - durable store backed by a ScyllaDB table
//
// Both refuse a second record for the same national_id.
//
// ============================================================================

mod memory;
mod scylla_store;

pub use memory::InMemoryCustomerStore;
pub use scylla_store::ScyllaCustomerStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("A customer with national_id {0} already exists")]
    DuplicateNationalId(String),
}

// ============================================================================
// Onboarding Domain - Customer Onboarding Decision Workflow
// ============================================================================
//
// This module contains ALL onboarding-specific code:
// - Value objects (CustomerApplication, NormalizedCustomerRecord, CustomerId)
// - Outcome (OnboardingOutcome)
// - Events (OnboardingEvent and its topic/payload catalogue)
// - Errors (OnboardingError)
// - Ports (SanctionsOracle, AddressNormalizer, CustomerStore, EventPublisher)
// - Service (OnboardingService, the orchestrator)
//
// Adapters for the ports live outside the domain layer.
//
// ============================================================================

pub mod value_objects;
pub mod outcome;
pub mod events;
pub mod errors;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// Re-export for convenience
pub use value_objects::*;
pub use outcome::*;
pub use events::*;
pub use errors::*;
pub use ports::*;
pub use service::*;

// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain code is independent of storage, messaging and transport. Adapters
// implement the ports declared here.
//
// ============================================================================

pub mod onboarding;

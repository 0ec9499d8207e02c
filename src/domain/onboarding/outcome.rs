use serde::Serialize;

use super::value_objects::CustomerId;

// ============================================================================
// Onboarding Outcome
// ============================================================================

/// Result of a single onboarding attempt.
///
/// Serialized as `{"status": "..."}`, with `customer_id` only on `created`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OnboardingOutcome {
    Rejected,
    Duplicate,
    Created { customer_id: CustomerId },
}

impl OnboardingOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            OnboardingOutcome::Rejected => "rejected",
            OnboardingOutcome::Duplicate => "duplicate",
            OnboardingOutcome::Created { .. } => "created",
        }
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        match self {
            OnboardingOutcome::Created { customer_id } => Some(*customer_id),
            _ => None,
        }
    }
}

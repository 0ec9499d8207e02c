use serde_json::{Map, Value};

use super::value_objects::CustomerId;

// ============================================================================
// Onboarding Domain Events
// ============================================================================
//
// Exactly one event is published per onboarding attempt:
//
//   onboarding_rejected   { reason: "sanctions_hit", national_id }
//   onboarding_duplicate  { national_id }
//   onboarding_completed  { customer_id }
//
// ============================================================================

pub const TOPIC_REJECTED: &str = "onboarding_rejected";
pub const TOPIC_DUPLICATE: &str = "onboarding_duplicate";
pub const TOPIC_COMPLETED: &str = "onboarding_completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    SanctionsHit,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::SanctionsHit => "sanctions_hit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingEvent {
    Rejected {
        reason: RejectionReason,
        national_id: String,
    },
    Duplicate {
        national_id: String,
    },
    Completed {
        customer_id: CustomerId,
    },
}

impl OnboardingEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            OnboardingEvent::Rejected { .. } => TOPIC_REJECTED,
            OnboardingEvent::Duplicate { .. } => TOPIC_DUPLICATE,
            OnboardingEvent::Completed { .. } => TOPIC_COMPLETED,
        }
    }

    /// Payload mapping handed to the event publisher
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        match self {
            OnboardingEvent::Rejected { reason, national_id } => {
                payload.insert("reason".to_string(), Value::from(reason.as_str()));
                payload.insert("national_id".to_string(), Value::from(national_id.as_str()));
            }
            OnboardingEvent::Duplicate { national_id } => {
                payload.insert("national_id".to_string(), Value::from(national_id.as_str()));
            }
            OnboardingEvent::Completed { customer_id } => {
                payload.insert("customer_id".to_string(), Value::from(customer_id.to_string()));
            }
        }
        payload
    }
}

// ============================================================================
// Onboarding Errors
// ============================================================================
//
// Rejections and duplicates are outcomes, not errors. Only failures of the
// must-succeed collaborators end up here. Address normalization failures are
// absorbed by the service and never reach this type.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Sanctions check failed: {0}")]
    SanctionsCheck(#[source] anyhow::Error),

    #[error("Customer lookup failed: {0}")]
    Lookup(#[source] anyhow::Error),

    #[error("Customer creation failed: {0}")]
    Create(#[source] anyhow::Error),

    #[error("Publishing {topic} failed: {source}")]
    Publish {
        topic: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl OnboardingError {
    /// Workflow stage that failed, used as a metric label and in HTTP errors
    pub fn stage(&self) -> &'static str {
        match self {
            OnboardingError::SanctionsCheck(_) => "sanctions_check",
            OnboardingError::Lookup(_) => "lookup",
            OnboardingError::Create(_) => "create",
            OnboardingError::Publish { .. } => "publish",
        }
    }
}

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::onboarding::AddressNormalizer;

// ============================================================================
// Canonical Address Normalizer
// ============================================================================
//
// Local stand-in for an external normalization API. Produces a canonical
// spelling: trimmed, single spaces, and ", " between address components.
//
// ============================================================================

pub const DEFAULT_MAX_LEN: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("Address is blank")]
    Blank,

    #[error("Address exceeds {max} characters ({actual})")]
    TooLong { max: usize, actual: usize },
}

pub struct CanonicalAddressNormalizer {
    max_len: usize,
}

impl CanonicalAddressNormalizer {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn canonicalize(&self, address: &str) -> Result<String, NormalizeError> {
        let actual = address.chars().count();
        if actual > self.max_len {
            return Err(NormalizeError::TooLong { max: self.max_len, actual });
        }

        let canonical = address
            .split(',')
            .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        if canonical.is_empty() {
            return Err(NormalizeError::Blank);
        }
        Ok(canonical)
    }
}

impl Default for CanonicalAddressNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN)
    }
}

#[async_trait]
impl AddressNormalizer for CanonicalAddressNormalizer {
    async fn normalize(&self, address: &str) -> Result<String> {
        Ok(self.canonicalize(address)?)
    }
}

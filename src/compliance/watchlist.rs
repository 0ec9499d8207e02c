use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::onboarding::SanctionsOracle;

// ============================================================================
// Watchlist Sanctions Oracle
// ============================================================================
//
// Loads a JSON array of `{ "name": ..., "dob": ... }` entries and reports a
// hit when both the folded name and the date of birth match an entry.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchlistEntry {
    pub name: String,
    pub dob: String,
}

pub struct WatchlistOracle {
    entries: HashSet<(String, String)>,
}

impl WatchlistOracle {
    pub fn new(entries: impl IntoIterator<Item = WatchlistEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (fold_name(&e.name), e.dob.trim().to_string()))
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self { entries: HashSet::new() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<WatchlistEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read watchlist {}", path.display()))?;
        let oracle = Self::from_json(&json)
            .with_context(|| format!("Invalid watchlist {}", path.display()))?;

        tracing::info!(path = %path.display(), entries = oracle.len(), "Loaded sanctions watchlist");
        Ok(oracle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase and collapse whitespace
fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SanctionsOracle for WatchlistOracle {
    async fn check(&self, name: &str, dob: &str) -> Result<bool> {
        let key = (fold_name(name), dob.trim().to_string());
        Ok(self.entries.contains(&key))
    }
}

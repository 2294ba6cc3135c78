//! JSON persistence for drained simulation results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::Trade;

/// Errors from reading or writing the results file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the results file.
    #[error("failed to read results file '{path}': {source}")]
    Read {
        /// Path to the results file.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// Failed to write the results file.
    #[error("failed to write results file '{path}': {source}")]
    Write {
        /// Path to the results file.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// Failed to serialize or parse the results JSON.
    #[error("invalid results JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists the fully-materialized aggregate of a run to a JSON file.
///
/// The store has no opinion on when a run is complete; callers hand it the
/// aggregate only after the pipeline has drained. Saving replaces any
/// previous file wholesale; there is no partial-progress persistence.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
}

impl ResultsStore {
    /// Create a store bound to the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the store reads from and writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the results file with the given trades.
    pub fn save(&self, trades: &[Trade]) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(trades)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(trades = trades.len(), path = %self.path.display(), "saved results");
        Ok(())
    }

    /// Load previously saved trades; `Ok(None)` when no file exists.
    pub fn load(&self) -> Result<Option<Vec<Trade>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let trades = serde_json::from_str(&json)?;
        Ok(Some(trades))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_trades() -> Vec<Trade> {
        let now = Utc::now();
        vec![
            Trade::closed("Trend", "EUR/USD", now, now, dec!(2)),
            Trade::closed("Trend", "GBP/USD", now, now, dec!(-1)),
        ]
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(dir.path().join("results.json"));

        store.save(&sample_trades()).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].market, "EUR/USD");
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(dir.path().join("missing.json"));

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(dir.path().join("results.json"));

        store.save(&sample_trades()).unwrap();
        store.save(&[]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_empty());
    }
}

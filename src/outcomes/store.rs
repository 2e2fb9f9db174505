//! Append-only outcome history storage.
//!
//! The store is the one stateful, crash-sensitive piece of the engine, so
//! it sits behind a small trait and the core never touches files directly.
//! The JSON implementation reads the whole history, extends it, and writes
//! the file back; a corrupt file resets to an empty history rather than
//! failing the session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use crate::models::outcome::OutcomeRecord;

pub const OUTCOME_FILE: &str = "drill_outcomes.json";

/// Load/append access to the accumulated outcome history.
pub trait OutcomeStore {
    /// Full history, oldest first. Missing or unreadable storage yields an
    /// empty history, never an error.
    fn load(&self) -> Vec<OutcomeRecord>;

    /// Append records, returning the new history length. Callers treat a
    /// failure as non-fatal.
    fn append(&self, records: &[OutcomeRecord]) -> Result<usize>;
}

/// One JSON array per output root.
pub struct JsonOutcomeStore {
    path: PathBuf,
}

impl JsonOutcomeStore {
    pub fn new(output_root: &Path) -> Self {
        Self {
            path: output_root.join(OUTCOME_FILE),
        }
    }
}

impl OutcomeStore for JsonOutcomeStore {
    fn load(&self) -> Vec<OutcomeRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("could not read {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "outcome history at {} is corrupt, starting fresh: {err}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    fn append(&self, records: &[OutcomeRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(self.load().len());
        }

        let mut history = self.load();
        history.extend(records.iter().cloned());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(&history)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write outcomes to {}", self.path.display()))?;
        Ok(history.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drill::{Intensity, Urgency};
    use crate::models::phase::Phase;
    use crate::reliability::ReliabilityLevel;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(delta: f64) -> OutcomeRecord {
        OutcomeRecord {
            previous_session_id: "2026-01-10_09-00-00".into(),
            current_session_id: "2026-01-17_09-00-00".into(),
            metric_name: "hip_rotation".into(),
            phase: Phase::Contact,
            drill_name: "Medicine Ball Rotational Throws".into(),
            intensity: Intensity::Intensive,
            classification: Urgency::High,
            pre_value: 30.0,
            post_value: 30.0 + delta,
            delta,
            reliability: Some(ReliabilityLevel::High),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonOutcomeStore::new(dir.path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn append_only_growth() {
        let dir = tempdir().unwrap();
        let store = JsonOutcomeStore::new(dir.path());
        let batch = vec![record(-5.0), record(-3.0)];

        assert_eq!(store.append(&batch).unwrap(), 2);
        // Same batch again: no dedup, history doubles.
        assert_eq!(store.append(&batch).unwrap(), 4);
        assert_eq!(store.load().len(), 4);
    }

    #[test]
    fn empty_append_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let store = JsonOutcomeStore::new(dir.path());
        store.append(&[record(-5.0)]).unwrap();
        assert_eq!(store.append(&[]).unwrap(), 1);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn corrupt_file_resets_to_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OUTCOME_FILE), "[{ truncated").unwrap();
        let store = JsonOutcomeStore::new(dir.path());
        assert!(store.load().is_empty());
        // And the next append starts a fresh history.
        assert_eq!(store.append(&[record(-1.0)]).unwrap(), 1);
    }

    #[test]
    fn tolerates_unknown_extra_fields() {
        let dir = tempdir().unwrap();
        let mut value = serde_json::to_value(vec![record(-2.0)]).unwrap();
        value[0]["future_field"] = serde_json::json!("ignored");
        fs::write(
            dir.path().join(OUTCOME_FILE),
            serde_json::to_string(&value).unwrap(),
        )
        .unwrap();

        let store = JsonOutcomeStore::new(dir.path());
        assert_eq!(store.load().len(), 1);
    }
}

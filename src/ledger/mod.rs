//! Knowledge-point ledger: owns mastery, targets and update history.
//!
//! The ledger only records values it is handed; the estimator computes them.

mod point;
mod shared;
mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mastery::types::{clamp_unit, round_to};

pub use point::{KnowledgePoint, MasteryEvent, DEFAULT_INITIAL_MASTERY, DEFAULT_TARGET_MASTERY};
pub use shared::SharedLedger;
pub use store::{LedgerStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_count: usize,
    pub mastered_count: usize,
    pub average_mastery: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("record stored under {key:?} is named {name:?}")]
pub struct NameMismatch {
    pub key: String,
    pub name: String,
}

/// Flat mapping of name -> knowledge point. Serializes as that mapping;
/// restoring rejects entries whose key differs from the record's name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, KnowledgePoint>",
    into = "BTreeMap<String, KnowledgePoint>"
)]
pub struct Ledger {
    points: BTreeMap<String, KnowledgePoint>,
}

impl TryFrom<BTreeMap<String, KnowledgePoint>> for Ledger {
    type Error = NameMismatch;

    fn try_from(points: BTreeMap<String, KnowledgePoint>) -> Result<Self, Self::Error> {
        if let Some((key, kp)) = points.iter().find(|(key, kp)| **key != kp.name) {
            return Err(NameMismatch {
                key: key.clone(),
                name: kp.name.clone(),
            });
        }
        Ok(Self { points })
    }
}

impl From<Ledger> for BTreeMap<String, KnowledgePoint> {
    fn from(ledger: Ledger) -> Self {
        ledger.points
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(points: BTreeMap<String, KnowledgePoint>) -> Self {
        Self { points }
    }

    pub fn records(&self) -> &BTreeMap<String, KnowledgePoint> {
        &self.points
    }

    pub fn into_records(self) -> BTreeMap<String, KnowledgePoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&KnowledgePoint> {
        self.points.get(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &KnowledgePoint> {
        self.points.values()
    }

    pub fn upsert(
        &mut self,
        name: &str,
        target_mastery: f64,
        note: &str,
        initial_mastery: f64,
    ) -> &KnowledgePoint {
        self.upsert_at(name, target_mastery, note, initial_mastery, Utc::now())
    }

    /// Creates the point if absent. An existing point only gets its target
    /// (and note, when non-empty) replaced; mastery is left alone.
    pub fn upsert_at(
        &mut self,
        name: &str,
        target_mastery: f64,
        note: &str,
        initial_mastery: f64,
        now: DateTime<Utc>,
    ) -> &KnowledgePoint {
        let target_mastery = clamp_unit(target_mastery);
        let point = self
            .points
            .entry(name.to_string())
            .and_modify(|kp| {
                kp.target_mastery = target_mastery;
                if !note.is_empty() {
                    kp.note = note.to_string();
                }
                kp.updated_at = now;
            })
            .or_insert_with(|| {
                tracing::info!(name, initial_mastery, target_mastery, "knowledge point created");
                KnowledgePoint::new(name, initial_mastery, target_mastery, note, now)
            });
        point
    }

    pub fn record_update(&mut self, name: &str, new_mastery: f64, score: f64, feedback: &str) -> bool {
        self.record_update_at(name, new_mastery, score, feedback, Utc::now())
    }

    /// Sets mastery and appends a history entry. Returns `false` and leaves
    /// the ledger untouched when `name` is unknown.
    pub fn record_update_at(
        &mut self,
        name: &str,
        new_mastery: f64,
        score: f64,
        feedback: &str,
        at: DateTime<Utc>,
    ) -> bool {
        match self.points.get_mut(name) {
            Some(kp) => {
                kp.apply_update(new_mastery, score, feedback, at);
                tracing::debug!(name, mastery = kp.actual_mastery, "mastery recorded");
                true
            }
            None => {
                tracing::warn!(name, "update for unknown knowledge point ignored");
                false
            }
        }
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        let total_count = self.points.len();
        if total_count == 0 {
            return ProgressSummary {
                total_count: 0,
                mastered_count: 0,
                average_mastery: 0.0,
            };
        }

        let mastered_count = self.points.values().filter(|kp| kp.is_mastered()).count();
        let sum: f64 = self.points.values().map(|kp| kp.actual_mastery).sum();

        ProgressSummary {
            total_count,
            mastered_count,
            average_mastery: round_to(sum / total_count as f64, 3),
        }
    }
}

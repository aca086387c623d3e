use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mastery::types::{clamp_unit, TeachingStage};

pub const DEFAULT_TARGET_MASTERY: f64 = 0.8;
pub const DEFAULT_INITIAL_MASTERY: f64 = 0.0;

/// One recorded mastery change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryEvent {
    pub timestamp: DateTime<Utc>,
    pub old_mastery: f64,
    pub new_mastery: f64,
    pub score: f64,
    pub feedback: String,
}

/// Persisted state of one knowledge point, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgePoint {
    pub name: String,
    pub actual_mastery: f64,
    pub target_mastery: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub history: Vec<MasteryEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgePoint {
    pub fn new(
        name: impl Into<String>,
        initial_mastery: f64,
        target_mastery: f64,
        note: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            actual_mastery: clamp_unit(initial_mastery),
            target_mastery: clamp_unit(target_mastery),
            note: note.into(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.actual_mastery >= self.target_mastery
    }

    pub fn teaching_stage(&self) -> TeachingStage {
        TeachingStage::from_mastery(self.actual_mastery)
    }

    /// Distance left to the target; zero once mastered.
    pub fn remaining_to_target(&self) -> f64 {
        (self.target_mastery - self.actual_mastery).max(0.0)
    }

    pub fn last_practice_at(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|event| event.timestamp)
    }

    /// Fractional days since the last recorded practice. `None` when the
    /// point was never practiced; clock skew reads as zero days.
    pub fn days_since_last_practice(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_practice_at().map(|last| {
            let elapsed_ms = (now - last).num_milliseconds().max(0);
            elapsed_ms as f64 / 86_400_000.0
        })
    }

    pub(crate) fn apply_update(
        &mut self,
        new_mastery: f64,
        score: f64,
        feedback: impl Into<String>,
        at: DateTime<Utc>,
    ) {
        let new_mastery = clamp_unit(new_mastery);
        self.history.push(MasteryEvent {
            timestamp: at,
            old_mastery: self.actual_mastery,
            new_mastery,
            score: clamp_unit(score),
            feedback: feedback.into(),
        });
        self.actual_mastery = new_mastery;
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_clamps_inputs() {
        let kp = KnowledgePoint::new("closures", -0.5, 1.4, "", t0());
        assert_eq!(kp.actual_mastery, 0.0);
        assert_eq!(kp.target_mastery, 1.0);
        assert_eq!(kp.created_at, kp.updated_at);
    }

    #[test]
    fn test_is_mastered_at_equality() {
        let kp = KnowledgePoint::new("traits", 0.8, 0.8, "", t0());
        assert!(kp.is_mastered());
        assert_eq!(kp.remaining_to_target(), 0.0);
    }

    #[test]
    fn test_days_since_last_practice() {
        let mut kp = KnowledgePoint::new("lifetimes", 0.0, 0.8, "", t0());
        assert_eq!(kp.days_since_last_practice(t0()), None);

        kp.apply_update(0.2, 0.5, "ok", t0());
        let days = kp.days_since_last_practice(t0() + Duration::hours(36)).unwrap();
        assert!((days - 1.5).abs() < 1e-9);

        assert_eq!(kp.days_since_last_practice(t0() - Duration::days(2)), Some(0.0));
    }

    #[test]
    fn test_apply_update_appends_history() {
        let mut kp = KnowledgePoint::new("generics", 0.1, 0.8, "", t0());
        let later = t0() + Duration::minutes(5);
        kp.apply_update(0.25, 0.7, "good start", later);

        assert_eq!(kp.actual_mastery, 0.25);
        assert_eq!(kp.updated_at, later);
        assert_eq!(kp.history.len(), 1);
        assert_eq!(kp.history[0].old_mastery, 0.1);
        assert_eq!(kp.history[0].feedback, "good start");
        assert_eq!(kp.teaching_stage(), TeachingStage::Foundation);
    }
}

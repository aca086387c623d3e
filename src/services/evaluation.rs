use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, SharedLedger};
use crate::mastery::{
    Classification, DifficultyClassifier, MasteryEstimate, MasteryEstimator, ScoreGrade,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvaluationError {
    #[error("unknown knowledge point: {0}")]
    UnknownKnowledgePoint(String),
}

/// What the external grader returned for one answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradedResponse {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub question: String,
    /// Explicit task type; the question text is classified when empty.
    #[serde(default)]
    pub question_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressDirection {
    Up,
    Flat,
    Down,
}

impl ProgressDirection {
    pub fn from_improvement(improvement: f64) -> Self {
        if improvement > 0.0 {
            Self::Up
        } else if improvement < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub name: String,
    pub estimate: MasteryEstimate,
    pub grade: ScoreGrade,
    pub direction: ProgressDirection,
    pub mastery_achieved: bool,
    pub remaining_to_target: f64,
    #[serde(skip)]
    pub classification: Option<Classification>,
}

/// Turns a grader's score into a recorded mastery update.
#[derive(Debug, Clone, Default)]
pub struct EvaluationService {
    classifier: DifficultyClassifier,
    estimator: MasteryEstimator,
}

impl EvaluationService {
    pub fn new(classifier: DifficultyClassifier, estimator: MasteryEstimator) -> Self {
        Self {
            classifier,
            estimator,
        }
    }

    pub fn estimator(&self) -> &MasteryEstimator {
        &self.estimator
    }

    pub fn classify(&self, response: &GradedResponse) -> Classification {
        let text = if response.question_type.trim().is_empty() {
            &response.question
        } else {
            &response.question_type
        };
        self.classifier.classify_detailed(text)
    }

    pub fn evaluate(
        &self,
        ledger: &mut Ledger,
        name: &str,
        response: &GradedResponse,
        now: DateTime<Utc>,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let point = ledger
            .get(name)
            .ok_or_else(|| EvaluationError::UnknownKnowledgePoint(name.to_string()))?;

        let classification = self.classify(response);
        let days = point.days_since_last_practice(now);
        let estimate =
            self.estimator
                .estimate(point.actual_mastery, response.score, classification.tier, days);
        let target = point.target_mastery;

        if !ledger.record_update_at(
            name,
            estimate.new_mastery,
            estimate.task_score,
            &response.feedback,
            now,
        ) {
            return Err(EvaluationError::UnknownKnowledgePoint(name.to_string()));
        }

        tracing::info!(
            name,
            score = estimate.task_score,
            old = estimate.old_mastery,
            new = estimate.new_mastery,
            tier = classification.tier.as_str(),
            "evaluation recorded"
        );

        Ok(EvaluationOutcome {
            name: name.to_string(),
            grade: ScoreGrade::from_score(estimate.task_score),
            direction: ProgressDirection::from_improvement(estimate.improvement),
            mastery_achieved: estimate.new_mastery >= target,
            remaining_to_target: (target - estimate.new_mastery).max(0.0),
            estimate,
            classification: Some(classification),
        })
    }

    /// Same as [`evaluate`](Self::evaluate) with the read and write under one lock.
    pub fn evaluate_shared(
        &self,
        ledger: &SharedLedger,
        name: &str,
        response: &GradedResponse,
        now: DateTime<Utc>,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        ledger.transact(|inner| self.evaluate(inner, name, response, now))
    }
}

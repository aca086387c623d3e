//! Mastery Estimator
//!
//! Updates a mastery value from one graded task:
//!
//! ```text
//! A_decayed = A_old × β(days)
//! A_new     = A_decayed + α(A_decayed) × (S × W_cap − A_decayed) × γ
//! ```
//!
//! - β: forgetting factor, 1.0 inside the grace period, then linear down to a floor
//! - α: learning-rate staircase keyed by the decayed mastery
//! - W_cap: ceiling of the task's difficulty tier
//! - γ: slip protection / guess dampening
//!
//! The legacy and expert-guard strategies share the same clamp and rounding.

use serde::{Deserialize, Serialize};

use super::config::MasteryConfig;
use super::types::{clamp_unit, round_to, DifficultyTier, ToleranceKind, UpdateStrategy};

/// Result of a single update plus the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryEstimate {
    pub strategy: UpdateStrategy,
    pub tier: DifficultyTier,
    pub task_score: f64,
    pub old_mastery: f64,
    pub new_mastery: f64,
    pub cap: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub tolerance: ToleranceKind,
    /// Signed `new_mastery - old_mastery`.
    pub improvement: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MasteryEstimator {
    config: MasteryConfig,
}

struct RawUpdate {
    value: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    tolerance: ToleranceKind,
}

impl MasteryEstimator {
    pub fn new(config: MasteryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MasteryConfig {
        &self.config
    }

    /// Updates with the configured default strategy.
    pub fn estimate(
        &self,
        old_mastery: f64,
        task_score: f64,
        tier: DifficultyTier,
        days_since_last_practice: Option<f64>,
    ) -> MasteryEstimate {
        self.estimate_with(
            self.config.strategy,
            old_mastery,
            task_score,
            tier,
            days_since_last_practice,
        )
    }

    pub fn estimate_with(
        &self,
        strategy: UpdateStrategy,
        old_mastery: f64,
        task_score: f64,
        tier: DifficultyTier,
        days_since_last_practice: Option<f64>,
    ) -> MasteryEstimate {
        let old_mastery = clamp_unit(old_mastery);
        let task_score = clamp_unit(task_score);
        let cap = self.config.ceilings.cap(tier);

        let raw = match strategy {
            UpdateStrategy::Enhanced => {
                self.enhanced(old_mastery, task_score, cap, days_since_last_practice)
            }
            UpdateStrategy::Legacy => self.legacy(old_mastery, task_score, cap),
            UpdateStrategy::ExpertGuard => self.expert_guard(old_mastery, task_score, cap),
        };

        let new_mastery = round_to(clamp_unit(raw.value), MasteryConfig::PRECISION);

        tracing::debug!(
            strategy = ?strategy,
            tier = tier.as_str(),
            old = old_mastery,
            new = new_mastery,
            score = task_score,
            alpha = raw.alpha,
            beta = raw.beta,
            gamma = raw.gamma,
            "mastery updated"
        );

        MasteryEstimate {
            strategy,
            tier,
            task_score,
            old_mastery,
            new_mastery,
            cap,
            alpha: raw.alpha,
            beta: raw.beta,
            gamma: raw.gamma,
            tolerance: raw.tolerance,
            improvement: new_mastery - old_mastery,
        }
    }

    /// Forgetting factor β for the elapsed days. Missing, non-finite or
    /// in-grace values mean no decay.
    pub fn decay_factor(&self, days_since_last_practice: Option<f64>) -> f64 {
        let decay = &self.config.decay;
        match days_since_last_practice {
            Some(days) if days.is_finite() && days > decay.grace_days => {
                (1.0 - decay.rate_per_day * (days - decay.grace_days)).max(decay.floor)
            }
            _ => 1.0,
        }
    }

    fn enhanced(&self, old: f64, score: f64, cap: f64, days: Option<f64>) -> RawUpdate {
        let beta = self.decay_factor(days);
        let decayed = old * beta;
        let alpha = self.config.rate_stages.rate_for(decayed);
        let delta = score * cap - decayed;

        let tol = &self.config.tolerance;
        let (gamma, tolerance) = if old >= tol.slip_threshold && score < tol.slip_score_below {
            tracing::debug!(old, score, "slip protection applied");
            (tol.slip_protection, ToleranceKind::Slip)
        } else if old <= tol.guess_threshold && score > tol.guess_score_above {
            tracing::debug!(old, score, "guess dampening applied");
            (tol.guess_dampening, ToleranceKind::Guess)
        } else {
            (1.0, ToleranceKind::None)
        };

        RawUpdate {
            value: decayed + alpha * delta * gamma,
            alpha,
            beta,
            gamma,
            tolerance,
        }
    }

    fn legacy(&self, old: f64, score: f64, cap: f64) -> RawUpdate {
        let alpha = self.config.legacy.base_rate;
        RawUpdate {
            value: old + alpha * (score * cap - old),
            alpha,
            beta: 1.0,
            gamma: 1.0,
            tolerance: ToleranceKind::None,
        }
    }

    fn expert_guard(&self, old: f64, score: f64, cap: f64) -> RawUpdate {
        let p = &self.config.expert_guard;
        let target = score * cap;

        let (value, alpha, tolerance) = if old > cap {
            // above what this tier can prove: hold on success, soft penalty on failure
            if score >= p.hold_min_score {
                (old + p.hold_bonus, 0.0, ToleranceKind::ExpertHold)
            } else {
                (
                    old + p.penalty_rate * (target - old),
                    p.penalty_rate,
                    ToleranceKind::ExpertPenalty,
                )
            }
        } else {
            let alpha = if old < p.stage_boundary {
                p.novice_rate
            } else {
                p.expert_rate
            };
            (old + alpha * (target - old), alpha, ToleranceKind::None)
        };

        RawUpdate {
            value,
            alpha,
            beta: 1.0,
            gamma: 1.0,
            tolerance,
        }
    }
}

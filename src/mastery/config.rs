use serde::{Deserialize, Serialize};

use super::types::{DifficultyTier, UpdateStrategy};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("ceilings must be non-decreasing: concept={concept}, basic_code={basic_code}, advanced={advanced}")]
    CeilingOrder {
        concept: f64,
        basic_code: f64,
        advanced: f64,
    },
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("rate stage boundaries must be strictly ascending within (0,1): {boundaries:?}")]
    StageOrder { boundaries: [f64; 3] },
    #[error("keyword config: {0}")]
    Keywords(String),
}

/// Mastery ceiling (W_cap) per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCeilings {
    pub concept: f64,
    pub basic_code: f64,
    pub advanced: f64,
}

impl Default for TierCeilings {
    fn default() -> Self {
        Self {
            concept: 0.4,
            basic_code: 0.7,
            advanced: 1.0,
        }
    }
}

impl TierCeilings {
    pub fn cap(&self, tier: DifficultyTier) -> f64 {
        match tier {
            DifficultyTier::Concept => self.concept,
            DifficultyTier::BasicCode => self.basic_code,
            DifficultyTier::Advanced => self.advanced,
        }
    }

    /// Ceiling for a raw label; unknown labels use the default tier's cap.
    pub fn cap_for_label(&self, label: &str) -> f64 {
        self.cap(DifficultyTier::parse(label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayParams {
    pub grace_days: f64,
    pub rate_per_day: f64,
    pub floor: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            grace_days: 7.0,
            rate_per_day: 0.02,
            floor: 0.1,
        }
    }
}

/// Learning-rate staircase keyed by the decayed mastery, buckets `[lo, hi)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRateStages {
    pub boundaries: [f64; 3],
    pub rates: [f64; 4],
}

impl Default for LearningRateStages {
    fn default() -> Self {
        Self {
            boundaries: [0.2, 0.5, 0.8],
            rates: [0.40, 0.35, 0.25, 0.15],
        }
    }
}

impl LearningRateStages {
    pub fn rate_for(&self, mastery: f64) -> f64 {
        let bucket = self
            .boundaries
            .iter()
            .position(|&hi| mastery < hi)
            .unwrap_or(self.boundaries.len());
        self.rates[bucket]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceParams {
    pub slip_threshold: f64,
    pub slip_score_below: f64,
    pub slip_protection: f64,
    pub guess_threshold: f64,
    pub guess_score_above: f64,
    pub guess_dampening: f64,
}

impl Default for ToleranceParams {
    fn default() -> Self {
        Self {
            slip_threshold: 0.7,
            slip_score_below: 0.5,
            slip_protection: 0.5,
            guess_threshold: 0.3,
            guess_score_above: 0.8,
            guess_dampening: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyParams {
    pub base_rate: f64,
}

impl Default for LegacyParams {
    fn default() -> Self {
        Self { base_rate: 0.3 }
    }
}

/// Constants of the earliest update variant. Kept apart from the slip/guess
/// model on purpose; the two were tuned independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertGuardParams {
    pub novice_rate: f64,
    pub expert_rate: f64,
    pub stage_boundary: f64,
    pub hold_min_score: f64,
    pub hold_bonus: f64,
    pub penalty_rate: f64,
}

impl Default for ExpertGuardParams {
    fn default() -> Self {
        Self {
            novice_rate: 0.3,
            expert_rate: 0.15,
            stage_boundary: 0.5,
            hold_min_score: 0.8,
            hold_bonus: 0.005,
            penalty_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MasteryConfig {
    pub ceilings: TierCeilings,
    pub decay: DecayParams,
    pub rate_stages: LearningRateStages,
    pub tolerance: ToleranceParams,
    pub legacy: LegacyParams,
    pub expert_guard: ExpertGuardParams,
    pub strategy: UpdateStrategy,
}

impl MasteryConfig {
    pub const PRECISION: i32 = 4;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.ceilings;
        for (name, value) in [
            ("ceilings.concept", c.concept),
            ("ceilings.basic_code", c.basic_code),
            ("ceilings.advanced", c.advanced),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        if c.concept > c.basic_code || c.basic_code > c.advanced {
            return Err(ConfigError::CeilingOrder {
                concept: c.concept,
                basic_code: c.basic_code,
                advanced: c.advanced,
            });
        }

        let unit_params = [
            ("decay.rate_per_day", self.decay.rate_per_day),
            ("decay.floor", self.decay.floor),
            ("tolerance.slip_protection", self.tolerance.slip_protection),
            ("tolerance.guess_dampening", self.tolerance.guess_dampening),
            ("legacy.base_rate", self.legacy.base_rate),
            ("expert_guard.novice_rate", self.expert_guard.novice_rate),
            ("expert_guard.expert_rate", self.expert_guard.expert_rate),
            ("expert_guard.penalty_rate", self.expert_guard.penalty_rate),
        ];
        for (name, value) in unit_params {
            check_unit(name, value)?;
        }
        for (i, rate) in self.rate_stages.rates.iter().enumerate() {
            check_unit(STAGE_RATE_NAMES[i], *rate)?;
        }
        if self.decay.floor <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "decay.floor",
                value: self.decay.floor,
                min: f64::MIN_POSITIVE,
                max: 1.0,
            });
        }
        let b = self.rate_stages.boundaries;
        let ascending = b.windows(2).all(|pair| pair[0] < pair[1]);
        if !ascending || !(b[0] > 0.0) || !(b[2] < 1.0) {
            return Err(ConfigError::StageOrder { boundaries: b });
        }
        if self.decay.grace_days < 0.0 || self.decay.grace_days.is_nan() {
            return Err(ConfigError::OutOfRange {
                name: "decay.grace_days",
                value: self.decay.grace_days,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        Ok(())
    }
}

const STAGE_RATE_NAMES: [&str; 4] = [
    "rate_stages.rates[0]",
    "rate_stages.rates[1]",
    "rate_stages.rates[2]",
    "rate_stages.rates[3]",
];

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(MasteryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rate_staircase_half_open() {
        let stages = LearningRateStages::default();
        assert_eq!(stages.rate_for(0.0), 0.40);
        assert_eq!(stages.rate_for(0.1999), 0.40);
        assert_eq!(stages.rate_for(0.2), 0.35);
        assert_eq!(stages.rate_for(0.5), 0.25);
        assert_eq!(stages.rate_for(0.8), 0.15);
        assert_eq!(stages.rate_for(1.0), 0.15);
    }

    #[test]
    fn test_inverted_ceilings_rejected() {
        let mut config = MasteryConfig::default();
        config.ceilings.basic_code = 0.3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CeilingOrder { .. })
        ));
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let mut config = MasteryConfig::default();
        config.ceilings.concept = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "ceilings.concept", .. })
        ));
    }

    #[test]
    fn test_zero_decay_floor_rejected() {
        let mut config = MasteryConfig::default();
        config.decay.floor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "decay.floor", .. })
        ));
    }

    #[test]
    fn test_unordered_stage_boundaries_rejected() {
        let mut config = MasteryConfig::default();
        config.rate_stages.boundaries = [0.5, 0.2, 0.8];
        assert_eq!(
            config.validate(),
            Err(ConfigError::StageOrder {
                boundaries: [0.5, 0.2, 0.8]
            })
        );

        config.rate_stages.boundaries = [0.2, 0.2, 0.8];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StageOrder { .. })
        ));
    }

    #[test]
    fn test_cap_for_unknown_label_uses_default_tier() {
        let ceilings = TierCeilings::default();
        assert_eq!(ceilings.cap_for_label("mystery"), 0.7);
        assert_eq!(ceilings.cap_for_label("quiz"), 0.4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MasteryConfig =
            serde_json::from_str(r#"{"legacy": {"base_rate": 0.25}}"#).unwrap();
        assert_eq!(config.legacy.base_rate, 0.25);
        assert_eq!(config.ceilings, TierCeilings::default());
    }
}

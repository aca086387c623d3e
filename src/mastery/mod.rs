//! Mastery layer - difficulty tiers and the adaptive mastery update
//!
//! Contains:
//! - DifficultyClassifier - keyword-driven tier detection
//! - MasteryEstimator - enhanced, legacy and expert-guard update strategies
//! - MasteryConfig - ceilings, decay, rate staircase and tolerance parameters

pub mod classifier;
pub mod config;
pub mod estimator;
pub mod types;

pub use classifier::{Classification, ClassifierConfig, DifficultyClassifier};
pub use config::{
    ConfigError, DecayParams, ExpertGuardParams, LearningRateStages, LegacyParams, MasteryConfig,
    TierCeilings, ToleranceParams,
};
pub use estimator::{MasteryEstimate, MasteryEstimator};
pub use types::*;

use serde::{Deserialize, Serialize};

/// Difficulty tier of a graded task. Harder tiers can prove more mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum DifficultyTier {
    Concept,
    #[default]
    BasicCode,
    Advanced,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Concept, Self::BasicCode, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::BasicCode => "basic_code",
            Self::Advanced => "advanced",
        }
    }

    /// Parses a tier label. Older task-type names are accepted as aliases;
    /// unknown labels fall back to the default tier.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "concept" | "quiz" => Self::Concept,
            "advanced" | "code_project" => Self::Advanced,
            "basic_code" | "code_basic" => Self::BasicCode,
            _ => Self::default(),
        }
    }
}

/// Teaching stage derived from the current mastery value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeachingStage {
    Enlightenment,
    Foundation,
    Intermediate,
    Expert,
}

impl TeachingStage {
    pub fn from_mastery(mastery: f64) -> Self {
        if mastery < 0.2 {
            Self::Enlightenment
        } else if mastery < 0.5 {
            Self::Foundation
        } else if mastery < 0.8 {
            Self::Intermediate
        } else {
            Self::Expert
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Self::Enlightenment => 0,
            Self::Foundation => 1,
            Self::Intermediate => 2,
            Self::Expert => 3,
        }
    }
}

/// Coarse grade for a single task score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreGrade {
    NeedsWork,
    Beginner,
    Good,
    Excellent,
    Perfect,
}

impl ScoreGrade {
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::NeedsWork
        } else if score < 0.5 {
            Self::Beginner
        } else if score < 0.8 {
            Self::Good
        } else if score < 0.95 {
            Self::Excellent
        } else {
            Self::Perfect
        }
    }
}

/// Which update formula produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum UpdateStrategy {
    /// Decay, staged learning rate and slip/guess tolerance.
    #[default]
    Enhanced,
    /// Single fixed rate EMA.
    Legacy,
    /// Earliest variant: two-stage rate plus special handling once mastery
    /// exceeds the task ceiling.
    ExpertGuard,
}

impl UpdateStrategy {
    pub fn from_enhanced_flag(use_enhanced: bool) -> Self {
        if use_enhanced {
            Self::Enhanced
        } else {
            Self::Legacy
        }
    }
}

/// Tolerance branch taken during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ToleranceKind {
    #[default]
    None,
    Slip,
    Guess,
    ExpertHold,
    ExpertPenalty,
}

/// Clamps into [0, 1]; NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_aliases() {
        assert_eq!(DifficultyTier::parse("quiz"), DifficultyTier::Concept);
        assert_eq!(DifficultyTier::parse("Code_Project"), DifficultyTier::Advanced);
        assert_eq!(DifficultyTier::parse(" basic_code "), DifficultyTier::BasicCode);
    }

    #[test]
    fn test_parse_unknown_falls_back() {
        assert_eq!(DifficultyTier::parse("essay"), DifficultyTier::BasicCode);
        assert_eq!(DifficultyTier::parse(""), DifficultyTier::default());
    }

    #[test]
    fn test_teaching_stage_boundaries() {
        assert_eq!(TeachingStage::from_mastery(0.0), TeachingStage::Enlightenment);
        assert_eq!(TeachingStage::from_mastery(0.2), TeachingStage::Foundation);
        assert_eq!(TeachingStage::from_mastery(0.5), TeachingStage::Intermediate);
        assert_eq!(TeachingStage::from_mastery(0.8), TeachingStage::Expert);
        assert_eq!(TeachingStage::from_mastery(1.0).index(), 3);
    }

    #[test]
    fn test_score_grade() {
        assert_eq!(ScoreGrade::from_score(0.1), ScoreGrade::NeedsWork);
        assert_eq!(ScoreGrade::from_score(0.94), ScoreGrade::Excellent);
        assert_eq!(ScoreGrade::from_score(0.95), ScoreGrade::Perfect);
    }

    #[test]
    fn test_clamp_unit_handles_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-3.0), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }

    #[test]
    fn test_flag_selects_strategy() {
        assert_eq!(UpdateStrategy::from_enhanced_flag(true), UpdateStrategy::Enhanced);
        assert_eq!(UpdateStrategy::from_enhanced_flag(false), UpdateStrategy::Legacy);
    }
}

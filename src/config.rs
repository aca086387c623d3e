use std::path::PathBuf;
use std::str::FromStr;

use crate::ledger::{LedgerStore, DEFAULT_TARGET_MASTERY};
use crate::mastery::{
    ClassifierConfig, ConfigError, DifficultyClassifier, MasteryConfig, MasteryEstimator,
    UpdateStrategy,
};
use crate::services::EvaluationService;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub state_file: Option<PathBuf>,
    pub keywords_file: Option<PathBuf>,
    pub default_target_mastery: f64,
    pub mastery: MasteryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
            state_file: None,
            keywords_file: None,
            default_target_mastery: DEFAULT_TARGET_MASTERY,
            mastery: MasteryConfig::default(),
        }
    }
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("RUST_LOG") {
            config.log_level = level;
        }
        config.file_logs = lookup("ASTRA_FILE_LOGS")
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false);
        if let Some(dir) = lookup("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        config.state_file = lookup("ASTRA_STATE_FILE").map(PathBuf::from);
        config.keywords_file = lookup("ASTRA_KEYWORDS_FILE").map(PathBuf::from);

        let m = &mut config.mastery;
        parse_into(&lookup, "ASTRA_LEARNING_RATE", &mut m.legacy.base_rate);
        parse_into(&lookup, "ASTRA_CAP_CONCEPT", &mut m.ceilings.concept);
        parse_into(&lookup, "ASTRA_CAP_BASIC_CODE", &mut m.ceilings.basic_code);
        parse_into(&lookup, "ASTRA_CAP_ADVANCED", &mut m.ceilings.advanced);
        parse_into(&lookup, "ASTRA_DECAY_GRACE_DAYS", &mut m.decay.grace_days);
        parse_into(&lookup, "ASTRA_DECAY_RATE", &mut m.decay.rate_per_day);
        parse_into(&lookup, "ASTRA_DEFAULT_TARGET", &mut config.default_target_mastery);

        let mut use_enhanced = true;
        parse_into(&lookup, "ASTRA_USE_ENHANCED", &mut use_enhanced);
        config.mastery.strategy = UpdateStrategy::from_enhanced_flag(use_enhanced);

        config
    }

    pub fn classifier_config(&self) -> Result<ClassifierConfig, ConfigError> {
        match &self.keywords_file {
            Some(path) => ClassifierConfig::from_json_file(path),
            None => Ok(ClassifierConfig::default()),
        }
    }

    pub fn estimator(&self) -> Result<MasteryEstimator, ConfigError> {
        self.mastery.validate()?;
        Ok(MasteryEstimator::new(self.mastery.clone()))
    }

    pub fn evaluation_service(&self) -> Result<EvaluationService, ConfigError> {
        let classifier = DifficultyClassifier::new(&self.classifier_config()?);
        Ok(EvaluationService::new(classifier, self.estimator()?))
    }

    pub fn ledger_store(&self) -> Option<LedgerStore> {
        self.state_file.as_ref().map(LedgerStore::new)
    }
}

fn parse_into<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!(key, value = %raw, "invalid config value, keeping default"),
        }
    }
}

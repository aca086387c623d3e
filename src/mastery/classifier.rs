//! Keyword-based difficulty classification.
//!
//! Priority is ADVANCED > BASIC_CODE > CONCEPT. The concept list is kept for
//! completeness but never needs to match: CONCEPT is the fallback.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::ConfigError;
use super::types::DifficultyTier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub advanced: Vec<String>,
    pub basic_code: Vec<String>,
    pub concept: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            advanced: words(&[
                "实现", "编写", "设计", "优化", "架构", "算法", "项目", "系统", "完整", "手写",
                "implement", "write", "design", "optimize", "architecture", "algorithm",
                "project", "system", "complete",
            ]),
            basic_code: words(&[
                "填空", "补全", "修改", "调试", "修复", "fill", "complete", "modify", "debug",
                "fix", "代码", "code", "函数", "function",
            ]),
            concept: words(&[
                "选择", "判断", "解释", "什么是", "为什么", "概念", "定义", "区别", "比较",
                "choose", "select", "explain", "what", "why", "concept", "definition",
                "difference", "compare",
            ]),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl ClassifierConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Keywords(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Keywords(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tier: DifficultyTier,
    /// Keyword that decided the tier; `None` when the fallback applied.
    pub matched_keyword: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DifficultyClassifier {
    advanced: Vec<String>,
    basic_code: Vec<String>,
}

impl Default for DifficultyClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl DifficultyClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            advanced: normalize(&config.advanced),
            basic_code: normalize(&config.basic_code),
        }
    }

    pub fn classify(&self, label_or_text: &str) -> DifficultyTier {
        self.classify_detailed(label_or_text).tier
    }

    pub fn classify_detailed(&self, label_or_text: &str) -> Classification {
        let input = label_or_text.to_lowercase();

        for (tier, keywords) in [
            (DifficultyTier::Advanced, &self.advanced),
            (DifficultyTier::BasicCode, &self.basic_code),
        ] {
            if let Some(hit) = keywords.iter().find(|k| input.contains(k.as_str())) {
                tracing::debug!(tier = tier.as_str(), keyword = %hit, "difficulty keyword matched");
                return Classification {
                    tier,
                    matched_keyword: Some(hit.clone()),
                };
            }
        }

        Classification {
            tier: DifficultyTier::Concept,
            matched_keyword: None,
        }
    }
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

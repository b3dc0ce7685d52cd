//! Extractor configuration: heading synonyms, sentinels and the default score.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::record::{Category, ScoreValue};
use crate::domain::CodegradeError;

/// Heading vocabulary and fallbacks used by the [`Extractor`](super::Extractor).
///
/// Header terms are matched case-insensitively as whole words at the start
/// of a line. Missing keys in a TOML file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Headings that open the strengths section.
    pub strengths_headers: Vec<String>,

    /// Headings that open the improvements section.
    pub improvements_headers: Vec<String>,

    /// Headings that close either section.
    pub terminator_headers: Vec<String>,

    /// Placeholder used when no strengths are found.
    pub strengths_sentinel: String,

    /// Placeholder used when no improvements are found.
    pub improvements_sentinel: String,

    /// Score used when the text has no numeric signal.
    pub default_score: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            strengths_headers: strings(&["strengths", "strength", "pros"]),
            improvements_headers: strings(&[
                "areas for improvement",
                "area for improvement",
                "improvements",
                "improvement",
                "weaknesses",
                "cons",
            ]),
            terminator_headers: strings(&[
                "suggestions",
                "recommendations",
                "conclusion",
                "detailed analysis",
                "summary",
            ]),
            strengths_sentinel: "No specific strengths identified".to_string(),
            improvements_sentinel: "No specific improvements suggested".to_string(),
            default_score: ScoreValue::NEUTRAL,
        }
    }
}

impl ExtractorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> crate::domain::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw).map_err(CodegradeError::from)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every header set is usable and the default score is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (set, terms) in [
            ("strengths_headers", &self.strengths_headers),
            ("improvements_headers", &self.improvements_headers),
            ("terminator_headers", &self.terminator_headers),
        ] {
            if terms.is_empty() {
                return Err(ConfigError::EmptyHeaderSet { set });
            }
            if terms.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::BlankHeader { set });
            }
        }

        for category in Category::ALL {
            if self.sentinel(category).trim().is_empty() {
                return Err(ConfigError::BlankSentinel {
                    category: category.as_str(),
                });
            }
        }

        if !(ScoreValue::MIN..=ScoreValue::MAX).contains(&self.default_score) {
            return Err(ConfigError::DefaultScoreOutOfRange(self.default_score));
        }
        Ok(())
    }

    pub fn headers(&self, category: Category) -> &[String] {
        match category {
            Category::Strengths => &self.strengths_headers,
            Category::Improvements => &self.improvements_headers,
        }
    }

    pub fn sentinel(&self, category: Category) -> &str {
        match category {
            Category::Strengths => &self.strengths_sentinel,
            Category::Improvements => &self.improvements_sentinel,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

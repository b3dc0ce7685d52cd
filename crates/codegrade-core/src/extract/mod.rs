//! Evaluation-report extraction.
//!
//! Turns a model's free-form review into an [`EvaluationRecord`]. Extraction
//! is pure and infallible: malformed or empty input yields the default score
//! and sentinel statements. Only building an [`Extractor`] from a custom
//! [`ExtractorConfig`] can fail.

pub mod config;
pub mod score;
pub mod sections;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::record::{Category, EvaluationRecord, ScoreValue};
use crate::metrics::METRICS;
use crate::obs;

pub use config::ExtractorConfig;
pub use score::{extract_score, ScoreOutcome, ScoreRule};
pub use sections::{split_items, SectionOutcome, SectionStrategy};

use sections::SectionPatterns;

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(|| {
    Extractor::new(ExtractorConfig::default()).expect("default extractor config is valid")
});

/// Extract a record using the default configuration.
pub fn extract(text: &str) -> EvaluationRecord {
    DEFAULT_EXTRACTOR.extract(text)
}

/// How each field of a record was recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionDiagnostics {
    pub score_rule: Option<ScoreRule>,
    pub strengths_strategy: Option<SectionStrategy>,
    pub improvements_strategy: Option<SectionStrategy>,
}

impl ExtractionDiagnostics {
    /// Whether any field fell back to its default or sentinel.
    pub fn used_fallback(&self) -> bool {
        self.score_rule.is_none()
            || self.strengths_strategy.is_none()
            || self.improvements_strategy.is_none()
    }
}

/// A record together with its [`ExtractionDiagnostics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub record: EvaluationRecord,
    pub diagnostics: ExtractionDiagnostics,
}

/// Compiled extractor. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    strengths: SectionPatterns,
    improvements: SectionPatterns,
}

impl Extractor {
    /// Validate `config` and compile its heading patterns.
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let strengths = SectionPatterns::compile(&config, Category::Strengths)?;
        let improvements = SectionPatterns::compile(&config, Category::Improvements)?;
        Ok(Self {
            config,
            strengths,
            improvements,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a record from `text`.
    pub fn extract(&self, text: &str) -> EvaluationRecord {
        self.extract_with_diagnostics(text).record
    }

    /// Extract a record and report which rule or strategy produced each field.
    pub fn extract_with_diagnostics(&self, text: &str) -> Extraction {
        let _span = obs::ExtractionSpan::enter(text.len());
        METRICS.inc_extractions();

        let score = extract_score(text, ScoreValue::new(self.config.default_score));
        obs::emit_score_extracted(score.rule.map(ScoreRule::as_str), score.value.value());
        if score.rule.is_none() {
            METRICS.inc_score_defaults();
        }

        let strengths = self.section(text, Category::Strengths);
        let improvements = self.section(text, Category::Improvements);

        Extraction {
            diagnostics: ExtractionDiagnostics {
                score_rule: score.rule,
                strengths_strategy: strengths.strategy,
                improvements_strategy: improvements.strategy,
            },
            record: EvaluationRecord {
                score: score.value,
                strengths: strengths.items,
                improvements: improvements.items,
                raw_text: text.to_string(),
            },
        }
    }

    /// Recover the statements for a single category.
    pub fn section(&self, text: &str, category: Category) -> SectionOutcome {
        let patterns = match category {
            Category::Strengths => &self.strengths,
            Category::Improvements => &self.improvements,
        };
        let outcome = sections::extract_section(text, patterns, self.config.sentinel(category));

        match outcome.strategy {
            Some(strategy) => {
                obs::emit_section_extracted(category.as_str(), strategy.as_str(), outcome.items.len())
            }
            None => {
                obs::emit_sentinel_used(category.as_str());
                METRICS.inc_sentinel_fallbacks();
            }
        }
        outcome
    }
}

impl Default for Extractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

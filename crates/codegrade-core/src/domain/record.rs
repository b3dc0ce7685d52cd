//! Evaluation records and their building blocks.

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RecordError;

/// Quality rating on a 1–10 scale.
///
/// Always within `[ScoreValue::MIN, ScoreValue::MAX]`. Out-of-range input is
/// clamped, `NaN` becomes [`ScoreValue::NEUTRAL`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ScoreValue(f64);

impl ScoreValue {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 10.0;
    pub const NEUTRAL: f64 = 5.0;

    /// Create a score, clamping to `[1.0, 10.0]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::NEUTRAL);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// The neutral score used when no numeric signal is found.
    pub fn neutral() -> Self {
        Self(Self::NEUTRAL)
    }

    /// Get the raw score value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ScoreValue {
    fn default() -> Self {
        Self::neutral()
    }
}

impl From<f64> for ScoreValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ScoreValue> for f64 {
    fn from(score: ScoreValue) -> Self {
        score.0
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Ordered, non-empty list of trimmed statements.
///
/// Order of first appearance is preserved and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct StatementList(Vec<String>);

impl StatementList {
    /// Build a list from raw fragments, trimming each and dropping blanks.
    ///
    /// Returns `None` when nothing survives.
    pub fn from_items<I, S>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kept: Vec<String> = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(Self(kept))
        }
    }

    /// A list holding exactly one placeholder statement.
    pub fn sentinel(text: &str) -> Self {
        Self(vec![text.trim().to_string()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for StatementList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<String>> for StatementList {
    type Error = RecordError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        if items.is_empty() {
            return Err(RecordError::EmptyStatementList);
        }
        if let Some(idx) = items.iter().position(|s| s.trim().is_empty()) {
            return Err(RecordError::BlankStatement(idx));
        }
        Ok(Self(items.into_iter().map(|s| s.trim().to_string()).collect()))
    }
}

impl From<StatementList> for Vec<String> {
    fn from(list: StatementList) -> Self {
        list.0
    }
}

/// The two statement categories an evaluation is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strengths,
    Improvements,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Strengths, Category::Improvements];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strengths => "strengths",
            Self::Improvements => "improvements",
        }
    }

    /// The category whose headings close this category's section.
    pub fn other(self) -> Self {
        match self {
            Self::Strengths => Self::Improvements,
            Self::Improvements => Self::Strengths,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Normalized 1–10 rating.
    pub score: ScoreValue,

    /// What the review praised.
    pub strengths: StatementList,

    /// What the review asked to change.
    pub improvements: StatementList,

    /// The model output the record was extracted from, unmodified.
    pub raw_text: String,
}

impl EvaluationRecord {
    /// The statement list for `category`.
    pub fn statements(&self, category: Category) -> &StatementList {
        match category {
            Category::Strengths => &self.strengths,
            Category::Improvements => &self.improvements,
        }
    }

    /// Map this record onto the `evaluations` table row shape.
    ///
    /// New rows always start non-premium; unlocking goes through
    /// [`PremiumState`](super::premium::PremiumState).
    pub fn to_row(&self, model_used: &str, task_id: Option<Uuid>) -> EvaluationRow {
        EvaluationRow {
            task_id,
            score: self.score.value(),
            strengths: self.strengths.as_slice().to_vec(),
            improvements: self.improvements.as_slice().to_vec(),
            full_evaluation: self.raw_text.clone(),
            is_premium: false,
            model_used: model_used.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Row shape for persisting an [`EvaluationRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    /// Task the evaluation belongs to, when one was created first.
    pub task_id: Option<Uuid>,
    pub score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub full_evaluation: String,
    pub is_premium: bool,
    pub model_used: String,
    pub created_at: DateTime<Utc>,
}

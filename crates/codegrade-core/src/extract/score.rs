//! Score recovery from free-form review text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::record::ScoreValue;

static EMPHASIZED_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\s*(\d+(?:\.\d+)?)\s*/\s*10\s*\*\*").expect("valid emphasized fraction regex")
});

static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:score|rating)[:\s]*(\d+(?:\.\d+)?)(?:\s*/\s*10)?")
        .expect("valid labeled score regex")
});

static FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:/|out\s+of)\s*10\b").expect("valid fraction regex")
});

/// Score patterns, tried in [`ScoreRule::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    /// `**7/10**`
    EmphasizedFraction,
    /// `Score: 7`, `rating 7/10`
    Labeled,
    /// `7/10`, `7 out of 10`
    Fraction,
}

impl ScoreRule {
    pub const ORDER: [ScoreRule; 3] = [
        ScoreRule::EmphasizedFraction,
        ScoreRule::Labeled,
        ScoreRule::Fraction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmphasizedFraction => "emphasized_fraction",
            Self::Labeled => "labeled",
            Self::Fraction => "fraction",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::EmphasizedFraction => &EMPHASIZED_FRACTION,
            Self::Labeled => &LABELED,
            Self::Fraction => &FRACTION,
        }
    }

    /// The first number this rule finds in `text`, unclamped.
    ///
    /// Matches whose number does not parse to a finite value are skipped.
    pub fn find(self, text: &str) -> Option<f64> {
        self.pattern()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .find(|v| v.is_finite())
    }
}

/// Which rule produced a score, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub value: ScoreValue,
    pub rule: Option<ScoreRule>,
}

/// Recover a score from `text`, falling back to `default`.
pub fn extract_score(text: &str, default: ScoreValue) -> ScoreOutcome {
    ScoreRule::ORDER
        .iter()
        .find_map(|rule| {
            rule.find(text).map(|raw| ScoreOutcome {
                value: ScoreValue::new(raw),
                rule: Some(*rule),
            })
        })
        .unwrap_or(ScoreOutcome {
            value: default,
            rule: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> ScoreOutcome {
        extract_score(text, ScoreValue::neutral())
    }

    #[test]
    fn test_emphasized_fraction_with_decimal() {
        let out = score("Overall: **7.5/10** for this module.");
        assert_eq!(out.value.value(), 7.5);
        assert_eq!(out.rule, Some(ScoreRule::EmphasizedFraction));
    }

    #[test]
    fn test_emphasized_fraction_wins_over_earlier_label() {
        let out = score("Rating criteria: 3 dimensions.\nFinal: **8 / 10**");
        assert_eq!(out.value.value(), 8.0);
        assert_eq!(out.rule, Some(ScoreRule::EmphasizedFraction));
    }

    #[test]
    fn test_labeled_without_suffix() {
        let out = score("Score: 3");
        assert_eq!(out.value.value(), 3.0);
        assert_eq!(out.rule, Some(ScoreRule::Labeled));
    }

    #[test]
    fn test_labeled_case_insensitive_with_suffix() {
        let out = score("## RATING 6.5/10");
        assert_eq!(out.value.value(), 6.5);
        assert_eq!(out.rule, Some(ScoreRule::Labeled));
    }

    #[test]
    fn test_label_must_start_a_word() {
        let out = score("underscore: 3 and no overrating 4");
        assert_eq!(out.rule, None);
        assert_eq!(out.value.value(), 5.0);
    }

    #[test]
    fn test_out_of_ten() {
        let out = score("I would give this 4 out of 10.");
        assert_eq!(out.value.value(), 4.0);
        assert_eq!(out.rule, Some(ScoreRule::Fraction));
    }

    #[test]
    fn test_bare_fraction() {
        let out = score("Verdict: 9/10, ship it");
        assert_eq!(out.value.value(), 9.0);
        assert_eq!(out.rule, Some(ScoreRule::Fraction));
    }

    #[test]
    fn test_fraction_over_hundred_not_matched() {
        let out = score("Coverage is 45/100.");
        assert_eq!(out.rule, None);
        assert_eq!(out.value.value(), 5.0);
    }

    #[test]
    fn test_no_numeric_signal_uses_default() {
        let out = score("Nicely structured code with clear intent.");
        assert_eq!(out.value.value(), 5.0);
        assert_eq!(out.rule, None);

        let out = extract_score("", ScoreValue::new(6.0));
        assert_eq!(out.value.value(), 6.0);
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        assert_eq!(score("Score: 15").value.value(), 10.0);
        assert_eq!(score("Score: 0").value.value(), 1.0);
        assert_eq!(score("**12/10**").value.value(), 10.0);
    }

    #[test]
    fn test_overflowing_number_falls_through() {
        let huge = "9".repeat(400);
        let text = format!("Score: {huge}\nLater: 6/10");
        let out = score(&text);
        assert_eq!(out.value.value(), 6.0);
        assert_eq!(out.rule, Some(ScoreRule::Fraction));
    }

    #[test]
    fn test_order_is_priority_order() {
        assert_eq!(
            ScoreRule::ORDER,
            [
                ScoreRule::EmphasizedFraction,
                ScoreRule::Labeled,
                ScoreRule::Fraction
            ]
        );
    }
}

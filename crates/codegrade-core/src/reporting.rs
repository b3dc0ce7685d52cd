use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::domain::premium::PremiumState;
use crate::domain::record::{EvaluationRecord, ScoreValue, StatementList};
use crate::extract::{Extraction, ExtractionDiagnostics};

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Number of raw-text characters shown to non-premium viewers.
pub const PREVIEW_CHARS: usize = 200;

/// Persisted extraction result, written for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    /// SHA256 hex digest of `record.raw_text`.
    pub raw_text_sha256: String,
    pub record: EvaluationRecord,
    pub diagnostics: ExtractionDiagnostics,
}

impl ReportArtifact {
    pub fn new(extraction: Extraction) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            raw_text_sha256: text_digest(&extraction.record.raw_text),
            record: extraction.record,
            diagnostics: extraction.diagnostics,
        }
    }
}

/// SHA256 hex digest of a text blob.
pub fn text_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Write a report artifact in pretty JSON format.
pub fn write_report_json(path: &Path, artifact: &ReportArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize report artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read a report artifact back, checking the raw text digest.
pub fn read_report_json(path: &Path) -> Result<ReportArtifact> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    let artifact: ReportArtifact =
        serde_json::from_str(&content).context("deserialize report artifact")?;
    let actual = text_digest(&artifact.record.raw_text);
    if actual != artifact.raw_text_sha256 {
        anyhow::bail!(
            "raw text digest mismatch: expected {}, got {}",
            artifact.raw_text_sha256,
            actual
        );
    }
    Ok(artifact)
}

/// Render a markdown summary of a record.
pub fn render_report_md(record: &EvaluationRecord) -> String {
    let mut out = String::new();
    out.push_str("# Code Evaluation\n\n");
    out.push_str(&format!("**Score:** {}/10\n\n", record.score));

    out.push_str("## Strengths\n");
    push_list(&mut out, &record.strengths);
    out.push('\n');

    out.push_str("## Improvements\n");
    push_list(&mut out, &record.improvements);
    out
}

fn push_list(out: &mut String, items: &StatementList) {
    for item in items.iter() {
        out.push_str(&format!("- {}\n", item));
    }
}

/// What a viewer is allowed to see of a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportView {
    pub score: ScoreValue,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Full raw text for premium viewers, a truncated preview otherwise.
    pub report: String,
    pub is_premium: bool,
}

impl ReportView {
    pub fn for_state(record: &EvaluationRecord, state: &PremiumState) -> Self {
        let is_premium = state.is_premium();
        let report = if is_premium {
            record.raw_text.clone()
        } else {
            preview(&record.raw_text, PREVIEW_CHARS)
        };

        Self {
            score: record.score,
            strengths: record.strengths.as_slice().to_vec(),
            improvements: record.improvements.as_slice().to_vec(),
            report,
            is_premium,
        }
    }
}

/// The first `max_chars` characters of `text`, with `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

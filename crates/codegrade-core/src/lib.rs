//! codegrade core library
//!
//! Structured extraction of score, strengths and improvements from
//! free-form code-review text, plus the submission, premium-unlock and
//! reporting pieces that surround it.

pub mod domain;
pub mod extract;
pub mod metrics;
pub mod obs;
pub mod prompt;
pub mod reporting;
pub mod telemetry;

pub use domain::{
    Category, CodegradeError, ConfigError, EvaluationRecord, EvaluationRow, PaymentEvent,
    PremiumError, PremiumState, RecordError, Result, ReviewRequest, ScoreValue, StatementList,
    SubmissionError, Transition, MAX_CODE_LENGTH,
};

pub use extract::{
    extract, extract_score, split_items, Extraction, ExtractionDiagnostics, Extractor,
    ExtractorConfig, ScoreOutcome, ScoreRule, SectionOutcome, SectionStrategy,
};

pub use prompt::build_review_prompt;
pub use reporting::{
    preview, read_report_json, render_report_md, text_digest, write_report_json, ReportArtifact,
    ReportView, PREVIEW_CHARS, REPORT_SCHEMA_VERSION,
};

pub use metrics::METRICS;
pub use obs::{
    emit_premium_transition, emit_score_extracted, emit_section_extracted, emit_sentinel_used,
    ExtractionSpan,
};
pub use telemetry::init_tracing;

/// codegrade version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Structured observability hooks for extraction and premium events.
//!
//! Extraction details are emitted at `debug!`, fallbacks and state changes at
//! `info!`. Set `RUST_LOG=codegrade_core=debug` to see every rule decision.

use tracing::{debug, info};

/// RAII guard that enters an extraction-scoped tracing span.
pub struct ExtractionSpan {
    _span: tracing::span::EnteredSpan,
}

impl ExtractionSpan {
    /// Create and enter a span tagged with the input length in bytes.
    pub fn enter(input_len: usize) -> Self {
        let span = tracing::debug_span!("codegrade.extract", input_len = input_len);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: score recovered (`rule` is `None` when the default was used).
pub fn emit_score_extracted(rule: Option<&str>, score: f64) {
    debug!(
        event = "extract.score",
        rule = rule.unwrap_or("default"),
        score = score,
    );
}

/// Emit event: statements recovered for a category.
pub fn emit_section_extracted(category: &str, strategy: &str, count: usize) {
    debug!(
        event = "extract.section",
        category = %category,
        strategy = %strategy,
        count = count,
    );
}

/// Emit event: no statements found, sentinel used.
pub fn emit_sentinel_used(category: &str) {
    info!(event = "extract.sentinel", category = %category);
}

/// Emit event: premium state changed.
pub fn emit_premium_transition(from: &str, to: &str, trigger: &str) {
    info!(
        event = "premium.transition",
        from = %from,
        to = %to,
        trigger = %trigger,
    );
}

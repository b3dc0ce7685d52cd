//! Domain models for codegrade.
//!
//! Canonical definitions for the core entities:
//! - `EvaluationRecord`: score, strengths and improvements extracted from a review
//! - `ReviewRequest`: code submitted for review
//! - `PremiumState`: unlock state of the detailed report

pub mod error;
pub mod premium;
pub mod record;
pub mod submission;

// Re-export main types and errors
pub use error::{CodegradeError, ConfigError, PremiumError, RecordError, Result, SubmissionError};
pub use premium::{PaymentEvent, PremiumState, Transition};
pub use record::{Category, EvaluationRecord, EvaluationRow, ScoreValue, StatementList};
pub use submission::{ReviewRequest, MAX_CODE_LENGTH};

//! Domain-level error taxonomy for codegrade.
//!
//! Extraction itself never fails; these errors only arise at the edges
//! (configuration, submissions, premium transitions, artifact I/O).

/// Errors produced while validating or loading an [`ExtractorConfig`].
///
/// [`ExtractorConfig`]: crate::extract::ExtractorConfig
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("header set '{set}' must not be empty")]
    EmptyHeaderSet { set: &'static str },

    #[error("header set '{set}' contains a blank entry")]
    BlankHeader { set: &'static str },

    #[error("sentinel for {category} must not be blank")]
    BlankSentinel { category: &'static str },

    #[error("default score {0} is outside [1, 10]")]
    DefaultScoreOutOfRange(f64),

    #[error("failed to compile header pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to render TOML config: {0}")]
    TomlRender(#[from] toml::ser::Error),
}

/// Errors produced by review submission validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("code must not be empty")]
    EmptyCode,

    #[error("code is {len} characters, limit is {max}")]
    CodeTooLong { len: usize, max: usize },
}

/// Errors produced by the premium unlock state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PremiumError {
    #[error("event {event} is not valid in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("payment for order {got} does not match pending order {expected}")]
    OrderMismatch { expected: String, got: String },

    #[error("order id must not be empty")]
    EmptyOrderId,
}

/// Errors produced when a persisted [`StatementList`] violates its invariant.
///
/// [`StatementList`]: crate::domain::StatementList
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("statement list must contain at least one entry")]
    EmptyStatementList,

    #[error("statement at index {0} is blank")]
    BlankStatement(usize),
}

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum CodegradeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("premium error: {0}")]
    Premium(#[from] PremiumError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codegrade operations.
pub type Result<T> = std::result::Result<T, CodegradeError>;

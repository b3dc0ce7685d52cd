//! Code review submissions.

use serde::{Deserialize, Serialize};

use super::error::SubmissionError;

/// Maximum accepted code length, in characters.
pub const MAX_CODE_LENGTH: usize = 5000;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_DESCRIPTION: &str = "No description provided";

/// A user's request to have a piece of code reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub title: String,
    pub description: String,
    pub code: String,
}

impl ReviewRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            code: code.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the code payload and fill in blank metadata.
    ///
    /// # Errors
    ///
    /// - `SubmissionError::EmptyCode`: code is empty or whitespace only.
    /// - `SubmissionError::CodeTooLong`: code exceeds [`MAX_CODE_LENGTH`]
    ///   characters.
    pub fn validate(self) -> Result<Self, SubmissionError> {
        if self.code.trim().is_empty() {
            return Err(SubmissionError::EmptyCode);
        }
        let len = self.code.chars().count();
        if len > MAX_CODE_LENGTH {
            return Err(SubmissionError::CodeTooLong {
                len,
                max: MAX_CODE_LENGTH,
            });
        }

        Ok(Self {
            title: or_default(self.title, DEFAULT_TITLE),
            description: or_default(self.description, DEFAULT_DESCRIPTION),
            code: self.code,
        })
    }
}

fn or_default(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

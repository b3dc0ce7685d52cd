//! Reviewer prompt rendering.
//!
//! The headings requested here are the ones the default
//! [`ExtractorConfig`](crate::extract::ExtractorConfig) recognizes, so a model
//! that follows the instructions produces text the structural strategy can
//! split.

use crate::domain::submission::ReviewRequest;

/// Render the reviewer prompt for a validated request.
pub fn build_review_prompt(request: &ReviewRequest) -> String {
    format!(
        "You are an expert code reviewer. Evaluate the following code for quality, \
best practices and potential improvements.

Title: {title}
Description: {description}

Code:
```
{code}
```

Structure your answer with these markdown sections:
## Score
A single rating written as **N/10**, where N is between 1 and 10.
## Strengths
One bullet point (\"- \") per strength.
## Areas for Improvement
One bullet point (\"- \") per issue.
## Suggestions
Concrete changes that would raise the score.
",
        title = request.title,
        description = request.description,
        code = request.code.trim_end(),
    )
}

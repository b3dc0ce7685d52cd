//! Strengths / improvements recovery from free-form review text.
//!
//! Each [`Category`] has an ordered list of [`SectionStrategy`] values. The
//! first strategy that yields at least one statement wins; when none does the
//! category's sentinel is used.
//!
//! List items start at a line beginning with `-`, `*`, `•` or an ordinal
//! (`1.` / `1)`). Non-marker lines that follow are joined onto the current
//! item with a single space; a blank line ends it. A markdown heading ends
//! the section.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::record::{Category, StatementList};

use super::config::ExtractorConfig;

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]\s+|•\s*|\d{1,2}[.)]\s+)(.*)$").expect("valid list item regex")
});

static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]\s+|•\s*)(.*)$").expect("valid bullet item regex")
});

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]").expect("valid markdown heading regex"));

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-=*_\s]*$").expect("valid separator regex"));

static SIGNAL_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)[^.!?\n]*\b(?:improv\w*|consider\w*|recommend\w*|suggest\w*|better|should|avoid\w*)\b[^.!?\n]*(?:[.!?]|$)",
    )
    .expect("valid signal sentence regex")
});

/// Ways of recovering statements, tried in the order returned by
/// [`SectionStrategy::for_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStrategy {
    /// List items under the category's own heading.
    Structural,
    /// Every bullet line in the text.
    BulletLines,
    /// Every sentence carrying an improvement-signal word.
    SignalSentences,
}

impl SectionStrategy {
    pub fn for_category(category: Category) -> &'static [SectionStrategy] {
        match category {
            Category::Strengths => &[Self::Structural, Self::BulletLines],
            Category::Improvements => &[Self::Structural, Self::SignalSentences],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::BulletLines => "bullet_lines",
            Self::SignalSentences => "signal_sentences",
        }
    }
}

/// Statements found for one category and the strategy that found them.
///
/// `strategy` is `None` when `items` holds the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub items: StatementList,
    pub strategy: Option<SectionStrategy>,
}

/// Compiled heading patterns for one category.
#[derive(Debug, Clone)]
pub(crate) struct SectionPatterns {
    category: Category,
    heading: Regex,
    terminator: Regex,
}

impl SectionPatterns {
    pub(crate) fn compile(config: &ExtractorConfig, category: Category) -> Result<Self, ConfigError> {
        let heading = heading_pattern(config.headers(category))?;

        let mut closing: Vec<String> = config.headers(category.other()).to_vec();
        closing.extend(config.terminator_headers.iter().cloned());
        let terminator = heading_pattern(&closing)?;

        Ok(Self {
            category,
            heading,
            terminator,
        })
    }

    /// The text between this category's first heading and the next closing
    /// heading, markdown heading, or the end of the text.
    fn section<'t>(&self, text: &'t str) -> Option<&'t str> {
        let start = self.heading.find(text)?.end();
        let rest = &text[start..];
        let end = [&self.terminator, &*MARKDOWN_HEADING]
            .iter()
            .filter_map(|re| re.find(rest).map(|m| m.start()))
            .min()
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

/// Build a line-anchored heading regex for `terms`.
///
/// Accepts optional `#` marks, `**` emphasis and an ordinal before the term.
/// Lines marked with `#` or opening `**` may carry trailing words after the
/// term (`## Strengths of the Code`); bare lines need a colon or the end of
/// the line right after it, so prose that starts with a term is not a heading.
fn heading_pattern(terms: &[String]) -> Result<Regex, regex::Error> {
    let mut sorted: Vec<&str> = terms.iter().map(|t| t.trim()).collect();
    // Longest first so "areas for improvement" wins over "improvement".
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternatives = sorted
        .iter()
        .map(|t| {
            t.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[ \t]+")
        })
        .collect::<Vec<_>>()
        .join("|");

    let ordinal = r"\d{1,2}[.)][ \t]*";
    let marked = format!(
        r"(?:#{{1,6}}[ \t]*\*{{0,3}}[ \t]*(?:{ordinal})?\*{{0,3}}|(?:{ordinal})?\*{{2,3}})[ \t]*(?:{alternatives})(?:\*{{0,3}}[ \t]+[^:\n]*?)?"
    );
    let bare = format!(r"(?:{ordinal})?\*{{0,3}}[ \t]*(?:{alternatives})");

    Regex::new(&format!(
        r"(?im)^[ \t]*(?:{marked}|{bare})[ \t]*\*{{0,3}}[ \t]*(?::[ \t]*\*{{0,3}}|\r?$)"
    ))
}

/// Run the category's strategies in order, falling back to `sentinel`.
pub(crate) fn extract_section(text: &str, patterns: &SectionPatterns, sentinel: &str) -> SectionOutcome {
    SectionStrategy::for_category(patterns.category)
        .iter()
        .find_map(|strategy| {
            let items = apply_strategy(*strategy, text, patterns)?;
            StatementList::from_items(items).map(|items| SectionOutcome {
                items,
                strategy: Some(*strategy),
            })
        })
        .unwrap_or_else(|| SectionOutcome {
            items: StatementList::sentinel(sentinel),
            strategy: None,
        })
}

fn apply_strategy(strategy: SectionStrategy, text: &str, patterns: &SectionPatterns) -> Option<Vec<String>> {
    let items = match strategy {
        SectionStrategy::Structural => split_items(patterns.section(text)?),
        SectionStrategy::BulletLines => bullet_lines(text),
        SectionStrategy::SignalSentences => signal_sentences(text),
    };
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Split a section body into list items.
pub fn split_items(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current: Option<String> = None;

    for line in body.lines() {
        let trimmed = line.trim();
        if MARKDOWN_HEADING.is_match(line) {
            break;
        }
        if trimmed.is_empty() || is_separator(trimmed) {
            flush(&mut current, &mut items);
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            flush(&mut current, &mut items);
            current = Some(caps[1].trim().to_string());
        } else if let Some(item) = current.as_mut() {
            if !item.is_empty() {
                item.push(' ');
            }
            item.push_str(trimmed);
        } else {
            current = Some(trimmed.to_string());
        }
    }
    flush(&mut current, &mut items);
    items
}

fn flush(current: &mut Option<String>, items: &mut Vec<String>) {
    if let Some(item) = current.take() {
        let item = item.trim();
        if !item.is_empty() && !is_separator(item) {
            items.push(item.to_string());
        }
    }
}

fn is_separator(fragment: &str) -> bool {
    SEPARATOR.is_match(fragment)
}

fn bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| BULLET_ITEM.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|item| !item.is_empty() && !is_separator(item))
        .collect()
}

fn signal_sentences(text: &str) -> Vec<String> {
    SIGNAL_SENTENCE
        .find_iter(text)
        .map(|m| strip_list_marker(m.as_str().trim()))
        .filter(|s| !s.is_empty() && !is_separator(s))
        .collect()
}

fn strip_list_marker(line: &str) -> String {
    match LIST_ITEM.captures(line) {
        Some(caps) => caps[1].trim().to_string(),
        None => line.trim_start_matches('#').trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(category: Category) -> SectionPatterns {
        SectionPatterns::compile(&ExtractorConfig::default(), category).expect("compile")
    }

    fn section(text: &str, category: Category) -> SectionOutcome {
        let config = ExtractorConfig::default();
        extract_section(text, &patterns(category), config.sentinel(category))
    }

    #[test]
    fn test_heading_variants_match() {
        let p = patterns(Category::Strengths);
        for heading in [
            "## Strengths",
            "### 2. Strengths:",
            "**Strengths:**",
            "1. **Pros**",
            "Strengths: clear naming",
            "  #Strength",
        ] {
            assert!(p.heading.is_match(heading), "should match {heading:?}");
        }
    }

    #[test]
    fn test_heading_requires_line_start_and_boundary() {
        let p = patterns(Category::Strengths);
        for line in [
            "The strengths are many",
            "Prose: long",
            "Strengths of this approach include speed",
            "- Strengths: bullet",
        ] {
            assert!(!p.heading.is_match(line), "should not match {line:?}");
        }
    }

    #[test]
    fn test_marked_heading_allows_trailing_words() {
        let strengths = patterns(Category::Strengths);
        let improvements = patterns(Category::Improvements);
        assert!(strengths.heading.is_match("## Strengths of the Code"));
        assert!(strengths.heading.is_match("**Strengths of this approach:** speed"));
        assert!(improvements
            .heading
            .is_match("### 2. Areas for Improvement in Error Handling"));
        assert!(strengths
            .terminator
            .is_match("## Areas for Improvement in Error Handling"));
        assert!(!strengths.heading.is_match("## Strengthening the API"));
    }

    #[test]
    fn test_multiword_heading_tolerates_spacing() {
        let p = patterns(Category::Improvements);
        assert!(p.heading.is_match("### Areas  for\tImprovement"));
    }

    #[test]
    fn test_split_items_joins_continuations() {
        let body = "\n- first item\n  wraps here\n- second\n\n* third\n";
        assert_eq!(
            split_items(body),
            vec!["first item wraps here", "second", "third"]
        );
    }

    #[test]
    fn test_split_items_keeps_leading_text() {
        let body = " good overall\n- naming\n";
        assert_eq!(split_items(body), vec!["good overall", "naming"]);
    }

    #[test]
    fn test_split_items_numbered_and_bullets() {
        let body = "\n1. Uses iterators\n2) Small functions\n• Typed errors\n";
        assert_eq!(
            split_items(body),
            vec!["Uses iterators", "Small functions", "Typed errors"]
        );
    }

    #[test]
    fn test_split_items_drops_separators() {
        let body = "\n- one\n---\n===\n- two\n___\n";
        assert_eq!(split_items(body), vec!["one", "two"]);
    }

    #[test]
    fn test_split_items_bold_line_is_not_a_bullet() {
        let body = "\n**Readability**: variable names are clear\n";
        assert_eq!(
            split_items(body),
            vec!["**Readability**: variable names are clear"]
        );
    }

    #[test]
    fn test_split_items_stops_at_markdown_heading() {
        let body = "\n- Clear naming\n### Performance\nLoops allocate.\n";
        assert_eq!(split_items(body), vec!["Clear naming"]);
    }

    #[test]
    fn test_structural_stops_at_unrelated_heading() {
        let text = "## Strengths\n- Clear naming\n### Performance\nLoops allocate.\n## Improvements\n- docs\n";
        let out = section(text, Category::Strengths);
        assert_eq!(out.strategy, Some(SectionStrategy::Structural));
        assert_eq!(out.items.as_slice(), &["Clear naming".to_string()]);
    }

    #[test]
    fn test_trailing_word_headings_keep_sections_apart() {
        let text = "## Strengths of the Code\n- Clear naming\n- Small functions\n\n## Areas for Improvement in Error Handling\n- Replace unwrap with ?\n";
        let strengths = section(text, Category::Strengths);
        let improvements = section(text, Category::Improvements);

        assert_eq!(strengths.strategy, Some(SectionStrategy::Structural));
        assert_eq!(
            strengths.items.as_slice(),
            &["Clear naming".to_string(), "Small functions".to_string()]
        );
        assert_eq!(improvements.strategy, Some(SectionStrategy::Structural));
        assert_eq!(
            improvements.items.as_slice(),
            &["Replace unwrap with ?".to_string()]
        );
    }

    #[test]
    fn test_structural_stops_at_other_category() {
        let text = "## Strengths\n- a\n- b\n## Weaknesses\n- c\n";
        let out = section(text, Category::Strengths);
        assert_eq!(out.strategy, Some(SectionStrategy::Structural));
        assert_eq!(out.items.as_slice(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_improvements_stop_at_strengths_heading() {
        let text = "## Improvements\n- add tests\n## Strengths\n- fast\n";
        let out = section(text, Category::Improvements);
        assert_eq!(out.items.as_slice(), &["add tests".to_string()]);
    }

    #[test]
    fn test_structural_stops_at_terminator() {
        let text = "### Areas for Improvement\n- handle errors\n### Suggestions\n- rewrite in Rust\n";
        let out = section(text, Category::Improvements);
        assert_eq!(out.items.as_slice(), &["handle errors".to_string()]);
    }

    #[test]
    fn test_empty_section_falls_through() {
        let text = "## Strengths\n\n## Improvements\n- add docs\n\n- reuse buffers\n";
        let out = section(text, Category::Strengths);
        assert_eq!(out.strategy, Some(SectionStrategy::BulletLines));
        assert_eq!(
            out.items.as_slice(),
            &["add docs".to_string(), "reuse buffers".to_string()]
        );
    }

    #[test]
    fn test_signal_sentences_for_improvements() {
        let text = "The parser is compact. You should validate input! Consider caching results? It is fine.";
        let out = section(text, Category::Improvements);
        assert_eq!(out.strategy, Some(SectionStrategy::SignalSentences));
        assert_eq!(
            out.items.as_slice(),
            &[
                "You should validate input!".to_string(),
                "Consider caching results?".to_string()
            ]
        );
    }

    #[test]
    fn test_signal_sentence_without_terminator_ends_at_line() {
        let text = "Overall fine\n- It would be better to log errors\nThanks";
        let out = section(text, Category::Improvements);
        assert_eq!(
            out.items.as_slice(),
            &["It would be better to log errors".to_string()]
        );
    }

    #[test]
    fn test_signal_words_need_word_start() {
        let items = signal_sentences("The unsuggested path is bettered.");
        assert!(items.is_empty());
    }

    #[test]
    fn test_sentinel_when_nothing_found() {
        let out = section("Plain prose with nothing to list.", Category::Strengths);
        assert_eq!(out.strategy, None);
        assert_eq!(
            out.items.as_slice(),
            &["No specific strengths identified".to_string()]
        );
    }

    #[test]
    fn test_strategy_order_per_category() {
        assert_eq!(
            SectionStrategy::for_category(Category::Strengths),
            &[SectionStrategy::Structural, SectionStrategy::BulletLines]
        );
        assert_eq!(
            SectionStrategy::for_category(Category::Improvements),
            &[SectionStrategy::Structural, SectionStrategy::SignalSentences]
        );
    }
}

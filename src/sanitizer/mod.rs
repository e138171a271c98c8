//! Text cleaning for outbound prompts.
//! Stage order is fixed: validate → truncate → spam filter → personal-data
//! filter → control-char strip → whitespace normalization.

pub mod patterns;


use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maximum characters allowed in a prompt.
pub const MAX_PROMPT_LENGTH: usize = 4000;

#[derive(Error, Debug)]
pub enum SanitizerError {
    #[error("Invalid detection pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    SizeLimit,
    Spam,
    PersonalData,
    Error,
}

/// Cleaned text plus the advisory issues found along the way. At most one
/// message per category; repeated matches collapse into their category key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizationResult {
    pub text: String,
    pub issues: HashMap<IssueCategory, String>,
}

impl SanitizationResult {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn invalid_input() -> Self {
        let mut issues = HashMap::new();
        issues.insert(
            IssueCategory::Error,
            "Input must be a non-empty string".to_string(),
        );
        Self {
            text: String::new(),
            issues,
        }
    }
}

/// One redaction category: its compiled patterns, the token substituted for
/// matches, and the advisory recorded when any pattern fires.
struct RuleSet {
    rules: Vec<Regex>,
    token: &'static str,
    category: IssueCategory,
    message: &'static str,
}

impl RuleSet {
    fn compile(
        patterns: &[&str],
        token: &'static str,
        category: IssueCategory,
        message: &'static str,
    ) -> Result<Self, SanitizerError> {
        let rules = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| SanitizerError::InvalidPattern {
                    pattern: (*pattern).to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            token,
            category,
            message,
        })
    }

    /// Existence checks run against the original input; replacement runs
    /// against the working copy, which may already be truncated.
    fn apply(
        &self,
        original: &str,
        mut working: String,
        issues: &mut HashMap<IssueCategory, String>,
    ) -> String {
        let mut matched = false;
        for rule in &self.rules {
            if rule.is_match(original) {
                matched = true;
                working = rule.replace_all(&working, self.token).into_owned();
            }
        }

        if matched {
            issues.insert(self.category, self.message.to_string());
        }

        working
    }
}

pub struct Sanitizer {
    spam: RuleSet,
    personal_data: RuleSet,
    control_chars: Regex,
    blank_runs: Regex,
    newline_runs: Regex,
}

impl Sanitizer {
    /// Compiles the fixed rule tables. The tables are literals, so failure
    /// here means a broken build, not bad user input.
    pub fn new() -> Result<Self, SanitizerError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| SanitizerError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        };

        Ok(Self {
            spam: RuleSet::compile(
                patterns::SPAM_PATTERNS,
                patterns::SPAM_TOKEN,
                IssueCategory::Spam,
                "Potentially promotional content was filtered",
            )?,
            personal_data: RuleSet::compile(
                patterns::PERSONAL_DATA_PATTERNS,
                patterns::PERSONAL_DATA_TOKEN,
                IssueCategory::PersonalData,
                "Personal information was removed for your protection",
            )?,
            control_chars: compile(patterns::CONTROL_CHARS)?,
            blank_runs: compile(patterns::BLANK_RUNS)?,
            newline_runs: compile(patterns::NEWLINE_RUNS)?,
        })
    }

    /// Cleans `text` and reports what was altered.
    ///
    /// Never fails for well-formed input; the only refusal is the empty
    /// input, reported as an `error` issue with an empty result text.
    pub fn sanitize(&self, text: &str) -> SanitizationResult {
        if text.is_empty() {
            return SanitizationResult::invalid_input();
        }

        let mut issues = HashMap::new();

        let mut working: String = if text.chars().count() > MAX_PROMPT_LENGTH {
            issues.insert(
                IssueCategory::SizeLimit,
                format!("Prompt truncated to {} characters", MAX_PROMPT_LENGTH),
            );
            text.chars().take(MAX_PROMPT_LENGTH).collect()
        } else {
            text.to_string()
        };

        working = self.spam.apply(text, working, &mut issues);
        working = self.personal_data.apply(text, working, &mut issues);

        working = self.control_chars.replace_all(&working, "").into_owned();

        working = self.blank_runs.replace_all(&working, " ").into_owned();
        working = self.newline_runs.replace_all(&working, "\n\n").into_owned();

        debug!(
            original_length = text.len(),
            sanitized_length = working.len(),
            issue_count = issues.len(),
            "Sanitization completed"
        );

        SanitizationResult {
            text: working,
            issues,
        }
    }
}

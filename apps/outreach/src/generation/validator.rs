//! Output Validator: Promotes a `RawEmailRecord` to a `GeneratedEmail`.
//!
//! Missing or non-string `email_subject` / `email_body` is fatal.
//! A body outside the word range is only logged: a usable long email still ships.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::generation::parser::RawEmailRecord;
use crate::models::email::GeneratedEmail;

pub const SUBJECT_FIELD: &str = "email_subject";
pub const BODY_FIELD: &str = "email_body";

pub const DEFAULT_MIN_WORDS: usize = 150;
pub const DEFAULT_MAX_WORDS: usize = 250;

/// Inclusive acceptable word count for the email body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRange {
    pub min: usize,
    pub max: usize,
}

impl Default for WordRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WORDS,
            max: DEFAULT_MAX_WORDS,
        }
    }
}

impl WordRange {
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is not a string")]
    NonStringField(&'static str),
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Checks the required fields and emits the word-count advisory.
pub fn validate(
    record: &RawEmailRecord,
    words: WordRange,
    company_name: &str,
) -> Result<GeneratedEmail, ValidationError> {
    let email_subject = required_string(record, SUBJECT_FIELD)?;
    let email_body = required_string(record, BODY_FIELD)?;

    let count = word_count(&email_body);
    if !words.contains(count) {
        warn!(
            company = company_name,
            "Email body is {} words (target: {}-{})", count, words.min, words.max
        );
    }

    Ok(GeneratedEmail {
        email_subject,
        email_body,
    })
}

/// Boolean form of [`validate`]. `None` (no record at all) is invalid.
pub fn is_valid(record: Option<&RawEmailRecord>, words: WordRange, company_name: &str) -> bool {
    match record {
        Some(record) => match validate(record, words, company_name) {
            Ok(_) => true,
            Err(e) => {
                warn!(company = company_name, "Invalid email: {e}");
                false
            }
        },
        None => {
            warn!(company = company_name, "Invalid email format: no record");
            false
        }
    }
}

fn required_string(record: &RawEmailRecord, field: &'static str) -> Result<String, ValidationError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::NonStringField(field)),
        None => Err(ValidationError::MissingField(field)),
    }
}

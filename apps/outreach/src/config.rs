use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::generation::profile::DEFAULT_PROFILE_PATH;
use crate::generation::prompts::DEFAULT_SCRAPED_CONTENT_LIMIT;
use crate::generation::validator::{WordRange, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS};
use crate::llm_client::{self, DEFAULT_MODEL};
use crate::scraper;

/// Application configuration loaded from environment variables.
/// `OPENAI_API_KEY` is only required by the generate stage, so it stays optional here.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub advisor_profile_path: PathBuf,
    pub scraped_content_limit: usize,
    pub word_range: WordRange,
    pub scraper_base_url: String,
    pub jina_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses configuration from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let word_range = WordRange {
            min: parse_var(&lookup, "EMAIL_MIN_WORDS", DEFAULT_MIN_WORDS)?,
            max: parse_var(&lookup, "EMAIL_MAX_WORDS", DEFAULT_MAX_WORDS)?,
        };
        if word_range.min > word_range.max {
            bail!(
                "EMAIL_MIN_WORDS ({}) must not exceed EMAIL_MAX_WORDS ({})",
                word_range.min,
                word_range.max
            );
        }

        Ok(Config {
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_base_url: or_default("OPENAI_BASE_URL", llm_client::DEFAULT_BASE_URL),
            model: or_default("OUTREACH_MODEL", DEFAULT_MODEL),
            temperature: parse_var(&lookup, "OUTREACH_TEMPERATURE", 0.0f32)?,
            advisor_profile_path: PathBuf::from(or_default(
                "ADVISOR_PROFILE_PATH",
                DEFAULT_PROFILE_PATH,
            )),
            scraped_content_limit: parse_var(
                &lookup,
                "SCRAPED_CONTENT_LIMIT",
                DEFAULT_SCRAPED_CONTENT_LIMIT,
            )?,
            word_range,
            scraper_base_url: or_default("SCRAPER_BASE_URL", scraper::DEFAULT_BASE_URL),
            jina_api_key: optional("JINA_API_KEY"),
            http_timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS", 120u64)?,
            output_dir: PathBuf::from(or_default("OUTPUT_DIR", "output")),
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("Required environment variable 'OPENAI_API_KEY' is not set")
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

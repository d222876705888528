//! Website scraper: fetches raw page content through the Jina reader proxy.
//!
//! The proxy is called as `GET {base_url}/{website}`. Failures are not fatal
//! to the scrape stage: [`scrape_all`] logs them and leaves the company with
//! empty `scraped_content`, which the prompt renders as "Limited data available".

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::company::CompanyRecord;

pub const DEFAULT_BASE_URL: &str = "https://r.jina.ai";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scraping proxy returned status {status} for {website}")]
    Status { status: u16, website: String },
}

/// Client for the scraping proxy.
#[derive(Clone)]
pub struct ScraperClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ScraperClient {
    /// Creates a client with a custom proxy base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: Option<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetches the raw page content for one website.
    pub async fn fetch(&self, website: &str) -> Result<String, ScrapeError> {
        let mut request = self
            .client
            .get(format!("{}/{}", self.base_url, website.trim()))
            .header("X-Return-Format", "html")
            .header("X-Locale", "en-US");

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                website: website.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Scrapes every company in order and returns the records with content merged in.
pub async fn scrape_all(scraper: &ScraperClient, companies: &[CompanyRecord]) -> Vec<CompanyRecord> {
    let mut results = Vec::with_capacity(companies.len());

    for company in companies {
        info!("Scraping {}...", company.company_name);

        let content = match scraper.fetch(&company.website).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    company = %company.company_name,
                    website = %company.website,
                    "Scrape failed, continuing with empty content: {e}"
                );
                String::new()
            }
        };

        results.push(company.with_scraped_content(content));
    }

    results
}

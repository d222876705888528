//! Personalized M&A outreach: scrape company websites, then generate one
//! validated email per company with an LLM.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod scraper;

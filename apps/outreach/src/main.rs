use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use outreach::config::Config;
use outreach::dataset;
use outreach::generation::generator::{run_batch, BatchReport, GenerationContext, PipelineOutcome};
use outreach::generation::profile::AdvisorProfile;
use outreach::llm_client::LlmClient;
use outreach::scraper::{scrape_all, ScraperClient};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Parser)]
#[command(name = "outreach")]
#[command(about = "Scrape target companies and draft personalized M&A outreach emails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch each company's website through the scraping proxy and save a scraped CSV.
    Scrape {
        /// Seed CSV with company_name, website, industry, revenue.
        #[arg(long, default_value = "data/companies.csv")]
        input: PathBuf,
        /// Directory for the timestamped scraped CSV (default: OUTPUT_DIR).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Generate one email per company from a scraped CSV.
    Generate {
        /// Scraped CSV; defaults to the latest scraped_companies_*.csv in the output dir.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory searched for scraped CSVs when --input is absent (default: OUTPUT_DIR).
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Also write all outcomes to this JSON file.
        #[arg(long)]
        output: Option<PathBuf>,
        /// LLM model identifier (default: OUTREACH_MODEL).
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature (default: OUTREACH_TEMPERATURE).
        #[arg(long)]
        temperature: Option<f32>,
        /// Advisor profile text file (default: ADVISOR_PROFILE_PATH).
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (fails on malformed env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting outreach v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Scrape { input, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            scrape(&config, &input, &output_dir).await
        }
        Commands::Generate {
            input,
            output_dir,
            output,
            model,
            temperature,
            profile,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let input = match input {
                Some(input) => input,
                None => dataset::latest_scraped_file(&output_dir)?,
            };

            let profile_path = profile.unwrap_or_else(|| config.advisor_profile_path.clone());
            let profile = AdvisorProfile::load(&profile_path);
            if profile.is_fallback() {
                println!(
                    "Using generic advisor profile ({} unavailable)\n",
                    profile_path.display()
                );
            }

            let ctx = GenerationContext {
                profile,
                model: model.unwrap_or_else(|| config.model.clone()),
                temperature: temperature.unwrap_or(config.temperature),
                scraped_content_limit: config.scraped_content_limit,
                word_range: config.word_range,
            };

            generate(&config, &ctx, &input, output.as_deref()).await
        }
    }
}

async fn scrape(config: &Config, input: &Path, output_dir: &Path) -> Result<()> {
    let companies = dataset::load_companies(input)?;
    let scraper = ScraperClient::with_base_url(
        config.jina_api_key.clone(),
        config.http_timeout_secs,
        &config.scraper_base_url,
    )
    .context("Failed to build scraper HTTP client")?;

    let scraped = scrape_all(&scraper, &companies).await;

    match dataset::save_scraped(output_dir, &scraped)? {
        Some(path) => {
            println!("\nSuccessfully scraped {} companies!", scraped.len());
            println!("Results saved to: {}", path.display());
            println!("\nUse this file as input for `outreach generate`.");
        }
        None => println!("No companies to scrape in {}", input.display()),
    }

    Ok(())
}

async fn generate(
    config: &Config,
    ctx: &GenerationContext,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    println!("Loading scraped data from: {}\n", input.display());
    let companies = dataset::load_companies(input)?;

    let llm = LlmClient::with_base_url(
        config.require_openai_api_key()?.to_string(),
        config.http_timeout_secs,
        &config.openai_base_url,
    )
    .context("Failed to build LLM HTTP client")?;

    println!(
        "Generating emails for {} companies using {}...\n",
        companies.len(),
        ctx.model
    );

    let report = run_batch(&llm, ctx, &companies).await;
    print_report(&report);

    if let Some(path) = output {
        dataset::save_report_json(path, &report)?;
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    let rule = "=".repeat(RULE_WIDTH);

    for outcome in &report.outcomes {
        println!("\n{rule}");
        println!("EMAIL FOR: {}", outcome.company_name());
        println!("{rule}");

        match outcome {
            PipelineOutcome::Success { email, .. } => {
                println!("Subject: {}\n", email.email_subject);
                println!("{}\n", email.email_body);
            }
            PipelineOutcome::Failure { cause, .. } => {
                println!("Failed to generate email: {cause}\n");
            }
        }
    }

    println!("\n{rule}");
    println!(
        "Summary: {} successful, {} failed",
        report.succeeded(),
        report.failed()
    );
    println!("{rule}");
}

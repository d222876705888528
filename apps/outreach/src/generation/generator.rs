//! Email Generation: Orchestrates the per-company pipeline and the batch loop.
//!
//! Flow: build_prompt → LLM complete → parse_response → validate → GeneratedEmail.
//!
//! Every stage returns a `Result`; only `generate` and `run_batch` turn
//! failures into `None` / `PipelineOutcome::Failure`. One company's failure
//! never aborts the batch. Companies are processed strictly in input order.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::generation::parser::{parse_response, ParseError};
use crate::generation::profile::AdvisorProfile;
use crate::generation::prompts::{build_prompt, DEFAULT_SCRAPED_CONTENT_LIMIT, EMAIL_SYSTEM};
use crate::generation::validator::{validate, ValidationError, WordRange};
use crate::llm_client::{CompletionRequest, LlmCompleter, LlmError, DEFAULT_MODEL};
use crate::models::company::CompanyRecord;
use crate::models::email::GeneratedEmail;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Everything a generation run needs besides the LLM itself. Built once per run.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub profile: AdvisorProfile,
    pub model: String,
    pub temperature: f32,
    pub scraped_content_limit: usize,
    pub word_range: WordRange,
}

impl GenerationContext {
    pub fn new(profile: AdvisorProfile) -> Self {
        Self {
            profile,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            scraped_content_limit: DEFAULT_SCRAPED_CONTENT_LIMIT,
            word_range: WordRange::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to parse LLM response: {0}")]
    Parse(#[from] ParseError),

    #[error("generated email is invalid: {0}")]
    Validation(#[from] ValidationError),
}

/// Result for one company in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success {
        company_name: String,
        #[serde(flatten)]
        email: GeneratedEmail,
    },
    Failure {
        company_name: String,
        cause: String,
    },
}

impl PipelineOutcome {
    pub fn company_name(&self) -> &str {
        match self {
            PipelineOutcome::Success { company_name, .. }
            | PipelineOutcome::Failure { company_name, .. } => company_name,
        }
    }

    pub fn email(&self) -> Option<&GeneratedEmail> {
        match self {
            PipelineOutcome::Success { email, .. } => Some(email),
            PipelineOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }
}

/// Ordered outcomes of one batch, one per input company.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<PipelineOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline for one company, surfacing the failing stage.
pub async fn generate_email(
    llm: &dyn LlmCompleter,
    ctx: &GenerationContext,
    company: &CompanyRecord,
) -> Result<GeneratedEmail, GenerationError> {
    let prompt = build_prompt(
        company,
        &ctx.profile,
        ctx.scraped_content_limit,
        ctx.word_range,
    );

    let raw = llm
        .complete(CompletionRequest {
            prompt: &prompt,
            system: Some(EMAIL_SYSTEM),
            model: &ctx.model,
            temperature: ctx.temperature,
        })
        .await?;

    let record = parse_response(&raw)?;
    let email = validate(&record, ctx.word_range, &company.company_name)?;
    Ok(email)
}

/// Like [`generate_email`], but logs any failure with the company name and returns `None`.
pub async fn generate(
    llm: &dyn LlmCompleter,
    ctx: &GenerationContext,
    company: &CompanyRecord,
) -> Option<GeneratedEmail> {
    match generate_email(llm, ctx, company).await {
        Ok(email) => Some(email),
        Err(e) => {
            log_failure(company, &e);
            None
        }
    }
}

/// Generates an email for every company, sequentially and in input order.
pub async fn run_batch(
    llm: &dyn LlmCompleter,
    ctx: &GenerationContext,
    companies: &[CompanyRecord],
) -> BatchReport {
    info!(
        "Generating emails for {} companies using {}",
        companies.len(),
        ctx.model
    );

    let mut report = BatchReport::default();

    for company in companies {
        let outcome = match generate_email(llm, ctx, company).await {
            Ok(email) => {
                info!(company = %company.company_name, "Email generated");
                PipelineOutcome::Success {
                    company_name: company.company_name.clone(),
                    email,
                }
            }
            Err(e) => {
                log_failure(company, &e);
                PipelineOutcome::Failure {
                    company_name: company.company_name.clone(),
                    cause: e.to_string(),
                }
            }
        };
        report.outcomes.push(outcome);
    }

    info!(
        "Batch complete: {} successful, {} failed",
        report.succeeded(),
        report.failed()
    );

    report
}

fn log_failure(company: &CompanyRecord, err: &GenerationError) {
    match err {
        GenerationError::Parse(parse) => error!(
            company = %company.company_name,
            raw_response = parse.preview(),
            "Failed to parse JSON response"
        ),
        other => error!(
            company = %company.company_name,
            "Email generation failed: {other}"
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays canned responses in order and records every request it sees.
    struct ScriptedLlm {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<(String, Option<String>, String, f32)>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmCompleter for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push((
                request.prompt.to_string(),
                request.system.map(str::to_string),
                request.model.to_string(),
                request.temperature,
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn company(name: &str) -> CompanyRecord {
        CompanyRecord {
            company_name: name.to_string(),
            website: format!("{}.com", name.to_lowercase().replace(' ', "")),
            industry: "Industrial".to_string(),
            revenue: "$10M".to_string(),
            scraped_content: "Acme launched a new HEPA line in March.".to_string(),
        }
    }

    fn ctx() -> GenerationContext {
        GenerationContext::new(AdvisorProfile::from_text("Closed 40 industrial deals."))
    }

    fn body(words: usize) -> String {
        let mut text = String::from("Your new HEPA line caught my attention.");
        for _ in 7..words {
            text.push_str(" word");
        }
        text
    }

    fn email_json(subject: &str, words: usize) -> String {
        serde_json::json!({"email_subject": subject, "email_body": body(words)}).to_string()
    }

    #[tokio::test]
    async fn test_acme_scenario_parses_fenced_response() {
        let raw = format!(
            "```json\n{} \n```",
            email_json("A quick question about Acme's HEPA launch", 180)
        );
        let llm = ScriptedLlm::new(vec![Ok(raw)]);

        let email = generate(&llm, &ctx(), &company("Acme Filters"))
            .await
            .expect("email should be generated");

        assert_eq!(email.email_subject, "A quick question about Acme's HEPA launch");
        assert_eq!(crate::generation::validator::word_count(&email.email_body), 180);
        assert!(email.email_body.contains("HEPA line"));
    }

    #[tokio::test]
    async fn test_request_carries_system_model_and_temperature() {
        let llm = ScriptedLlm::new(vec![Ok(email_json("s", 180))]);
        let mut ctx = ctx();
        ctx.model = "gpt-4o-mini".to_string();
        ctx.temperature = 0.3;

        generate(&llm, &ctx, &company("Acme Filters")).await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        let (prompt, system, model, temperature) = &prompts[0];
        assert!(prompt.contains("Acme Filters"));
        assert!(prompt.contains("Closed 40 industrial deals."));
        assert_eq!(system.as_deref(), Some(EMAIL_SYSTEM));
        assert_eq!(model, "gpt-4o-mini");
        assert!((temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_refusal_yields_none() {
        let llm = ScriptedLlm::new(vec![Ok("Sorry, I can't help with that.".to_string())]);
        assert!(generate(&llm, &ctx(), &company("Acme Filters")).await.is_none());
    }

    #[tokio::test]
    async fn test_refusal_surfaces_parse_error() {
        let llm = ScriptedLlm::new(vec![Ok("Sorry, I can't help with that.".to_string())]);
        let err = generate_email(&llm, &ctx(), &company("Acme Filters"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_field_surfaces_validation_error() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{"email_subject": "s"}"#.to_string())]);
        let err = generate_email(&llm, &ctx(), &company("Acme Filters"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Validation(ValidationError::MissingField("email_body"))
        ));
    }

    #[tokio::test]
    async fn test_overlong_body_still_succeeds() {
        let llm = ScriptedLlm::new(vec![Ok(email_json("s", 300))]);
        assert!(generate(&llm, &ctx(), &company("Acme Filters")).await.is_some());
    }

    #[tokio::test]
    async fn test_batch_isolates_llm_failure() {
        let llm = ScriptedLlm::new(vec![
            Ok(email_json("first", 180)),
            Err(LlmError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
            Ok(email_json("third", 200)),
        ]);
        let companies = vec![company("Alpha"), company("Beta"), company("Gamma")];

        let report = run_batch(&llm, &ctx(), &companies).await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.company_name()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);

        assert!(report.outcomes[0].is_success());
        assert_eq!(report.outcomes[0].email().unwrap().email_subject, "first");
        match &report.outcomes[1] {
            PipelineOutcome::Failure { cause, .. } => assert!(cause.contains("upstream exploded")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(report.outcomes[2].email().unwrap().email_subject, "third");
    }

    #[tokio::test]
    async fn test_batch_records_parse_failure() {
        let llm = ScriptedLlm::new(vec![
            Ok("Sorry, I can't help with that.".to_string()),
            Ok(email_json("ok", 160)),
        ]);
        let report = run_batch(&llm, &ctx(), &[company("Alpha"), company("Beta")]).await;

        assert_eq!(report.failed(), 1);
        assert!(!report.outcomes[0].is_success());
        assert!(report.outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let llm = ScriptedLlm::new(vec![]);
        let report = run_batch(&llm, &ctx(), &[]).await;
        assert_eq!(report.total(), 0);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let success = PipelineOutcome::Success {
            company_name: "Acme".to_string(),
            email: GeneratedEmail {
                email_subject: "s".to_string(),
                email_body: "b".to_string(),
            },
        };
        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["email_subject"], "s");

        let failure = PipelineOutcome::Failure {
            company_name: "Acme".to_string(),
            cause: "boom".to_string(),
        };
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["cause"], "boom");
    }
}

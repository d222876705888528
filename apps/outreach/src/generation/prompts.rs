// All LLM prompt constants for outreach email generation, plus the renderer.

use crate::generation::profile::AdvisorProfile;
use crate::generation::validator::WordRange;
use crate::models::company::CompanyRecord;

/// Max characters of scraped content embedded in a prompt (token budget).
pub const DEFAULT_SCRAPED_CONTENT_LIMIT: usize = 1500;

/// Substituted when a company has no scraped content.
pub const LIMITED_DATA_MARKER: &str = "Limited data available";

/// System prompt for email generation. Enforces JSON-only output.
pub const EMAIL_SYSTEM: &str = "You are an expert M&A advisor assistant. \
    Your emails are known for being highly personalized, consultative, \
    and demonstrating thorough research. \
    Always return valid JSON with email_subject and email_body fields.";

/// Email generation prompt template.
/// Placeholders: {advisor_profile}, {company_name}, {industry}, {revenue},
///               {website}, {company_intelligence}, {min_words}, {max_words}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"You are an expert M&A advisor assistant drafting a personalized outreach email to a business owner.

## Context

**Advisor Profile:**
{advisor_profile}

**Target Company (from web scraping):**
- Company Name: {company_name}
- Industry: {industry}
- Revenue: {revenue}
- Website: {website}
- Company Intelligence: {company_intelligence}

## Your Task

Create a highly personalized email that:

### Content Structure
1. **Opening Hook**: Reference something specific from the scraped content (recent news, product launches, company achievements, or shared location). Be concrete, not generic.

2. **Value Proposition**: Connect the advisor's specific deal experience to this company's industry ({industry}). Mention relevant buyer interest (e.g., "strategic buyers focused on {industry} businesses").

3. **Call-to-Action**: Professional request for a 15-minute exploratory conversation.

### Strict Requirements
- **Length**: {min_words}-{max_words} words for email body (count carefully)
- **Tone**: Professional and consultative, not salesy
- **Company Name**: Use brand name as they'd refer to themselves, not legal entity name
- **Recipient**: Address as "[Company Owner]"
- **Formatting**: Production-ready, proper paragraphs, no signature block
- **Language**: Industry-standard terminology, accessible to non-experts

### Critical Rules
- DO NOT include sender signature or contact details
- DO NOT be generic; every sentence must reflect this specific company
- DO NOT exceed word count
- Use insights from scraped content to demonstrate research

## Output Format

Return ONLY valid JSON (no markdown, no extra text) with exactly these two keys:

{
  "email_subject": "Engaging subject under 60 characters",
  "email_body": "Complete email body text"
}
"#;

/// Returns at most `limit` characters from the start of `content`.
pub fn truncate_chars(content: &str, limit: usize) -> &str {
    match content.char_indices().nth(limit) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Renders the email prompt for one company. Pure: identical inputs give identical output.
pub fn build_prompt(
    company: &CompanyRecord,
    profile: &AdvisorProfile,
    scraped_content_limit: usize,
    words: WordRange,
) -> String {
    let snippet = truncate_chars(&company.scraped_content, scraped_content_limit);
    let intelligence = if snippet.is_empty() {
        LIMITED_DATA_MARKER
    } else {
        snippet
    };
    let min_words = words.min.to_string();
    let max_words = words.max.to_string();

    render_template(
        EMAIL_PROMPT_TEMPLATE,
        &[
            ("advisor_profile", profile.as_str()),
            ("company_name", company.company_name.as_str()),
            ("industry", company.industry.as_str()),
            ("revenue", company.revenue.as_str()),
            ("website", company.website.as_str()),
            ("company_intelligence", intelligence),
            ("min_words", min_words.as_str()),
            ("max_words", max_words.as_str()),
        ],
    )
}

/// Single-pass `{name}` substitution. Unknown names and bare braces are copied
/// through, and substituted values are never rescanned.
fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 2048);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

// Outreach email generation: profile → prompt → LLM → parse → validate.
// All LLM calls go through llm_client, never to the provider directly.

pub mod generator;
pub mod parser;
pub mod profile;
pub mod prompts;
pub mod validator;

use serde::{Deserialize, Serialize};

/// A validated outreach email. Only produced by `generation::validator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    /// Advisory target: under 60 characters. Not enforced.
    pub email_subject: String,
    pub email_body: String,
}

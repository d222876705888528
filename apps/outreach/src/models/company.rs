use serde::{Deserialize, Serialize};

/// One outreach target, as read from the seed or scraped CSV.
///
/// `industry`, `revenue` and `scraped_content` default to empty when the
/// column is absent. `company_name` and `website` are required columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_name: String,
    pub website: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub revenue: String,
    #[serde(default)]
    pub scraped_content: String,
}

impl CompanyRecord {
    /// Returns a copy of this record carrying freshly scraped page text.
    pub fn with_scraped_content(&self, scraped_content: String) -> Self {
        Self {
            scraped_content,
            ..self.clone()
        }
    }
}

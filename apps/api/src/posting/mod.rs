// Posting ingestion: fetch a job posting, reduce it to text, name its organization.
// Failures here degrade into content; nothing in this module aborts a request
// except a message without a URL.

pub mod fetcher;
pub mod organization;
pub mod prompts;
pub mod request;

use serde::Serialize;

pub use fetcher::SourceFetcher;
pub use organization::{extract_organization, OrganizationName};
pub use request::ApplicationRequest;

/// Plain-text extract of a job posting. Never empty: a failed fetch carries
/// a readable error message as its text.
#[derive(Debug, Clone, Serialize)]
pub struct PostingText {
    pub source_url: String,
    pub text: String,
    pub fetch_failed: bool,
}

impl PostingText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Appends the candidate's own notes from the request message.
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        let instructions = instructions.trim();
        if !instructions.is_empty() {
            self.text
                .push_str(&format!("\n\nADDITIONAL NOTES FROM THE CANDIDATE:\n{instructions}"));
        }
        self
    }
}

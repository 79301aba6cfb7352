//! Splits a free-text request message into the posting URL and the candidate's notes.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;

/// Body of `POST /api/v1/applications`.
#[derive(Debug, Deserialize)]
pub struct ApplicationMessage {
    pub message: String,
}

/// A parsed request: exactly one posting URL plus optional instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRequest {
    pub posting_url: String,
    pub instructions: String,
}

impl ApplicationRequest {
    /// The first `http(s)://` URL wins; everything else in the message,
    /// including further URLs, is kept as instructions.
    pub fn from_message(message: &str) -> Result<Self, AppError> {
        static URL: OnceLock<Regex> = OnceLock::new();
        let url_pattern = URL.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("valid regex"));

        let mut urls = url_pattern.find_iter(message);
        let first = urls.next().ok_or_else(|| {
            AppError::Validation(
                "No URL found. Please include the URL of the job posting, \
                e.g. https://www.linkedin.com/jobs/view/123456"
                    .to_string(),
            )
        })?;
        if urls.next().is_some() {
            warn!("Message contains several URLs; using the first: {}", first.as_str());
        }

        let instructions = format!("{}{}", &message[..first.start()], &message[first.end()..]);

        Ok(Self {
            posting_url: first.as_str().to_string(),
            instructions: instructions.trim().to_string(),
        })
    }
}

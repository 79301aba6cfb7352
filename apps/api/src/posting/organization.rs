//! Entity Extractor: names the hiring organization for use in output file names.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::{truncate_chars, Completion, CompletionRequest};
use crate::posting::prompts::{
    ORGANIZATION_INPUT_CHARS, ORGANIZATION_MAX_TOKENS, ORGANIZATION_PROMPT_TEMPLATE,
};

/// Used when the model gives nothing usable.
pub const UNKNOWN_ORGANIZATION: &str = "Unknown";

const MAX_NAME_CHARS: usize = 64;

/// Filesystem-safe organization token: word characters, `_` and `-` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Sanitizes a raw model answer into a path-safe name.
    pub fn sanitize(raw: &str) -> Self {
        static DISALLOWED: OnceLock<Regex> = OnceLock::new();
        static WHITESPACE: OnceLock<Regex> = OnceLock::new();
        let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
        let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

        // Models sometimes add a remark on a second line; the name comes first.
        let first_line = raw.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
        let cleaned = disallowed.replace_all(first_line, "");
        let joined = whitespace.replace_all(cleaned.trim(), "_");
        let name = truncate_chars(&joined, MAX_NAME_CHARS).trim_end_matches('_');

        if name.is_empty() {
            Self::unknown()
        } else {
            Self(name.to_string())
        }
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_ORGANIZATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form: underscores shown as spaces.
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for OrganizationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asks the fast model for the organization name. Falls back to `Unknown`.
pub async fn extract_organization(
    llm: &dyn Completion,
    model: &str,
    posting_text: &str,
) -> OrganizationName {
    let prompt = ORGANIZATION_PROMPT_TEMPLATE.replace(
        "{posting}",
        truncate_chars(posting_text, ORGANIZATION_INPUT_CHARS),
    );
    let request = CompletionRequest {
        model: model.to_string(),
        max_tokens: ORGANIZATION_MAX_TOKENS,
        system: None,
        prompt,
    };

    match llm.complete(request).await {
        Ok(raw) => {
            let name = OrganizationName::sanitize(&raw);
            info!("Organization extracted: {}", name);
            name
        }
        Err(e) => {
            warn!("Organization extraction failed, using fallback name: {e}");
            OrganizationName::unknown()
        }
    }
}

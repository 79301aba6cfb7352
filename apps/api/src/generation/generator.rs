//! Document generation: one smart-tier completion per document.
//!
//! The match report is not an input here. A weak match still yields complete
//! documents; gaps are surfaced to the user separately.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::generation::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, GENERATION_MAX_TOKENS, RESUME_PROMPT_TEMPLATE,
};
use crate::generation::rules::ResumeRules;
use crate::llm_client::prompts::{
    coach_system_prompt, fill_template, usp_or_default, RAW_LATEX_ONLY, UNCONDITIONAL_GENERATION,
};
use crate::llm_client::{strip_code_fences, Completion, CompletionRequest, LlmError};
use crate::posting::OrganizationName;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    /// Leading component of every output file name.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Resume => "Resume",
            Self::CoverLetter => "CoverLetter",
        }
    }

    /// Template looked up in the profile directory.
    pub fn template_file(self) -> &'static str {
        match self {
            Self::Resume => "cv_template.tex",
            Self::CoverLetter => "cover_letter_template.tex",
        }
    }

    /// `{Kind}_{Organization}` plus `_{n}` when a suffix is needed to avoid overwriting.
    pub fn file_stem(self, organization: &OrganizationName, suffix: Option<u32>) -> String {
        match suffix {
            Some(n) => format!("{}_{}_{}", self.file_prefix(), organization, n),
            None => format!("{}_{}", self.file_prefix(), organization),
        }
    }
}

/// Generated LaTeX for one document, used verbatim by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSource {
    pub kind: DocumentKind,
    pub markup: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_resume(
    llm: &dyn Completion,
    config: &Config,
    profile_corpus: &str,
    posting_text: &str,
    cv_template: &str,
) -> Result<DocumentSource, LlmError> {
    let prompt = build_resume_prompt(&config.resume_rules, profile_corpus, posting_text, cv_template);
    generate(llm, config, DocumentKind::Resume, prompt).await
}

pub async fn generate_cover_letter(
    llm: &dyn Completion,
    config: &Config,
    profile_corpus: &str,
    posting_text: &str,
    cl_template: &str,
) -> Result<DocumentSource, LlmError> {
    let prompt = build_cover_letter_prompt(config, profile_corpus, posting_text, cl_template);
    generate(llm, config, DocumentKind::CoverLetter, prompt).await
}

async fn generate(
    llm: &dyn Completion,
    config: &Config,
    kind: DocumentKind,
    prompt: String,
) -> Result<DocumentSource, LlmError> {
    info!("Generating {:?} with {}", kind, config.models.smart);

    let raw = llm
        .complete(CompletionRequest {
            model: config.models.smart.clone(),
            max_tokens: GENERATION_MAX_TOKENS,
            system: Some(coach_system_prompt(&config.candidate)),
            prompt,
        })
        .await?;

    let markup = strip_code_fences(&raw);
    if markup.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    if !markup.starts_with("\\documentclass") {
        warn!("{:?} source does not start with \\documentclass; compiling as-is", kind);
    }

    Ok(DocumentSource {
        kind,
        markup: markup.to_string(),
    })
}

/// Résumé payload: posting, full profile, template and the invariant rules.
pub fn build_resume_prompt(
    rules: &ResumeRules,
    profile_corpus: &str,
    posting_text: &str,
    cv_template: &str,
) -> String {
    fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("posting", posting_text),
            ("profile", profile_corpus),
            ("template", cv_template),
            ("rules", &rules.render()),
            ("unconditional", UNCONDITIONAL_GENERATION),
            ("raw_only", RAW_LATEX_ONLY),
        ],
    )
}

/// Cover-letter payload: posting, full profile, template as a style reference.
pub fn build_cover_letter_prompt(
    config: &Config,
    profile_corpus: &str,
    posting_text: &str,
    cl_template: &str,
) -> String {
    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("posting", posting_text),
            ("profile", profile_corpus),
            ("template", cl_template),
            ("usp", usp_or_default(&config.candidate)),
            ("unconditional", UNCONDITIONAL_GENERATION),
            ("raw_only", RAW_LATEX_ONLY),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

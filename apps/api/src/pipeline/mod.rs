// Application pipeline: one request end to end.
// fetch → organization → profile → score → generate → persist → compile.
// Only a missing URL or an unwritable output directory aborts a request;
// every other stage degrades and the request continues.

pub mod handlers;

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::{generate_cover_letter, generate_resume, DocumentKind, DocumentSource};
use crate::llm_client::LlmError;
use crate::posting::{extract_organization, ApplicationRequest, OrganizationName};
use crate::scoring::{format_closing_summary, format_match_report, score_match, MatchReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApplicationOutcome {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub posting_url: String,
    /// True when the posting could not be fetched and its error text was used instead.
    pub fetch_failed: bool,
    pub organization: OrganizationName,
    pub match_report: MatchReport,
    pub match_summary: String,
    pub documents: Vec<DocumentOutcome>,
    pub closing_summary: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentOutcome {
    pub kind: DocumentKind,
    pub source_file: String,
    /// `None` when generation or compilation failed.
    pub artifact_file: Option<String>,
    pub error: Option<String>,
}

/// Generated markup for one document, or the reason it is missing.
struct Draft {
    kind: DocumentKind,
    markup: String,
    error: Option<String>,
}

impl Draft {
    fn from_result(kind: DocumentKind, result: Result<DocumentSource, LlmError>) -> Self {
        match result {
            Ok(source) => Self {
                kind,
                markup: source.markup,
                error: None,
            },
            Err(e) => {
                warn!("{:?} generation failed: {}", kind, e);
                Self {
                    kind,
                    markup: String::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_application(
    state: &AppState,
    request: ApplicationRequest,
) -> Result<ApplicationOutcome, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("application", %request_id);
    run_stages(state, request, request_id).instrument(span).await
}

async fn run_stages(
    state: &AppState,
    request: ApplicationRequest,
    request_id: Uuid,
) -> Result<ApplicationOutcome, AppError> {
    let config = &state.config;
    let llm = state.llm.as_ref();

    let posting = state
        .fetcher
        .fetch(&request.posting_url)
        .await
        .with_instructions(&request.instructions);

    let organization = extract_organization(llm, &config.models.fast, posting.as_str()).await;

    let profile = state.profile.load_profile().await;
    if profile.is_empty() {
        warn!(
            "No profile documents found in {}",
            state.profile.directory().display()
        );
    }
    let cv_template = state
        .profile
        .load_template(DocumentKind::Resume.template_file())
        .await;
    let cl_template = state
        .profile
        .load_template(DocumentKind::CoverLetter.template_file())
        .await;

    let match_report = score_match(llm, config, profile.as_str(), posting.as_str()).await;
    let match_summary = format_match_report(&match_report);

    let drafts = [
        Draft::from_result(
            DocumentKind::Resume,
            generate_resume(llm, config, profile.as_str(), posting.as_str(), &cv_template).await,
        ),
        Draft::from_result(
            DocumentKind::CoverLetter,
            generate_cover_letter(llm, config, profile.as_str(), posting.as_str(), &cl_template)
                .await,
        ),
    ];

    let output_dir = state.compiler.output_dir();
    let suffix = reserve_stems(output_dir, &organization).await?;
    let [resume, cover_letter] = &drafts;
    let resume_stem = resume.kind.file_stem(&organization, suffix);
    let cover_letter_stem = cover_letter.kind.file_stem(&organization, suffix);

    for (draft, stem) in [(resume, &resume_stem), (cover_letter, &cover_letter_stem)] {
        let path = output_dir.join(format!("{stem}.tex"));
        tokio::fs::write(&path, &draft.markup)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let (resume_pdf, cover_letter_pdf) = tokio::join!(
        compile_draft(state, resume, &resume_stem),
        compile_draft(state, cover_letter, &cover_letter_stem),
    );

    let documents = vec![
        document_outcome(resume, &resume_stem, resume_pdf),
        document_outcome(cover_letter, &cover_letter_stem, cover_letter_pdf),
    ];

    let file_names: Vec<String> = documents
        .iter()
        .map(|d| d.artifact_file.clone().unwrap_or_else(|| d.source_file.clone()))
        .collect();
    let closing_summary = format_closing_summary(&organization, &match_report, &file_names);

    info!(
        "Application for {} finished: {} of 2 documents compiled",
        organization,
        documents.iter().filter(|d| d.artifact_file.is_some()).count()
    );

    Ok(ApplicationOutcome {
        request_id,
        generated_at: Utc::now(),
        posting_url: posting.source_url,
        fetch_failed: posting.fetch_failed,
        organization,
        match_report,
        match_summary,
        documents,
        closing_summary,
    })
}

async fn compile_draft(state: &AppState, draft: &Draft, stem: &str) -> Option<String> {
    if draft.markup.is_empty() {
        return None;
    }
    let pdf_name = format!("{stem}.pdf");
    state
        .compiler
        .compile(&draft.markup, &pdf_name)
        .await
        .map(|_| pdf_name)
}

fn document_outcome(draft: &Draft, stem: &str, artifact_file: Option<String>) -> DocumentOutcome {
    DocumentOutcome {
        kind: draft.kind,
        source_file: format!("{stem}.tex"),
        error: draft
            .error
            .clone()
            .or_else(|| artifact_file.is_none().then(|| "Compilation failed".to_string())),
        artifact_file,
    }
}

/// Claims `{Kind}_{Org}` for both documents, or the first free `_2`, `_3`, … suffix.
///
/// A stem is taken once its `.tex` source exists; creation with `create_new`
/// makes the claim atomic across concurrent requests.
async fn reserve_stems(
    output_dir: &Path,
    organization: &OrganizationName,
) -> Result<Option<u32>, AppError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    for n in 1u32.. {
        let suffix = (n > 1).then_some(n);
        let resume = output_dir.join(format!(
            "{}.tex",
            DocumentKind::Resume.file_stem(organization, suffix)
        ));
        let cover_letter = output_dir.join(format!(
            "{}.tex",
            DocumentKind::CoverLetter.file_stem(organization, suffix)
        ));

        if !claim(&resume).await? {
            continue;
        }
        if claim(&cover_letter).await? {
            if suffix.is_some() {
                info!("Output names for {} taken, using suffix _{}", organization, n);
            }
            return Ok(suffix);
        }
        // Résumé name was free but the cover letter's was not; release and move on.
        release(&resume).await;
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "No free output name for {organization}"
    )))
}

/// Gives back a claimed name. A failure leaves the empty source in place, which
/// keeps that stem reserved until someone removes it.
async fn release(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Could not release reserved name {}: {}", path.display(), e);
    }
}

/// Creates `path` if absent. `Ok(false)` when it already exists.
async fn claim(path: &Path) -> Result<bool, AppError> {
    match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(AppError::Internal(
            anyhow::Error::new(e).context(format!("Failed to create {}", path.display())),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

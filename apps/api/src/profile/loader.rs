//! Profile corpus construction from a directory of PDFs and text files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

/// Everything known about the candidate, one tagged chunk per page or file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileCorpus {
    pub text: String,
    pub sources: Vec<String>,
}

impl ProfileCorpus {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push_chunk(&mut self, file_name: &str, content: &str) {
        self.text.push_str(&format!("\n\n[From {file_name}]:\n{content}"));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileLoader {
    directory: PathBuf,
}

impl ProfileLoader {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Loads every recognized document, in file-name order.
    pub async fn load_profile(&self) -> ProfileCorpus {
        let mut corpus = ProfileCorpus::default();

        let files = match self.list_documents().await {
            Ok(files) => files,
            Err(e) => {
                warn!("Profile directory unavailable, continuing with empty profile: {e:#}");
                return corpus;
            }
        };

        for (path, format) in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let chunks = match format {
                DocumentFormat::Pdf => extract_pdf_pages(&path).await,
                DocumentFormat::PlainText => fs::read_to_string(&path)
                    .await
                    .map(|text| vec![text])
                    .with_context(|| format!("Failed to read {}", path.display())),
            };

            match chunks {
                Ok(chunks) => {
                    for chunk in &chunks {
                        corpus.push_chunk(&file_name, chunk);
                    }
                    corpus.sources.push(file_name);
                }
                Err(e) => warn!("Skipping profile document {}: {e:#}", file_name),
            }
        }

        info!(
            "Profile corpus loaded: {} documents, {} characters",
            corpus.sources.len(),
            corpus.text.chars().count()
        );
        corpus
    }

    /// Reads a template from the profile directory. Missing templates are empty.
    pub async fn load_template(&self, name: &str) -> String {
        let path = self.directory.join(name);
        match fs::read_to_string(&path).await {
            Ok(template) => template,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Template {} not found; generating without it", name);
                String::new()
            }
            Err(e) => {
                warn!("Template {} unreadable; generating without it: {e}", name);
                String::new()
            }
        }
    }

    async fn list_documents(&self) -> Result<Vec<(PathBuf, DocumentFormat)>> {
        let mut entries = fs::read_dir(&self.directory)
            .await
            .with_context(|| format!("Failed to read directory: {}", self.directory.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(format) = DocumentFormat::detect(&path) {
                files.push((path, format));
            }
        }

        files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
        Ok(files)
    }
}

/// Page-by-page PDF text. Extraction is CPU-bound and may panic on hostile
/// input, so it runs on the blocking pool.
async fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .await
        .context("PDF extraction aborted")?
        .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {e}"))
}

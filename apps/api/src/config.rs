use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::rules::ResumeRules;

const DEFAULT_FAST_MODEL: &str = "claude-haiku-4-5";
const DEFAULT_SMART_MODEL: &str = "claude-sonnet-4-5";

/// Application configuration loaded from environment variables.
/// Built once at startup; components receive the parts they need.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub profile_dir: PathBuf,
    pub output_dir: PathBuf,
    pub models: ModelTiers,
    pub latex_command: Vec<String>,
    pub fetch_timeout: Duration,
    pub candidate: CandidatePersona,
    pub resume_rules: ResumeRules,
    pub port: u16,
    pub rust_log: String,
}

/// Fast tier for extraction and scoring, smart tier for document generation.
#[derive(Debug, Clone)]
pub struct ModelTiers {
    pub fast: String,
    pub smart: String,
}

/// Who the documents are written for. Feeds the coaching system prompt.
#[derive(Debug, Clone)]
pub struct CandidatePersona {
    pub name: String,
    pub headline: String,
    pub usp: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let latex_command = split_command(&optional_env("LATEX_COMMAND", "pdflatex"));
        if latex_command.is_empty() {
            anyhow::bail!("LATEX_COMMAND must name a program");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            profile_dir: PathBuf::from(optional_env("PROFILE_DIR", "docs")),
            output_dir: PathBuf::from(optional_env("OUTPUT_DIR", "outputs")),
            models: ModelTiers {
                fast: optional_env("LLM_MODEL_FAST", DEFAULT_FAST_MODEL),
                smart: optional_env("LLM_MODEL_SMART", DEFAULT_SMART_MODEL),
            },
            latex_command,
            fetch_timeout: Duration::from_secs(
                optional_env("FETCH_TIMEOUT_SECS", "10")
                    .parse::<u64>()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            candidate: CandidatePersona {
                name: optional_env("CANDIDATE_NAME", "the candidate"),
                headline: optional_env("CANDIDATE_HEADLINE", ""),
                usp: optional_env("CANDIDATE_USP", ""),
            },
            resume_rules: match std::env::var("RESUME_PINNED_SECTIONS") {
                Ok(sections) => ResumeRules::default().with_pinned_sections(&sections),
                Err(_) => ResumeRules::default(),
            }
            .with_column_spec(std::env::var("RESUME_COLUMN_SPEC").ok()),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a command line such as `lualatex --shell-escape` into program and arguments.
fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
impl Config {
    /// Configuration rooted in temporary directories, with a fake credential.
    pub fn for_tests(profile_dir: PathBuf, output_dir: PathBuf) -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            profile_dir,
            output_dir,
            models: ModelTiers {
                fast: "fast-model".to_string(),
                smart: "smart-model".to_string(),
            },
            latex_command: vec!["pdflatex".to_string()],
            fetch_timeout: Duration::from_secs(5),
            candidate: CandidatePersona {
                name: "Alex Example".to_string(),
                headline: "Analytics Manager at Example GmbH (2019-2025)".to_string(),
                usp: "Turns complex analyses into clear decisions".to_string(),
            },
            resume_rules: ResumeRules::default(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_keeps_leading_args() {
        assert_eq!(
            split_command("lualatex  --shell-escape"),
            vec!["lualatex".to_string(), "--shell-escape".to_string()]
        );
    }

    #[test]
    fn test_split_command_empty() {
        assert!(split_command("   ").is_empty());
    }
}

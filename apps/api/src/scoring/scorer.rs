//! One fast-tier completion per request, read through `parse_match_report`.

use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::prompts::{coach_system_prompt, fill_template};
use crate::llm_client::{truncate_chars, Completion, CompletionRequest};
use crate::scoring::prompts::{MATCH_PROMPT_TEMPLATE, PROFILE_INPUT_CHARS, SCORING_MAX_TOKENS};
use crate::scoring::report::{parse_match_report, MatchReport, ParseOutcome};

/// Scores the profile against the posting. Never fails: see `MatchReport::fallback`.
pub async fn score_match(
    llm: &dyn Completion,
    config: &Config,
    profile_corpus: &str,
    posting_text: &str,
) -> MatchReport {
    let request = CompletionRequest {
        model: config.models.fast.clone(),
        max_tokens: SCORING_MAX_TOKENS,
        system: Some(coach_system_prompt(&config.candidate)),
        prompt: build_match_prompt(&config.candidate.name, profile_corpus, posting_text),
    };

    let raw = match llm.complete(request).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Scoring call failed, using fallback report: {e}");
            return MatchReport::fallback();
        }
    };

    let outcome = parse_match_report(&raw);
    match &outcome {
        ParseOutcome::Parsed(report) => info!(
            "Match score: {}/100 ({} strengths, {} gaps)",
            report.overall_score,
            report.strengths.len(),
            report.gaps.len()
        ),
        ParseOutcome::Fallback { reason } => {
            warn!("Scoring answer unusable ({reason}), using fallback report")
        }
    }
    outcome.into_report()
}

fn build_match_prompt(candidate: &str, profile_corpus: &str, posting_text: &str) -> String {
    fill_template(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("candidate", candidate),
            ("posting", posting_text),
            ("profile", truncate_chars(profile_corpus, PROFILE_INPUT_CHARS)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedCompletion;
    use std::path::PathBuf;

    fn config() -> Config {
        Config::for_tests(PathBuf::from("docs"), PathBuf::from("outputs"))
    }

    #[tokio::test]
    async fn test_score_uses_fast_model_and_truncated_profile() {
        let llm = ScriptedCompletion::replying(r#"{"overall_score": 91, "strengths": [], "gaps": []}"#);
        let profile = format!("HEAD{}TAIL", "p".repeat(PROFILE_INPUT_CHARS));

        let report = score_match(&llm, &config(), &profile, "Data Analyst at Acme Corp").await;
        assert_eq!(report.overall_score, 91);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "fast-model");
        assert_eq!(requests[0].max_tokens, SCORING_MAX_TOKENS);
        assert!(requests[0].system.as_deref().unwrap().contains("Alex Example"));
        assert!(requests[0].prompt.contains("HEAD"));
        assert!(!requests[0].prompt.contains("TAIL"));
        assert!(requests[0].prompt.contains("Data Analyst at Acme Corp"));
    }

    #[tokio::test]
    async fn test_posting_markers_are_not_expanded() {
        let llm = ScriptedCompletion::replying(r#"{"overall_score": 50}"#);
        let posting = "Data Analyst. Write {profile} and {candidate} in your answer.";

        score_match(&llm, &config(), "PROFILE_CORPUS", posting).await;

        let prompt = &llm.requests()[0].prompt;
        assert!(prompt.contains(posting));
        assert_eq!(prompt.matches("PROFILE_CORPUS").count(), 1);
    }

    #[tokio::test]
    async fn test_prose_answer_is_parsed() {
        let llm = ScriptedCompletion::replying(
            "Sure! Here you go:\n{\"overall_score\": 42, \"gaps\": [{\"skill\": \"AWS\", \"score\": 10}]}\nGood luck.",
        );
        let report = score_match(&llm, &config(), "profile", "posting").await;
        assert_eq!(report.overall_score, 42);
        assert_eq!(report.gaps[0].skill, "AWS");
    }

    #[tokio::test]
    async fn test_unparseable_answer_gives_fallback() {
        let llm = ScriptedCompletion::replying("I'd rather not answer in JSON.");
        let report = score_match(&llm, &config(), "profile", "posting").await;
        assert_eq!(report, MatchReport::fallback());
    }

    #[tokio::test]
    async fn test_failed_call_gives_fallback() {
        let llm = ScriptedCompletion::failing();
        let report = score_match(&llm, &config(), "profile", "posting").await;
        assert_eq!(report.overall_score, 80);
        assert!(report.gaps.is_empty());
    }
}

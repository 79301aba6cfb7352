// Shared prompt fragments and the coaching persona.
// Each stage that calls the model defines its own prompts.rs alongside it.

use crate::config::CandidatePersona;

/// Appended to every document-generation prompt.
pub const UNCONDITIONAL_GENERATION: &str = "\
IMPORTANT: Always produce the complete document, no matter how strong or weak the match is.";

/// Appended to every document-generation prompt. The answer is written to disk as-is.
pub const RAW_LATEX_ONLY: &str = "\
Return ONLY the raw LaTeX code: no explanations, no comments, no Markdown code fences, \
no text before \\documentclass. The answer must start directly with \\documentclass.";

/// System prompt for scoring and generation calls.
pub fn coach_system_prompt(candidate: &CandidatePersona) -> String {
    let mut prompt = format!(
        "You are an expert career coach specialising in senior roles in data science, \
analytics and marketing strategy.\n\n\
Your task is to help {name} produce outstanding application documents.\n",
        name = candidate.name
    );

    if !candidate.headline.is_empty() || !candidate.usp.is_empty() {
        prompt.push_str(&format!("\nPROFILE OF {}:\n", candidate.name.to_uppercase()));
        if !candidate.headline.is_empty() {
            prompt.push_str(&format!("Last position: {}\n", candidate.headline));
        }
        if !candidate.usp.is_empty() {
            prompt.push_str(&format!("USP: {}\n", candidate.usp));
        }
    }

    prompt.push_str(
        "\nWRITING GUIDELINES:\n\
- No filler and no phrases like \"motivated team player\"\n\
- Concrete results using terms like \"business impact\", \"conversion optimisation\", \"marketing efficiency\"\n\
- Tone: professional, confident, direct\n\
- Modern tech-company language\n\
- Concise bullet points instead of long prose\n\
- No quotations and no dashes in running text",
    );
    prompt
}

/// The candidate's differentiator, or a generic stand-in when none is configured.
pub fn usp_or_default(candidate: &CandidatePersona) -> &str {
    if candidate.usp.is_empty() {
        "the candidate's strongest differentiator"
    } else {
        &candidate.usp
    }
}

/// Fills `{name}` markers in a prompt template in one pass.
///
/// Only the template is scanned: inserted values are copied verbatim, so a
/// LaTeX template or a scraped posting that happens to contain `{profile}`
/// is never expanded a second time. Unknown `{...}` sequences stay as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let capacity = template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>();
    let mut filled = String::with_capacity(capacity);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let marker = values.iter().find(|(name, _)| {
            after
                .strip_prefix(name)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match marker {
            Some((name, value)) => {
                filled.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }
    filled.push_str(rest);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(headline: &str, usp: &str) -> CandidatePersona {
        CandidatePersona {
            name: "Alex Example".to_string(),
            headline: headline.to_string(),
            usp: usp.to_string(),
        }
    }

    #[test]
    fn test_system_prompt_includes_profile_when_configured() {
        let prompt = coach_system_prompt(&persona("Analytics Manager", "Clear storytelling"));
        assert!(prompt.contains("Alex Example"));
        assert!(prompt.contains("Last position: Analytics Manager"));
        assert!(prompt.contains("USP: Clear storytelling"));
    }

    #[test]
    fn test_system_prompt_skips_empty_profile() {
        let prompt = coach_system_prompt(&persona("", ""));
        assert!(!prompt.contains("PROFILE OF"));
        assert!(prompt.contains("WRITING GUIDELINES"));
    }

    #[test]
    fn test_usp_fallback() {
        assert_eq!(
            usp_or_default(&persona("", "")),
            "the candidate's strongest differentiator"
        );
    }

    #[test]
    fn test_fill_template_replaces_known_markers() {
        let filled = fill_template(
            "Posting: {posting}\nProfile: {profile}",
            &[("posting", "Data Analyst"), ("profile", "SQL")],
        );
        assert_eq!(filled, "Posting: Data Analyst\nProfile: SQL");
    }

    #[test]
    fn test_fill_template_never_rescans_inserted_text() {
        let filled = fill_template(
            "{template}|{profile}|{posting}",
            &[
                ("template", "\\begin{profile}{posting}\\end{profile}"),
                ("profile", "CORPUS {template}"),
                ("posting", "job"),
            ],
        );
        assert_eq!(
            filled,
            "\\begin{profile}{posting}\\end{profile}|CORPUS {template}|job"
        );
    }

    #[test]
    fn test_fill_template_keeps_literal_braces() {
        let filled = fill_template(
            r#"Answer as {"overall_score": 85} for {candidate}"#,
            &[("candidate", "Alex")],
        );
        assert_eq!(filled, r#"Answer as {"overall_score": 85} for Alex"#);
    }
}

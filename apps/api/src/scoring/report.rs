//! MatchReport: the typed compatibility assessment, and the tolerant parser
//! that turns a model answer into one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One skill with its 0–100 sub-score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillScore {
    pub skill: String,
    pub score: u8,
}

impl SkillScore {
    pub fn new(skill: &str, score: u8) -> Self {
        Self {
            skill: skill.to_string(),
            score: score.min(100),
        }
    }
}

/// Structured compatibility report between profile and posting.
/// Every score is an integer in 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub overall_score: u8,
    pub strengths: Vec<SkillScore>,
    pub gaps: Vec<SkillScore>,
    pub recommendation: String,
}

impl MatchReport {
    /// Substituted whenever the scoring answer is unusable.
    pub fn fallback() -> Self {
        Self {
            overall_score: 80,
            strengths: vec![SkillScore::new("Data Science", 90)],
            gaps: vec![],
            recommendation: "Good match with the position.".to_string(),
        }
    }

    pub fn band(&self) -> MatchBand {
        MatchBand::from_score(self.overall_score)
    }
}

/// Score banding used in every user-facing summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Strong
        } else if score >= 60 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong match",
            Self::Moderate => "Moderate match",
            Self::Weak => "Weak match",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Strong => "🟢",
            Self::Moderate => "🟡",
            Self::Weak => "🔴",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Result of reading a scoring answer. The fallback is an explicit branch.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(MatchReport),
    Fallback { reason: String },
}

impl ParseOutcome {
    pub fn into_report(self) -> MatchReport {
        match self {
            ParseOutcome::Parsed(report) => report,
            ParseOutcome::Fallback { .. } => MatchReport::fallback(),
        }
    }
}

/// The model's object as written: any field may be missing or mistyped.
/// German keys are accepted for answers produced from older prompts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMatchReport {
    #[serde(alias = "gesamt_score")]
    overall_score: Value,
    #[serde(alias = "staerken")]
    strengths: Value,
    gaps: Value,
    #[serde(alias = "empfehlung")]
    recommendation: Value,
}

impl RawMatchReport {
    fn validate(self) -> MatchReport {
        MatchReport {
            overall_score: coerce_score(&self.overall_score).unwrap_or(0),
            strengths: coerce_skills(&self.strengths),
            gaps: coerce_skills(&self.gaps),
            recommendation: self
                .recommendation
                .as_str()
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Top-level keys that mark an object as a match report, German aliases included.
const REPORT_KEYS: &[&str] = &[
    "overall_score",
    "gesamt_score",
    "strengths",
    "staerken",
    "gaps",
    "recommendation",
    "empfehlung",
];

/// Finds the first `{...}` in `raw` that is valid JSON with at least one
/// report key, and reads it.
pub fn parse_match_report(raw: &str) -> ParseOutcome {
    let mut reason = "no JSON object in response".to_string();
    let mut search_from = 0;

    while let Some(offset) = raw[search_from..].find('{') {
        let start = search_from + offset;
        let Some(candidate) = balanced_object_at(raw, start) else {
            reason = "unterminated JSON object in response".to_string();
            break;
        };
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(fields)) if REPORT_KEYS.iter().any(|k| fields.contains_key(*k)) => {
                match serde_json::from_value::<RawMatchReport>(Value::Object(fields)) {
                    Ok(report) => return ParseOutcome::Parsed(report.validate()),
                    Err(e) => {
                        reason = format!("unreadable match report: {e}");
                        search_from = start + candidate.len();
                    }
                }
            }
            Ok(_) => {
                // Not a report itself; a report may still be nested inside it.
                reason = "JSON object without match report fields".to_string();
                search_from = start + 1;
            }
            Err(e) => {
                reason = format!("invalid JSON object: {e}");
                search_from = start + candidate.len();
            }
        }
    }

    ParseOutcome::Fallback { reason }
}

/// The brace-balanced slice starting at `start` (which must be `{`).
/// Braces inside JSON strings are ignored.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Numbers and numeric strings (`"85"`, `"85%"`) become a clamped 0–100 integer.
fn coerce_score(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number
        .is_finite()
        .then(|| number.round().clamp(0.0, 100.0) as u8)
}

/// Entries without a skill name are dropped; a missing score counts as 0.
fn coerce_skills(value: &Value) -> Vec<SkillScore> {
    let Some(items) = value.as_array() else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| {
            let skill = item
                .get("skill")
                .or_else(|| item.get("name"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;
            let score = item.get("score").and_then(coerce_score).unwrap_or(0);
            Some(SkillScore::new(skill, score))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_ANSWER: &str = r#"{
        "overall_score": 72,
        "strengths": [{"skill": "SQL", "score": 90}, {"skill": "Python", "score": 70}],
        "gaps": [{"skill": "Scala", "score": 0}],
        "recommendation": "Apply, and mention your Spark exposure."
    }"#;

    fn parsed(raw: &str) -> MatchReport {
        match parse_match_report(raw) {
            ParseOutcome::Parsed(report) => report,
            ParseOutcome::Fallback { reason } => panic!("expected a parsed report, got fallback: {reason}"),
        }
    }

    #[test]
    fn test_clean_answer_parses() {
        let report = parsed(CLEAN_ANSWER);
        assert_eq!(report.overall_score, 72);
        assert_eq!(
            report.strengths,
            vec![SkillScore::new("SQL", 90), SkillScore::new("Python", 70)]
        );
        assert_eq!(report.gaps, vec![SkillScore::new("Scala", 0)]);
        assert_eq!(report.recommendation, "Apply, and mention your Spark exposure.");
    }

    #[test]
    fn test_prose_around_object_is_ignored() {
        let raw = format!("Here is my analysis:\n\n{CLEAN_ANSWER}\n\nLet me know if you need more.");
        assert_eq!(parsed(&raw).overall_score, 72);
    }

    #[test]
    fn test_code_fenced_answer_parses() {
        let raw = format!("```json\n{CLEAN_ANSWER}\n```");
        assert_eq!(parsed(&raw).gaps.len(), 1);
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_the_scan() {
        let raw = r#"{"overall_score": 64, "strengths": [], "gaps": [], "recommendation": "Use {braces} freely }"} trailing }"#;
        let report = parsed(raw);
        assert_eq!(report.overall_score, 64);
        assert_eq!(report.recommendation, "Use {braces} freely }");
    }

    #[test]
    fn test_invalid_first_braces_are_skipped() {
        let raw = format!("Template placeholder {{name}} aside, the result is {CLEAN_ANSWER}");
        assert_eq!(parsed(&raw).overall_score, 72);
    }

    #[test]
    fn test_no_object_falls_back() {
        let outcome = parse_match_report("I cannot assess this posting.");
        assert!(matches!(outcome, ParseOutcome::Fallback { .. }));

        let report = outcome.into_report();
        assert_eq!(report.overall_score, 80);
        assert!(report.gaps.is_empty());
        assert_eq!(report.strengths.len(), 1);
    }

    #[test]
    fn test_malformed_object_falls_back() {
        let outcome = parse_match_report(r#"{"overall_score": 85, "strengths": [}"#);
        assert!(matches!(outcome, ParseOutcome::Fallback { .. }));
        assert_eq!(outcome.into_report(), MatchReport::fallback());
    }

    #[test]
    fn test_unterminated_object_falls_back() {
        let outcome = parse_match_report(r#"Result: {"overall_score": 85"#);
        match outcome {
            ParseOutcome::Fallback { reason } => assert!(reason.contains("unterminated")),
            ParseOutcome::Parsed(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let report = parsed(r#"{"recommendation": "Apply."}"#);
        assert_eq!(report.overall_score, 0);
        assert!(report.strengths.is_empty());
        assert!(report.gaps.is_empty());
        assert_eq!(report.recommendation, "Apply.");
    }

    #[test]
    fn test_objects_without_report_keys_are_skipped() {
        let raw = format!(r#"Example: {{"a": 1}} and then the result: {CLEAN_ANSWER}"#);
        assert_eq!(parsed(&raw).overall_score, 72);

        let outcome = parse_match_report(r#"{} {"note": "nothing here"}"#);
        assert!(matches!(outcome, ParseOutcome::Fallback { .. }));
    }

    #[test]
    fn test_report_nested_in_wrapper_object_is_found() {
        let raw = r#"{"result": {"overall_score": 66, "gaps": []}}"#;
        assert_eq!(parsed(raw).overall_score, 66);
    }

    #[test]
    fn test_scores_are_clamped_and_rounded() {
        let report = parsed(
            r#"{"overall_score": 130, "strengths": [{"skill": "SQL", "score": -5}, {"skill": "R", "score": 66.6}]}"#,
        );
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.strengths[0].score, 0);
        assert_eq!(report.strengths[1].score, 67);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let report = parsed(r#"{"overall_score": "85%", "gaps": [{"skill": "AWS", "score": "20"}]}"#);
        assert_eq!(report.overall_score, 85);
        assert_eq!(report.gaps[0].score, 20);
    }

    #[test]
    fn test_unnamed_skills_are_dropped() {
        let report = parsed(
            r#"{"overall_score": 50, "strengths": [{"score": 90}, {"skill": "  ", "score": 80}, {"skill": "Tableau"}]}"#,
        );
        assert_eq!(report.strengths, vec![SkillScore::new("Tableau", 0)]);
    }

    #[test]
    fn test_german_keys_are_accepted() {
        let report = parsed(
            r#"{"gesamt_score": 85, "staerken": [{"skill": "Data Science", "score": 95}], "gaps": [], "empfehlung": "Bewerben."}"#,
        );
        assert_eq!(report.overall_score, 85);
        assert_eq!(report.strengths[0].skill, "Data Science");
        assert_eq!(report.recommendation, "Bewerben.");
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(MatchBand::from_score(100), MatchBand::Strong);
        assert_eq!(MatchBand::from_score(80), MatchBand::Strong);
        assert_eq!(MatchBand::from_score(79), MatchBand::Moderate);
        assert_eq!(MatchBand::from_score(60), MatchBand::Moderate);
        assert_eq!(MatchBand::from_score(59), MatchBand::Weak);
        assert_eq!(MatchBand::from_score(0), MatchBand::Weak);
    }
}

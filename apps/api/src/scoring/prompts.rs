// Prompt templates for match scoring.

/// Characters of profile corpus sent to the scorer.
pub const PROFILE_INPUT_CHARS: usize = 3000;

/// Output budget for the scoring call.
pub const SCORING_MAX_TOKENS: u32 = 1000;

/// Match scoring prompt. Replace `{candidate}`, `{posting}` and `{profile}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Analyse how well the profile of {candidate} matches this position.

JOB POSTING:
{posting}

PROFILE OF {candidate}:
{profile}

Respond ONLY with a JSON object in exactly this format:
{
  "overall_score": 85,
  "strengths": [
    {"skill": "Data Science", "score": 95},
    {"skill": "A/B Testing", "score": 90},
    {"skill": "Stakeholder Management", "score": 85}
  ],
  "gaps": [
    {"skill": "Scala", "score": 0},
    {"skill": "AWS", "score": 20}
  ],
  "recommendation": "Short recommendation whether the candidate should apply"
}

All scores are whole numbers from 0 to 100."#;

// All LLM prompt constants for document generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Output budget for each generated document.
pub const GENERATION_MAX_TOKENS: u32 = 4000;

/// Résumé prompt template.
/// Replace: {posting}, {profile}, {template}, {rules}, {unconditional}, {raw_only}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Adapt the LaTeX CV template for this position.

JOB POSTING:
{posting}

PROFILE & DOCUMENTS:
{profile}

LATEX CV TEMPLATE:
{template}

{rules}

Create an adapted LaTeX CV that:
1. Highlights the experience most relevant to this position
2. Works keywords from the job posting in naturally
3. Stresses measurable results and business impact

{unconditional}
{raw_only}"#;

/// Cover-letter prompt template.
/// Replace: {posting}, {profile}, {template}, {usp}, {unconditional}, {raw_only}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a compelling cover letter in LaTeX format.

JOB POSTING:
{posting}

PROFILE & DOCUMENTS:
{profile}

LATEX COVER LETTER TEMPLATE (style reference):
{template}

Write a cover letter that:
1. Directly addresses the specific requirements of the position
2. Puts the candidate's differentiator in the foreground: {usp}
3. Cites concrete examples from previous roles
4. Is professional, confident and direct

{unconditional}
{raw_only}"#;

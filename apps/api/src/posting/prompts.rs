// Prompt templates for posting ingestion.

/// Characters of posting text sent for organization extraction.
pub const ORGANIZATION_INPUT_CHARS: usize = 2000;

/// Output budget for organization extraction.
pub const ORGANIZATION_MAX_TOKENS: u32 = 100;

/// Organization extraction prompt. Replace `{posting}` before sending.
pub const ORGANIZATION_PROMPT_TEMPLATE: &str = "\
Extract only the name of the hiring organization from this job posting. \
Return ONLY the organization name, nothing else:

{posting}";

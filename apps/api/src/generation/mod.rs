// Document Generation: résumé and cover letter LaTeX from profile + posting + template.
// All LLM calls go through llm_client, no direct Anthropic calls here.

pub mod generator;
pub mod prompts;
pub mod rules;

pub use generator::{generate_cover_letter, generate_resume, DocumentKind, DocumentSource};

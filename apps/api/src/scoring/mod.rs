// Match Scorer: profile corpus vs posting text → MatchReport.
// Scoring never fails a request: unparseable answers and failed calls both
// degrade to the fixed fallback report.

pub mod format;
pub mod prompts;
pub mod report;
pub mod scorer;

pub use format::{format_closing_summary, format_match_report};
pub use report::MatchReport;
pub use scorer::score_match;

//! Source Fetcher: downloads a posting page and reduces it to visible text.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::Html;
use tracing::{info, warn};

use super::PostingText;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on non-blank lines handed to the scorer and generator.
pub const MAX_POSTING_LINES: usize = 200;

/// Subtrees that never carry posting content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetches `url` and returns its text. Never fails: errors become the text.
    pub async fn fetch(&self, url: &str) -> PostingText {
        info!("Fetching job posting: {}", url);

        match self.fetch_html(url).await {
            Ok(html) => {
                let text = html_to_text(&html, MAX_POSTING_LINES);
                if text.is_empty() {
                    warn!("Posting at {} contained no readable text", url);
                    return failed(url, format!("The page at {url} contained no readable text."));
                }
                info!("Extracted {} lines of posting text", text.lines().count());
                PostingText {
                    source_url: url.to_string(),
                    text,
                    fetch_failed: false,
                }
            }
            Err(e) => {
                warn!("Failed to load posting {}: {:#}", url, e);
                failed(url, format!("Failed to load the job posting from {url}: {e:#}"))
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job posting")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

fn failed(url: &str, message: String) -> PostingText {
    PostingText {
        source_url: url.to_string(),
        text: message,
        fetch_failed: true,
    }
}

/// Visible text of an HTML page: one trimmed line per text fragment, blank lines
/// dropped, at most `max_lines` lines.
pub fn html_to_text(html: &str, max_lines: usize) -> String {
    let document = Html::parse_document(html);

    let fragments = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect::<Vec<&str>>();

    fragments
        .iter()
        .flat_map(|fragment| fragment.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

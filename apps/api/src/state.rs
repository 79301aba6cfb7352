use std::sync::Arc;

use anyhow::Result;

use crate::compiler::LatexCompiler;
use crate::config::Config;
use crate::llm_client::Completion;
use crate::posting::SourceFetcher;
use crate::profile::ProfileLoader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Anthropic client in production, a scripted stub in tests.
    pub llm: Arc<dyn Completion>,
    pub fetcher: SourceFetcher,
    pub profile: ProfileLoader,
    pub compiler: LatexCompiler,
}

impl AppState {
    /// Wires every pipeline component from the one startup `Config`.
    pub fn new(config: Config, llm: Arc<dyn Completion>) -> Result<Self> {
        let fetcher = SourceFetcher::new(config.fetch_timeout)?;
        let profile = ProfileLoader::new(config.profile_dir.clone());
        let compiler = LatexCompiler::new(
            config.latex_command.clone(),
            config.profile_dir.clone(),
            config.output_dir.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            llm,
            fetcher,
            profile,
            compiler,
        })
    }
}

use connectors::{
    fetcher::Fetcher,
    html::{HtmlParser, RawHtml},
    http::HttpFetcher,
};
use engine_core::{config::QueryConfig, context::env::EnvContext};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Process-wide HTTP transport, so every query reuses one connection pool.
static DEFAULT_FETCHER: OnceLock<Arc<HttpFetcher>> = OnceLock::new();

/// Page size and sheet defaults, honouring the save-data hint.
pub fn default_config() -> QueryConfig {
    let env = EnvContext::current();
    let config = QueryConfig::from_env(&env);
    if env.save_data() {
        debug!("Save-data mode, using chunks of {}", config.chunk_size());
    }
    config
}

pub fn default_fetcher() -> Arc<dyn Fetcher> {
    DEFAULT_FETCHER
        .get_or_init(|| Arc::new(HttpFetcher::new()))
        .clone()
}

pub fn default_parser() -> Arc<dyn HtmlParser> {
    Arc::new(RawHtml)
}

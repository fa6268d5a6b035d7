use crate::{
    config::QueryConfig,
    metrics::Metrics,
    progress::{Progress, ProgressTracker},
};
use connectors::{fetcher::Fetcher, html::HtmlParser};
use std::{fmt, sync::Arc};

/// Everything the stages derived from one root query share.
///
/// Configuration is fixed at construction; only the progress tracker and
/// metrics change while the query runs.
pub struct QueryContext {
    url: String,
    config: QueryConfig,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn HtmlParser>,
    tracker: ProgressTracker,
    metrics: Metrics,
}

impl QueryContext {
    pub fn new(
        url: impl Into<String>,
        config: QueryConfig,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn HtmlParser>,
    ) -> Self {
        Self {
            url: url.into(),
            config,
            fetcher,
            parser,
            tracker: ProgressTracker::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    pub fn parser(&self) -> &Arc<dyn HtmlParser> {
        &self.parser
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn progress(&self) -> Progress {
        self.tracker.handle()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("url", &self.url)
            .field("config", &self.config)
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

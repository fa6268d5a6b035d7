use connectors::error::FetchError;
use engine_core::context::query::QueryContext;
use model::pagination::page::Page;
use std::sync::Arc;
use tracing::{debug, warn};

/// Page-fetch primitive shared by the paginator and the locator.
///
/// Every successful page refreshes the query's `total`; every failure is
/// recorded as the query's terminal state.
pub struct PageReader {
    ctx: Arc<QueryContext>,
}

impl PageReader {
    pub fn new(ctx: Arc<QueryContext>) -> Self {
        Self { ctx }
    }

    pub fn chunk_size(&self) -> u64 {
        self.ctx.config().chunk_size()
    }

    pub async fn fetch(&self, offset: u64, limit: u64) -> Result<Page, FetchError> {
        let request = self.ctx.config().request(offset, limit);
        let metrics = self.ctx.metrics();

        match self.ctx.fetcher().fetch_page(self.ctx.url(), &request).await {
            Ok(page) => {
                metrics.increment_pages(1);
                metrics.increment_records(page.len() as u64);
                self.ctx.tracker().record_page(page.total, offset + limit);
                debug!(
                    "Fetched {} records at offset {} (total {})",
                    page.len(),
                    offset,
                    page.total
                );
                Ok(page)
            }
            Err(err) => {
                metrics.increment_failures(1);
                self.ctx.tracker().fail(offset, &err);
                warn!("Page at offset {} of {} failed: {}", offset, self.ctx.url(), err);
                Err(err)
            }
        }
    }

    pub fn exhaust(&self) {
        self.ctx.tracker().exhaust();
    }
}

use crate::transform::map::map_batched;
use connectors::{error::FetchError, http::resolve_url};
use engine_core::context::query::QueryContext;
use futures::stream::BoxStream;
use model::records::record::Record;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Replaces a link field with the parsed document it points to.
///
/// For each record, the URL in `field` is resolved against the index URL,
/// fetched and parsed with the query's `HtmlParser`; the result is stored
/// under `target`. Records without a link pass through untouched; a failed
/// fetch stores `null` and keeps the record.
pub fn follow(
    upstream: BoxStream<'static, Record>,
    ctx: Arc<QueryContext>,
    field: String,
    target: String,
    max_in_flight: usize,
) -> BoxStream<'static, Record> {
    map_batched(
        upstream,
        move |record| {
            let ctx = Arc::clone(&ctx);
            let field = field.clone();
            let target = target.clone();
            async move { Some(follow_link(&ctx, &field, &target, record).await) }
        },
        max_in_flight,
    )
}

async fn follow_link(ctx: &QueryContext, field: &str, target: &str, mut record: Record) -> Record {
    let Some(href) = record
        .get_str(field)
        .filter(|href| !href.is_empty())
        .map(str::to_owned)
    else {
        return record;
    };

    let value = match fetch_document(ctx, &href).await {
        Ok(html) => ctx.parser().parse(&html),
        Err(err) => {
            warn!("Could not follow '{}' from field '{}': {}", href, field, err);
            Value::Null
        }
    };
    record.insert(target, value);
    record
}

async fn fetch_document(ctx: &QueryContext, href: &str) -> Result<String, FetchError> {
    let url = resolve_url(ctx.url(), href)?;
    ctx.metrics().increment_documents(1);

    let result = ctx.fetcher().fetch_text(&url).await;
    if result.is_err() {
        ctx.metrics().increment_failures(1);
    }
    result
}

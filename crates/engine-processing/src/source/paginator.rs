use crate::source::reader::PageReader;
use async_stream::stream;
use engine_core::context::query::QueryContext;
use futures::stream::{BoxStream, StreamExt};
use model::records::record::Record;
use std::sync::Arc;

/// Streams every record of the index, one page at a time.
///
/// Pages are requested strictly in sequence and only when the consumer
/// pulls past the end of the previous one. The upper bound is unknown until
/// the first page arrives and then follows the latest reported `total`.
/// A failed page ends the stream; the failure is kept in the query progress.
pub fn paginate(ctx: Arc<QueryContext>) -> BoxStream<'static, Record> {
    let reader = PageReader::new(ctx);

    stream! {
        let chunk_size = reader.chunk_size();
        let mut offset = 0;
        let mut total: Option<u64> = None;

        while total.is_none_or(|total| offset < total) {
            let Ok(page) = reader.fetch(offset, chunk_size).await else {
                break;
            };
            total = Some(page.total);

            // stop on an empty page even if `total` claims more rows
            let empty = page.is_empty();
            for record in page.data {
                yield record;
            }
            if empty {
                break;
            }
            offset += chunk_size;
        }

        reader.exhaust();
    }
    .boxed()
}

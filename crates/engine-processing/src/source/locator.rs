//! Keyed lookup over an index sorted by one field.
//!
//! Instead of scanning from offset 0, the locator guesses where the key
//! should sit from its leading letter, walks page by page until a page
//! brackets the key, then emits the matching records. The guess assumes keys
//! are spread roughly evenly over the alphabet; on skewed data it only costs
//! extra steps, bounded by the number of pages.

use crate::source::reader::PageReader;
use async_stream::stream;
use engine_core::{
    collate::{alphabet_rank, compare},
    config::LocateConfig,
    context::query::QueryContext,
};
use futures::stream::{BoxStream, StreamExt};
use model::{pagination::page::Page, records::record::Record};
use std::{cmp::Ordering, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    None,
    Backward,
    Forward,
}

/// Where emission starts, plus the page already loaded there, if any.
#[derive(Debug)]
struct Seek {
    offset: u64,
    page: Option<Page>,
}

/// Streams the records whose `key_field` equals `key`, in index order.
pub fn locate(ctx: Arc<QueryContext>, locate: LocateConfig) -> BoxStream<'static, Record> {
    let reader = PageReader::new(ctx);

    stream! {
        if let Some(Seek { mut offset, mut page }) = seek(&reader, &locate).await {
            let chunk_size = reader.chunk_size();

            loop {
                let current = match page.take() {
                    Some(page) => page,
                    None => match reader.fetch(offset, chunk_size).await {
                        Ok(page) => page,
                        Err(_) => break,
                    },
                };

                let total = current.total;
                let past_key = current
                    .last()
                    .is_none_or(|last| compare(&locate.key, key_of(last, &locate.key_field)) == Ordering::Less);

                for record in current.data {
                    if record.get_str(&locate.key_field) == Some(locate.key.as_str()) {
                        yield record;
                    }
                }

                // duplicates of the key may continue on the next page
                offset += chunk_size;
                if past_key || offset >= total {
                    reader.exhaust();
                    break;
                }
            }
        }
    }
    .boxed()
}

/// Finds the page the key starts on. `None` means there is nothing to emit:
/// either the index is empty, the key sorts after every record, or a fetch
/// failed.
async fn seek(reader: &PageReader, locate: &LocateConfig) -> Option<Seek> {
    let mut total = reader.fetch(0, 1).await.ok()?.total;
    if total == 0 {
        reader.exhaust();
        return None;
    }

    let chunk_size = reader.chunk_size();
    let mut offset = initial_offset(alphabet_rank(&locate.key), total, chunk_size);
    let mut direction = Direction::None;
    let max_steps = total.div_ceil(chunk_size) + 1;
    debug!(
        "Seeking '{}' from offset {} (total {}, chunk {})",
        locate.key, offset, total, chunk_size
    );

    for _ in 0..max_steps {
        let page = reader.fetch(offset, chunk_size).await.ok()?;
        total = page.total;

        let (Some(first), Some(last)) = (page.first(), page.last()) else {
            return Some(Seek { offset, page: None });
        };
        let before = compare(&locate.key, key_of(first, &locate.key_field)) != Ordering::Greater;
        let after = compare(&locate.key, key_of(last, &locate.key_field)) == Ordering::Greater;

        if before {
            // the key may also end the previous page
            if offset == 0 || direction == Direction::Forward {
                return Some(Seek { offset, page: Some(page) });
            }
            direction = Direction::Backward;
            offset = offset.saturating_sub(chunk_size);
            if offset == 0 {
                return Some(Seek { offset, page: None });
            }
        } else if after {
            if direction == Direction::Backward {
                // the key falls between this page and the next one
                return Some(Seek { offset, page: Some(page) });
            }
            direction = Direction::Forward;
            offset += chunk_size;
            if offset >= total {
                debug!("'{}' sorts after the last record", locate.key);
                reader.exhaust();
                return None;
            }
        } else {
            return Some(Seek { offset, page: Some(page) });
        }
        debug!("Stepping {:?} to offset {}", direction, offset);
    }

    warn!(
        "Seek for '{}' did not converge in {} steps, scanning from the start",
        locate.key, max_steps
    );
    Some(Seek {
        offset: 0,
        page: None,
    })
}

/// First guess: the key's alphabetic position scaled onto the index, aligned
/// down to a page boundary and kept within the last full page.
fn initial_offset(rank: u64, total: u64, chunk_size: u64) -> u64 {
    let guess = rank * total / 26;
    let aligned = guess / chunk_size * chunk_size;
    aligned.min(total.saturating_sub(chunk_size))
}

fn key_of<'a>(record: &'a Record, key_field: &str) -> &'a str {
    record.get_str(key_field).unwrap_or("")
}

use crate::backend::MockBackend;
use engine_core::collate::compare;
use engine_runtime::{KeyQuery, Query, query, query_by_key};
use model::records::record::Record;
use serde_json::json;
use std::sync::Arc;

pub const INDEX_URL: &str = "https://example.com/query-index.json";
pub const AUTHORS_URL: &str = "https://example.com/authors-index.json";

/// `n` blog posts with ids `1..=n`; odd ids are English, even ids German.
pub fn posts(n: u64) -> Vec<Record> {
    (1..=n)
        .map(|id| {
            serde_json::from_value(json!({
                "id": id,
                "title": format!("Post {id}"),
                "path": format!("/blog/post-{id}"),
                "locale": if id % 2 == 1 { "en" } else { "de" },
            }))
            .unwrap()
        })
        .collect()
}

/// Posts keyed by author URL, sorted the way an author index is published.
pub fn author_posts(mut author_urls: Vec<String>) -> Vec<Record> {
    author_urls.sort_by(|a, b| compare(a, b));
    author_urls
        .into_iter()
        .enumerate()
        .map(|(i, author_url)| {
            serde_json::from_value(json!({
                "authorUrl": author_url,
                "path": format!("/blog/{i}"),
            }))
            .unwrap()
        })
        .collect()
}

pub fn id_of(record: &Record) -> u64 {
    record.get("id").and_then(|v| v.as_u64()).unwrap()
}

pub fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().map(id_of).collect()
}

pub fn index(backend: &Arc<MockBackend>, chunk_size: u64) -> Query {
    query(INDEX_URL)
        .chunks(chunk_size)
        .with_fetcher(backend.clone())
}

pub fn authors(backend: &Arc<MockBackend>, key: &str, chunk_size: u64) -> KeyQuery {
    query_by_key(AUTHORS_URL, key)
        .chunks(chunk_size)
        .with_fetcher(backend.clone())
}

/// Records whose `authorUrl` equals `key`, found by scanning everything.
pub fn linear_scan(records: &[Record], key: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.get_str("authorUrl") == Some(key))
        .cloned()
        .collect()
}

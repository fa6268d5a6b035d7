//! Entry points for querying paginated sheet indexes.
//!
//! ```no_run
//! # async fn run() {
//! let posts = engine_runtime::query("https://example.com/query-index.json")
//!     .chunks(250)
//!     .sheet("blogs")
//!     .filter(|post| post.get_str("locale") == Some("en"))
//!     .limit(10)
//!     .all()
//!     .await;
//! # }
//! ```

pub mod builder;
pub mod factory;

pub use builder::{KeyQuery, Query};
pub use engine_core::progress::{Completion, Progress};
pub use engine_processing::sequence::Sequence;
pub use model::records::record::Record;

/// Starts a query over every record of the index at `url`.
pub fn query(url: impl Into<String>) -> Query {
    Query::new(url)
}

/// Starts a query over the records of the index at `url` whose key field
/// (`authorUrl` unless changed with [`KeyQuery::key_field`]) equals `key`.
/// The index must be sorted by that field.
pub fn query_by_key(url: impl Into<String>, key: impl Into<String>) -> KeyQuery {
    KeyQuery::new(url, key)
}

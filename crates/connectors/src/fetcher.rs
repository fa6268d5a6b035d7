use crate::error::FetchError;
use async_trait::async_trait;
use model::pagination::{page::Page, request::PageRequest};
use std::fmt::Debug;

/// Transport used by every query: one call per page, plus plain document
/// fetches for `follow`.
///
/// Implementations must not retry on their own; a failed call ends the
/// sequence that issued it.
#[async_trait]
pub trait Fetcher: Debug + Send + Sync {
    /// Fetch one page of `url` as described by `request`.
    async fn fetch_page(&self, url: &str, request: &PageRequest) -> Result<Page, FetchError>;

    /// Fetch the body of a linked document.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

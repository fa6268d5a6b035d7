use crate::{error::FetchError, fetcher::Fetcher};
use async_trait::async_trait;
use model::pagination::{page::Page, request::PageRequest};
use tracing::debug;
use url::{Url, form_urlencoded};

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str, request: &PageRequest) -> Result<Page, FetchError> {
        let page_url = page_url(url, request);
        debug!("GET {}", page_url);

        let resp = self.http.get(&page_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: page_url,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url: page_url,
            message: e.to_string(),
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}

/// Builds `<url>?offset=&limit=[&sheet=]`, keeping any query already on `url`.
pub fn page_url(url: &str, request: &PageRequest) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            {
                let mut query = parsed.query_pairs_mut();
                for (key, value) in request.query_pairs() {
                    query.append_pair(key, &value);
                }
            }
            parsed.to_string()
        }
        Err(_) => {
            let params = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(request.query_pairs())
                .finish();
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}{params}")
        }
    }
}

/// Resolves a link found in a record against the index URL it came from.
pub fn resolve_url(base: &str, href: &str) -> Result<String, FetchError> {
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute.to_string());
    }

    let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|e| FetchError::InvalidUrl(format!("{href}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_absolute() {
        let req = PageRequest::new(255, 255).with_sheet(Some("blogs".into()));
        assert_eq!(
            page_url("https://example.com/query-index.json", &req),
            "https://example.com/query-index.json?offset=255&limit=255&sheet=blogs"
        );
    }

    #[test]
    fn test_page_url_keeps_existing_query() {
        let req = PageRequest::new(0, 10);
        assert_eq!(
            page_url("https://example.com/index.json?v=2", &req),
            "https://example.com/index.json?v=2&offset=0&limit=10"
        );
    }

    #[test]
    fn test_page_url_relative() {
        let req = PageRequest::new(0, 64);
        assert_eq!(
            page_url("/blog/query-index.json", &req),
            "/blog/query-index.json?offset=0&limit=64"
        );
    }

    #[test]
    fn test_page_url_encodes_sheet_name() {
        let req = PageRequest::new(0, 64).with_sheet(Some("news & events=2".into()));
        assert_eq!(
            page_url("/blog/query-index.json", &req),
            "/blog/query-index.json?offset=0&limit=64&sheet=news+%26+events%3D2"
        );
        assert_eq!(
            page_url("https://example.com/query-index.json", &req),
            "https://example.com/query-index.json?offset=0&limit=64&sheet=news+%26+events%3D2"
        );
    }

    #[test]
    fn test_resolve_url() {
        let base = "https://example.com/blog/query-index.json";
        assert_eq!(
            resolve_url(base, "/blog/posts/hello").unwrap(),
            "https://example.com/blog/posts/hello"
        );
        assert_eq!(
            resolve_url(base, "https://cdn.example.org/doc.html").unwrap(),
            "https://cdn.example.org/doc.html"
        );
        assert!(resolve_url("not a url", "/relative").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let fetcher = HttpFetcher::new();
        let err = fetcher
            .fetch_text("http://127.0.0.1:9/unreachable")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}

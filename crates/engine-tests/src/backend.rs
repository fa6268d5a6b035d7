use async_trait::async_trait;
use connectors::{error::FetchError, fetcher::Fetcher, http::page_url};
use model::{
    pagination::{page::Page, request::PageRequest},
    records::record::Record,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

/// In-memory index endpoint that records every request it serves.
#[derive(Debug, Default)]
pub struct MockBackend {
    sheets: HashMap<Option<String>, Vec<Record>>,
    documents: HashMap<String, String>,
    failing_offsets: HashSet<u64>,
    latency: Option<Duration>,
    page_requests: Mutex<Vec<PageRequest>>,
    document_requests: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Serves `records` as the default sheet.
    pub fn new(records: Vec<Record>) -> Self {
        let mut sheets = HashMap::new();
        sheets.insert(None, records);
        Self {
            sheets,
            ..Default::default()
        }
    }

    /// Serves only named sheets; requests without `sheet` get a 404.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, records: Vec<Record>) -> Self {
        self.sheets.insert(Some(name.to_string()), records);
        self
    }

    pub fn with_document(mut self, url: &str, html: &str) -> Self {
        self.documents.insert(url.to_string(), html.to_string());
        self
    }

    /// Any page request starting at `offset` answers 503.
    pub fn fail_at_offset(mut self, offset: u64) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn page_request_count(&self) -> usize {
        self.page_requests.lock().unwrap().len()
    }

    pub fn requested_offsets(&self) -> Vec<u64> {
        self.page_requests().iter().map(|r| r.offset).collect()
    }

    pub fn document_requests(&self) -> Vec<String> {
        self.document_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockBackend {
    async fn fetch_page(&self, url: &str, request: &PageRequest) -> Result<Page, FetchError> {
        self.page_requests.lock().unwrap().push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_offsets.contains(&request.offset) {
            return Err(FetchError::Status {
                url: page_url(url, request),
                status: 503,
            });
        }

        let Some(records) = self.sheets.get(&request.sheet) else {
            return Err(FetchError::Status {
                url: page_url(url, request),
                status: 404,
            });
        };

        let total = records.len() as u64;
        let start = request.offset.min(total) as usize;
        let end = (request.offset + request.limit).min(total) as usize;
        Ok(Page::new(
            records[start..end].to_vec(),
            total,
            request.offset,
            request.limit,
        ))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.document_requests.lock().unwrap().push(url.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

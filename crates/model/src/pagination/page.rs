use crate::records::record::Record;
use serde::{Deserialize, Serialize};

/// A single response from a paginated index endpoint.
///
/// `total` is authoritative for the whole index at the time of the request
/// and may change between requests if the backing sheet is republished.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub data: Vec<Record>,
}

impl Page {
    pub fn new(data: Vec<Record>, total: u64, offset: u64, limit: u64) -> Self {
        Page {
            total,
            offset,
            limit,
            data,
        }
    }

    pub fn first(&self) -> Option<&Record> {
        self.data.first()
    }

    pub fn last(&self) -> Option<&Record> {
        self.data.last()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

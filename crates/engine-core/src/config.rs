use crate::context::env::EnvContext;
use model::pagination::request::PageRequest;

/// Page size used when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: u64 = 255;
/// Page size used when the environment asks to save data.
pub const SAVE_DATA_CHUNK_SIZE: u64 = 64;
/// Concurrent calls allowed per `map`/`follow` batch.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 5;
/// Field compared by keyed lookups unless overridden.
pub const DEFAULT_KEY_FIELD: &str = "authorUrl";

/// Configuration of one root query. Frozen once the query starts pulling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    chunk_size: u64,
    sheet: Option<String>,
}

impl QueryConfig {
    pub fn new(chunk_size: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            sheet: None,
        }
    }

    pub fn from_env(env: &EnvContext) -> Self {
        if env.save_data() {
            Self::new(SAVE_DATA_CHUNK_SIZE)
        } else {
            Self::new(DEFAULT_CHUNK_SIZE)
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Request for `limit` records at `offset`, scoped to the configured sheet.
    pub fn request(&self, offset: u64, limit: u64) -> PageRequest {
        PageRequest::new(offset, limit).with_sheet(self.sheet.clone())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// What a keyed lookup searches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateConfig {
    pub key: String,
    pub key_field: String,
}

impl LocateConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }
}

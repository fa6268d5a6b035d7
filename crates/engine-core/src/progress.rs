use connectors::error::FetchError;
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Why a source stopped before reaching the end of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Offset of the page request that failed.
    pub offset: u64,
    /// HTTP status, when the endpoint answered at all.
    pub status: Option<u16>,
    pub reason: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page at offset {} failed: {}", self.offset, self.reason)
    }
}

/// Terminal state of a source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Completion {
    /// Still producing, or abandoned early by a `limit`/`first`.
    #[default]
    Pending,
    /// Every record the index reported was produced.
    Exhausted,
    /// A page fetch failed and the sequence was cut short.
    Failed(Failure),
}

impl Completion {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Completion::Exhausted)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Completion::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Completion::Pending => "Pending",
            Completion::Exhausted => "Exhausted",
            Completion::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    total: Option<u64>,
    offset: u64,
    completion: Completion,
}

/// Write side of a query's progress. Owned by the running source.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    state: Arc<RwLock<ProgressState>>,
}

/// Read-only view of a query's progress.
#[derive(Debug, Clone)]
pub struct Progress {
    state: Arc<RwLock<ProgressState>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Progress {
        Progress {
            state: Arc::clone(&self.state),
        }
    }

    /// Records a successful page: the latest `total` and the next offset.
    pub fn record_page(&self, total: u64, next_offset: u64) {
        let mut state = self.write();
        state.total = Some(total);
        state.offset = next_offset;
    }

    /// Marks the source as finished. Does not override a failure.
    pub fn exhaust(&self) {
        let mut state = self.write();
        if state.completion == Completion::Pending {
            state.completion = Completion::Exhausted;
        }
    }

    pub fn fail(&self, offset: u64, err: &FetchError) {
        let mut state = self.write();
        if state.completion == Completion::Pending {
            state.completion = Completion::Failed(Failure {
                offset,
                status: err.status(),
                reason: err.to_string(),
            });
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgressState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Progress {
    /// Total record count, once the first page has been received.
    pub fn total(&self) -> Option<u64> {
        self.read().total
    }

    /// Offset of the next page the source would request.
    pub fn offset(&self) -> u64 {
        self.read().offset
    }

    pub fn completion(&self) -> Completion {
        self.read().completion.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, ProgressState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

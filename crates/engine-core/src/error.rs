use crate::progress::{Completion, Failure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The source stopped on a failed page; the records produced so far are
    /// a prefix of the full result.
    #[error("Query truncated, {0}")]
    Truncated(Failure),
}

impl Completion {
    /// `Err` only when the source failed; `Pending` and `Exhausted` are both fine.
    pub fn check(&self) -> Result<(), QueryError> {
        match self {
            Completion::Failed(failure) => Err(QueryError::Truncated(failure.clone())),
            _ => Ok(()),
        }
    }
}

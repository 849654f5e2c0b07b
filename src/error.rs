use thiserror::Error;

/// Returned by a move generator when the position has no legal follow-ups
/// (checkmate or stalemate). Expected during search; the engine turns it into
/// a terminal leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position has no legal follow-ups")]
pub struct NoChildren;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("node value read before it was computed")]
    UninitializedValue,
    #[error("tree consistency violated: {0}")]
    Inconsistent(String),
    #[error("search deadline exceeded")]
    Timeout,
    #[error("time budget too small to complete a depth-1 search")]
    BudgetExhausted,
}

impl SearchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SearchError::Timeout)
    }
}

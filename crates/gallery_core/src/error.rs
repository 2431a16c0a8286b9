use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or service unavailable, timed out, or answered with garbage.
    Transport,
    /// The service rejected the query itself.
    InvalidQuery,
    /// Delete target is already gone.
    NotFound,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::InvalidQuery => write!(f, "invalid query"),
            FailureKind::NotFound => write!(f, "not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SearchError {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidQuery, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    /// Transport failures may succeed on a later attempt; the others will not.
    pub fn is_retriable(&self) -> bool {
        self.kind == FailureKind::Transport
    }
}

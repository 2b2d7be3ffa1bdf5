//! Common error type for the query coordinator.

/// Common error type for the query coordinator.
#[derive(Debug)]
pub enum Error {
    /// Malformed input: wrong tensor shape, non-positive `k`, a filter
    /// literal whose type does not match the column.
    InvalidInput(String),
    /// The coordinator is not in a state that can serve the request:
    /// no partition manager, or a call made after `shutdown_workers`.
    InvalidState(String),
    /// A collaborator (parent index, partition manager, attribute
    /// table) raised while serving a request.
    BackendFailure(Box<dyn std::error::Error + Send + Sync>),
    /// The worker pool is draining and cannot accept the request.
    Cancelled(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BackendFailure(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(s) => write!(f, "invalid input: {}", s),
            Self::InvalidState(s) => write!(f, "invalid state: {}", s),
            Self::BackendFailure(e) => write!(f, "backend failure: {}", e),
            Self::Cancelled(s) => write!(f, "cancelled: {}", s),
        }
    }
}

impl Error {
    /// Wraps a collaborator error as a [`Error::BackendFailure`].
    pub fn backend<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendFailure(Box::new(e))
    }
}

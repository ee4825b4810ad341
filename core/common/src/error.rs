//! Common error types for Cirrus.

use std::fmt;

use thiserror::Error;

/// Top-level error type for Cirrus operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code returned by the server.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Credentials were missing, invalid or expired.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The server refused access to the resource.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A create, rename or delete failed.
    #[error("Failed to {operation}: {source}")]
    Mutation {
        /// Operation that failed, e.g. "rename".
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an error as a failed mutation.
    pub fn mutation(operation: &'static str, source: Error) -> Self {
        Error::Mutation {
            operation,
            source: Box::new(source),
        }
    }

    /// Whether the error came from the transport layer rather than from
    /// interpreting a response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::Http { .. }
                | Error::Authentication(_)
                | Error::PermissionDenied(_)
                | Error::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure that happened after some output had already been produced.
///
/// Paginated listings and chunked downloads stop at the first failure and
/// hand back what they fetched up to that point next to the error. Whether
/// the partial output is usable is up to the caller.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PartialError<T: fmt::Debug> {
    /// Output produced before the failure.
    pub fetched: T,
    /// The failure that stopped the operation.
    #[source]
    pub error: Error,
}

impl<T: fmt::Debug> PartialError<T> {
    /// Create a partial error.
    pub fn new(fetched: T, error: Error) -> Self {
        Self { fetched, error }
    }

    /// Split into the partial output and the error.
    pub fn into_parts(self) -> (T, Error) {
        (self.fetched, self.error)
    }
}

impl<T: fmt::Debug> From<PartialError<T>> for Error {
    fn from(partial: PartialError<T>) -> Self {
        partial.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(Error::Network("reset".to_string()).is_transport());
        assert!(Error::Http {
            status: 503,
            body: String::new()
        }
        .is_transport());
        assert!(!Error::Decode("bad".to_string()).is_transport());
        assert!(!Error::mutation("rename", Error::Network("x".to_string())).is_transport());
    }

    #[test]
    fn test_mutation_display_includes_source() {
        let err = Error::mutation("delete", Error::NotFound("item".to_string()));
        assert_eq!(err.to_string(), "Failed to delete: Not found: item");
    }

    #[test]
    fn test_partial_error_parts() {
        let partial = PartialError::new(vec![1u8, 2, 3], Error::Network("eof".to_string()));
        assert_eq!(partial.to_string(), "Network error: eof");

        let (fetched, error) = partial.into_parts();
        assert_eq!(fetched, vec![1, 2, 3]);
        assert!(matches!(error, Error::Network(_)));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: Error = serde_json::from_str::<u64>("-1").unwrap_err().into();
        assert!(matches!(err, Error::Decode(_)));
    }
}

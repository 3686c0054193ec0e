use chirp_proto::ErrorKind;
use thiserror::Error;

/// Failure of a client operation.
///
/// Every variant maps to a local [`ErrorKind`] via [`ChirpError::kind`], so
/// callers can branch uniformly: `WouldBlock`/`Busy` are retryable,
/// `ConnectionReset` requires a fresh connect, the rest are terminal.
#[derive(Debug, Error)]
pub enum ChirpError {
    /// Well-formed negative result from the server; the connection stays
    /// usable.
    #[error("server error: {kind} (wire code {code})")]
    Server { kind: ErrorKind, code: i64 },

    /// Transport fault: short read/write, malformed line, premature close,
    /// or deadline expiry mid-exchange. The session is broken.
    #[error("connection reset")]
    ConnectionReset,

    /// Deadline expired while establishing a connection.
    #[error("connect deadline expired")]
    Timeout,

    #[error("cannot resolve host {0}")]
    ResolveFailed(String),

    #[error("authentication rejected")]
    AuthDenied,

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChirpError {
    /// The local error kind carried by this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChirpError::Server { kind, .. } => *kind,
            ChirpError::ConnectionReset => ErrorKind::ConnectionReset,
            ChirpError::Timeout => ErrorKind::Timeout,
            ChirpError::ResolveFailed(_) => ErrorKind::NotFound,
            ChirpError::AuthDenied => ErrorKind::PermissionDenied,
            ChirpError::Config(_) => ErrorKind::InvalidArgument,
            ChirpError::Io(_) => ErrorKind::ConnectionReset,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChirpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = ChirpError::Server {
            kind: ErrorKind::NotFound,
            code: -3,
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(ChirpError::ConnectionReset.kind(), ErrorKind::ConnectionReset);
        assert_eq!(ChirpError::Timeout.kind(), ErrorKind::Timeout);
        assert_eq!(ChirpError::AuthDenied.kind(), ErrorKind::PermissionDenied);
    }
}

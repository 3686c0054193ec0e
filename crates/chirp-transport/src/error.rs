use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("deadline expired")]
    DeadlineExpired,

    #[error("connection closed by peer")]
    Closed,

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("cannot resolve host {host}")]
    Resolve { host: String },

    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

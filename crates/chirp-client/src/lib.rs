//! Chirp protocol engine: the client side of the Chirp remote
//! storage/execution protocol.
//!
//! One [`Session`] owns one authenticated, strictly turn-based connection.
//! Operations encode a request line, read a single decimal result line, and
//! consume any protocol-defined payload. I/O-bearing operations come in
//! begin/finish pairs so callers can overlap local work with server
//! latency; the begin call returns a typed pending token that borrows the
//! session until finished.

pub mod connect;
pub mod error;
pub mod fs;
pub mod groups;
pub mod io;
pub mod jobs;
pub mod list;
pub mod pending;
pub mod session;

pub use connect::Connector;
pub use error::{ChirpError, Result};
pub use pending::{PendingAck, PendingRead, PendingStat, PendingWrite};
pub use session::Session;

pub use chirp_proto::{
    AllocInfo, AuditEntry, ErrorKind, JobState, OpenFlags, Stat, Statfs, CHIRP_PORT, MAX_CHUNK,
};
pub use chirp_transport::{AuthIdent, AuthNegotiator, Deadline, DnsResolver, NameResolver};

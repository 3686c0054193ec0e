//! Chirp wire format.
//!
//! Pure protocol code with no I/O: request-line encoding, percent-encoding of
//! path arguments, open-flag mode strings, the closed wire error code
//! enumeration, and the fixed-field line decoders (stat, statfs, job state,
//! audit and allocation records).

pub mod audit;
pub mod encode;
pub mod errors;
pub mod flags;
pub mod job;
pub mod stat;

pub use audit::{AllocInfo, AuditEntry};
pub use encode::{percent_decode, percent_encode, Request};
pub use errors::{translate, DecodeError, ErrorKind, WireCode};
pub use flags::{Access, OpenFlags};
pub use job::JobState;
pub use stat::{Stat, Statfs};

/// Default TCP port of a Chirp server.
pub const CHIRP_PORT: u16 = 9094;

/// Largest binary payload carried in one protocol turn. Writes beyond this
/// are capped at begin time; callers split larger transfers across calls.
pub const MAX_CHUNK: u64 = 16 * 1024 * 1024;

/// Longest request or response line accepted before the exchange is treated
/// as a protocol fault.
pub const MAX_LINE: usize = 64 * 1024;

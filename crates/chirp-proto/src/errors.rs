//! Wire error codes and their translation into the local error domain.
//!
//! A response line carrying a negative decimal is a wire error code from a
//! closed enumeration. Translation never touches session state; connection
//! faults are reported by the response core, not by this table.

use thiserror::Error;

/// Negative result codes a Chirp server may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum WireCode {
    NotAuthenticated = -1,
    NotAuthorized = -2,
    DoesntExist = -3,
    AlreadyExists = -4,
    TooBig = -5,
    NoSpace = -6,
    NoMemory = -7,
    InvalidRequest = -8,
    TooManyOpen = -9,
    Busy = -10,
    TryAgain = -11,
    NotDir = -12,
    IsDir = -13,
    NotEmpty = -14,
    CrossDeviceLink = -15,
    GrpUnreachable = -16,
    TimedOut = -17,
    Disconnected = -18,
    NoSuchProcess = -19,
    IsAPipe = -20,
    Unknown = -127,
}

impl WireCode {
    /// All codes in the enumeration, for table-driven coverage.
    pub const ALL: [WireCode; 21] = [
        WireCode::NotAuthenticated,
        WireCode::NotAuthorized,
        WireCode::DoesntExist,
        WireCode::AlreadyExists,
        WireCode::TooBig,
        WireCode::NoSpace,
        WireCode::NoMemory,
        WireCode::InvalidRequest,
        WireCode::TooManyOpen,
        WireCode::Busy,
        WireCode::TryAgain,
        WireCode::NotDir,
        WireCode::IsDir,
        WireCode::NotEmpty,
        WireCode::CrossDeviceLink,
        WireCode::GrpUnreachable,
        WireCode::TimedOut,
        WireCode::Disconnected,
        WireCode::NoSuchProcess,
        WireCode::IsAPipe,
        WireCode::Unknown,
    ];

    /// Looks up a raw negative result in the enumeration.
    pub fn from_result(code: i64) -> Option<WireCode> {
        Self::ALL.iter().copied().find(|&c| c as i64 == code)
    }

    /// The local kind this code translates to.
    pub fn kind(self) -> ErrorKind {
        match self {
            WireCode::NotAuthenticated | WireCode::NotAuthorized => ErrorKind::PermissionDenied,
            WireCode::DoesntExist => ErrorKind::NotFound,
            WireCode::AlreadyExists => ErrorKind::AlreadyExists,
            WireCode::TooBig => ErrorKind::FileTooLarge,
            WireCode::NoSpace => ErrorKind::OutOfSpace,
            WireCode::NoMemory => ErrorKind::OutOfMemory,
            WireCode::InvalidRequest => ErrorKind::InvalidArgument,
            WireCode::TooManyOpen => ErrorKind::TooManyOpenHandles,
            WireCode::Busy => ErrorKind::Busy,
            WireCode::TryAgain => ErrorKind::WouldBlock,
            WireCode::NotDir => ErrorKind::NotADirectory,
            WireCode::IsDir => ErrorKind::IsADirectory,
            WireCode::NotEmpty => ErrorKind::NotEmpty,
            WireCode::CrossDeviceLink => ErrorKind::CrossDeviceLink,
            WireCode::NoSuchProcess => ErrorKind::NoSuchProcess,
            WireCode::IsAPipe => ErrorKind::InvalidSeek,
            WireCode::GrpUnreachable
            | WireCode::TimedOut
            | WireCode::Disconnected
            | WireCode::Unknown => ErrorKind::ConnectionReset,
        }
    }
}

/// Local error domain callers branch on.
///
/// `WouldBlock` and `Busy` are retryable, `ConnectionReset` requires a new
/// connection, the rest are terminal for the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PermissionDenied,
    NotFound,
    AlreadyExists,
    FileTooLarge,
    OutOfSpace,
    OutOfMemory,
    InvalidArgument,
    TooManyOpenHandles,
    Busy,
    WouldBlock,
    NotADirectory,
    IsADirectory,
    NotEmpty,
    CrossDeviceLink,
    NoSuchProcess,
    InvalidSeek,
    ConnectionReset,
    Timeout,
    /// A negative result outside the closed enumeration; carries the raw
    /// wire code so it is never silently dropped.
    Protocol(i64),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::PermissionDenied => write!(f, "permission denied"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::AlreadyExists => write!(f, "already exists"),
            ErrorKind::FileTooLarge => write!(f, "file too large"),
            ErrorKind::OutOfSpace => write!(f, "out of space"),
            ErrorKind::OutOfMemory => write!(f, "out of memory"),
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::TooManyOpenHandles => write!(f, "too many open handles"),
            ErrorKind::Busy => write!(f, "busy"),
            ErrorKind::WouldBlock => write!(f, "try again"),
            ErrorKind::NotADirectory => write!(f, "not a directory"),
            ErrorKind::IsADirectory => write!(f, "is a directory"),
            ErrorKind::NotEmpty => write!(f, "directory not empty"),
            ErrorKind::CrossDeviceLink => write!(f, "cross-device link"),
            ErrorKind::NoSuchProcess => write!(f, "no such process"),
            ErrorKind::InvalidSeek => write!(f, "invalid seek"),
            ErrorKind::ConnectionReset => write!(f, "connection reset"),
            ErrorKind::Timeout => write!(f, "timed out"),
            ErrorKind::Protocol(code) => write!(f, "unrecognized wire code {code}"),
        }
    }
}

/// Translates a negative result line value into a local kind.
///
/// Codes outside the enumeration become [`ErrorKind::Protocol`].
pub fn translate(code: i64) -> ErrorKind {
    debug_assert!(code < 0);
    match WireCode::from_result(code) {
        Some(wire) => wire.kind(),
        None => ErrorKind::Protocol(code),
    }
}

/// Failure to decode a fixed-field response line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("field {index} is not a valid integer: {token:?}")]
    BadInteger { index: usize, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_exactly_one_kind() {
        for code in WireCode::ALL {
            let kind = translate(code as i64);
            assert_eq!(kind, code.kind());
            assert!(!matches!(kind, ErrorKind::Protocol(_)), "{code:?} left untranslated");
        }
    }

    #[test]
    fn test_table_entries() {
        assert_eq!(translate(-1), ErrorKind::PermissionDenied);
        assert_eq!(translate(-2), ErrorKind::PermissionDenied);
        assert_eq!(translate(-3), ErrorKind::NotFound);
        assert_eq!(translate(-4), ErrorKind::AlreadyExists);
        assert_eq!(translate(-5), ErrorKind::FileTooLarge);
        assert_eq!(translate(-6), ErrorKind::OutOfSpace);
        assert_eq!(translate(-7), ErrorKind::OutOfMemory);
        assert_eq!(translate(-8), ErrorKind::InvalidArgument);
        assert_eq!(translate(-9), ErrorKind::TooManyOpenHandles);
        assert_eq!(translate(-10), ErrorKind::Busy);
        assert_eq!(translate(-11), ErrorKind::WouldBlock);
        assert_eq!(translate(-12), ErrorKind::NotADirectory);
        assert_eq!(translate(-13), ErrorKind::IsADirectory);
        assert_eq!(translate(-14), ErrorKind::NotEmpty);
        assert_eq!(translate(-15), ErrorKind::CrossDeviceLink);
        assert_eq!(translate(-16), ErrorKind::ConnectionReset);
        assert_eq!(translate(-17), ErrorKind::ConnectionReset);
        assert_eq!(translate(-18), ErrorKind::ConnectionReset);
        assert_eq!(translate(-19), ErrorKind::NoSuchProcess);
        assert_eq!(translate(-20), ErrorKind::InvalidSeek);
        assert_eq!(translate(-127), ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_unknown_code_carries_raw_value() {
        assert_eq!(translate(-99), ErrorKind::Protocol(-99));
    }

    #[test]
    fn test_from_result_rejects_unlisted() {
        assert_eq!(WireCode::from_result(-99), None);
        assert_eq!(WireCode::from_result(-12), Some(WireCode::NotDir));
    }
}

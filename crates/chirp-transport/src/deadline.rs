//! Absolute deadlines for blocking transport calls.
//!
//! Every primitive takes an absolute deadline rather than a per-call timeout
//! so that callers bound total elapsed time across a sequence of operations.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Result, TransportError};

/// Absolute deadline as milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    expiry_ms: u64,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            expiry_ms: now_ms.saturating_add(timeout.as_millis() as u64),
        }
    }

    /// A deadline from milliseconds since the UNIX epoch.
    pub fn from_epoch_ms(ms: u64) -> Self {
        Self { expiry_ms: ms }
    }

    /// A deadline so far in the future it never fires.
    pub fn never() -> Self {
        Self {
            expiry_ms: u64::MAX,
        }
    }

    /// Remaining time, or `None` if already expired.
    pub fn remaining(&self) -> Option<Duration> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        if self.expiry_ms > now_ms {
            Some(Duration::from_millis(self.expiry_ms - now_ms))
        } else {
            None
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }

    pub fn expiry_ms(&self) -> u64 {
        self.expiry_ms
    }

    /// Runs `fut` bounded by this deadline.
    pub(crate) async fn bound<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let remaining = self.remaining().ok_or(TransportError::DeadlineExpired)?;
        match tokio::time::timeout(remaining, fut).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::DeadlineExpired),
        }
    }
}

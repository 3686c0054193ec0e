//! Typed begin/finish tokens.
//!
//! A begin call sends the request and returns a token that borrows the
//! session mutably; only the token's `finish` consumes the response. The
//! borrow prevents issuing another request while one is pending, so the
//! Idle/Pending turn-taking is enforced at compile time. Dropping a token
//! without finishing leaves an unconsumed response on the wire, which the
//! next `get_result` will misread; callers overlap local work between begin
//! and finish, they do not abandon tokens on a session they keep using.

use chirp_proto::Stat;
use chirp_transport::Deadline;

use crate::error::Result;
use crate::session::Session;

/// Pending read: finish consumes the byte count and the payload.
pub struct PendingRead<'s> {
    pub(crate) session: &'s mut Session,
}

impl PendingRead<'_> {
    /// Consumes the result line; if positive, reads exactly that many bytes
    /// into `buf`. A payload longer than `buf` is a protocol fault.
    pub async fn finish(self, buf: &mut [u8], deadline: Deadline) -> Result<u64> {
        let result = self.session.get_result(deadline).await?;
        if result > 0 {
            let n = result as usize;
            if n > buf.len() {
                return self.session.fault();
            }
            self.session.read_payload(&mut buf[..n], deadline).await?;
        }
        Ok(result as u64)
    }
}

/// Pending write: the payload already went out at begin time, capped to the
/// per-call chunk limit; finish only retrieves the acknowledgement.
pub struct PendingWrite<'s> {
    pub(crate) session: &'s mut Session,
    pub(crate) sent: u64,
}

impl PendingWrite<'_> {
    /// Bytes actually shipped at begin time (after capping).
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Consumes the server's acknowledgement.
    pub async fn finish(self, deadline: Deadline) -> Result<i64> {
        self.session.get_result(deadline).await
    }
}

/// Pending descriptor stat: finish consumes the result and the stat line.
pub struct PendingStat<'s> {
    pub(crate) session: &'s mut Session,
}

impl PendingStat<'_> {
    pub async fn finish(self, deadline: Deadline) -> Result<Stat> {
        self.session.get_result(deadline).await?;
        self.session.read_stat(deadline).await
    }
}

/// Pending status-only operation (fsync): finish consumes the result line.
pub struct PendingAck<'s> {
    pub(crate) session: &'s mut Session,
}

impl PendingAck<'_> {
    pub async fn finish(self, deadline: Deadline) -> Result<i64> {
        self.session.get_result(deadline).await
    }
}

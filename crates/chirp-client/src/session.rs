//! Session state and the response core.
//!
//! A [`Session`] exclusively owns one transport link. The protocol is
//! strictly turn-based: one request line, one result line, optional payload.
//! Any detected transport fault sets the sticky `broken` flag; once set,
//! every later call fails with `ConnectionReset` before touching the
//! transport.

use chirp_proto::{translate, Request, Stat, Statfs, MAX_LINE};
use chirp_transport::{Deadline, Link};

use crate::error::{ChirpError, Result};

/// One authenticated connection to a Chirp server.
///
/// All operations are methods on this type and take an absolute [`Deadline`].
/// The session is not internally synchronized; concurrent use requires
/// external synchronization.
pub struct Session {
    link: Link,
    hostport: String,
    broken: bool,
    serial: u64,
}

impl Session {
    pub(crate) fn new(link: Link, hostport: String, serial: u64) -> Self {
        Self {
            link,
            hostport,
            broken: false,
            serial,
        }
    }

    /// Locally assigned serial of this session, for diagnostics only.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// The `host:port` identity this session was connected with.
    pub fn hostport(&self) -> &str {
        &self.hostport
    }

    /// Whether a transport fault has permanently broken this session.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Closes the connection and releases the session.
    pub async fn disconnect(self) {
        self.link.close().await;
    }

    fn check_broken(&self) -> Result<()> {
        if self.broken {
            Err(ChirpError::ConnectionReset)
        } else {
            Ok(())
        }
    }

    /// Marks the session broken and reports the fault.
    pub(crate) fn fault<T>(&mut self) -> Result<T> {
        self.broken = true;
        Err(ChirpError::ConnectionReset)
    }

    /// Writes one request line. Fails fast with no write attempted if the
    /// session is broken; any transport fault breaks the session.
    pub(crate) async fn send_command(&mut self, request: Request, deadline: Deadline) -> Result<()> {
        self.check_broken()?;
        tracing::debug!(host = %self.hostport, serial = self.serial, command = request.as_str(), "request");
        let line = request.into_line();
        match self.link.write_all(line.as_bytes(), deadline).await {
            Ok(()) => Ok(()),
            Err(_) => self.fault(),
        }
    }

    /// Reads one result line and parses the single decimal value.
    ///
    /// Non-negative values are the operation's semantic result. Negative
    /// values are wire error codes translated into the local domain; that
    /// translation never breaks the session. A malformed line does.
    pub(crate) async fn get_result(&mut self, deadline: Deadline) -> Result<i64> {
        self.check_broken()?;
        let line = match self.link.read_line(MAX_LINE, deadline).await {
            Ok(line) => line,
            Err(_) => return self.fault(),
        };
        let value: i64 = match line.split_whitespace().next().and_then(|t| t.parse().ok()) {
            Some(value) => value,
            None => return self.fault(),
        };
        if value >= 0 {
            tracing::debug!(result = value, "response");
            Ok(value)
        } else {
            let kind = translate(value);
            tracing::debug!(result = value, kind = %kind, "response");
            Err(ChirpError::Server { kind, code: value })
        }
    }

    /// The canonical pattern for operations without extra payload.
    pub(crate) async fn simple_command(&mut self, request: Request, deadline: Deadline) -> Result<i64> {
        self.send_command(request, deadline).await?;
        self.get_result(deadline).await
    }

    /// Reads exactly `buf.len()` payload bytes; a short read breaks the
    /// session.
    pub(crate) async fn read_payload(&mut self, buf: &mut [u8], deadline: Deadline) -> Result<()> {
        self.check_broken()?;
        match self.link.read_exact(buf, deadline).await {
            Ok(()) => Ok(()),
            Err(_) => self.fault(),
        }
    }

    /// Reads one newline-terminated payload line.
    pub(crate) async fn read_payload_line(&mut self, deadline: Deadline) -> Result<String> {
        self.check_broken()?;
        match self.link.read_line(MAX_LINE, deadline).await {
            Ok(line) => Ok(line),
            Err(_) => self.fault(),
        }
    }

    /// Writes raw payload bytes following an already-sent request.
    pub(crate) async fn write_payload(&mut self, buf: &[u8], deadline: Deadline) -> Result<()> {
        self.check_broken()?;
        match self.link.write_all(buf, deadline).await {
            Ok(()) => Ok(()),
            Err(_) => self.fault(),
        }
    }

    /// Reads and decodes a 13-field stat line; a decode failure breaks the
    /// session.
    pub(crate) async fn read_stat(&mut self, deadline: Deadline) -> Result<Stat> {
        let line = self.read_payload_line(deadline).await?;
        match Stat::decode(&line) {
            Ok(stat) => Ok(stat),
            Err(_) => self.fault(),
        }
    }

    /// Reads and decodes a 7-field statfs line.
    pub(crate) async fn read_statfs(&mut self, deadline: Deadline) -> Result<Statfs> {
        let line = self.read_payload_line(deadline).await?;
        match Statfs::decode(&line) {
            Ok(statfs) => Ok(statfs),
            Err(_) => self.fault(),
        }
    }

    pub(crate) fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("hostport", &self.hostport)
            .field("serial", &self.serial)
            .field("broken", &self.broken)
            .finish()
    }
}

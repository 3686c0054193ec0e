//! Deadline-bounded TCP link.
//!
//! The link buffers reads internally so that line reads and the raw payload
//! reads that follow them see one consistent byte stream. All primitives
//! take an absolute [`Deadline`]; expiry surfaces as
//! [`TransportError::DeadlineExpired`] and the caller decides what that
//! means for its session.

use std::net::IpAddr;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::deadline::Deadline;
use crate::error::{Result, TransportError};

const READ_CHUNK: usize = 8 * 1024;

/// Latency profile applied to a freshly connected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuneProfile {
    /// Small request/response exchanges: disable Nagle coalescing.
    Interactive,
    /// Large sequential transfers: let the kernel coalesce.
    Bulk,
}

/// One reliable ordered byte stream to a remote peer.
pub struct Link {
    stream: TcpStream,
    rbuf: BytesMut,
    peer: String,
}

impl Link {
    /// Opens a TCP connection to `addr:port` under `deadline`.
    pub async fn connect(addr: IpAddr, port: u16, deadline: Deadline) -> Result<Self> {
        let stream = deadline
            .bound(async {
                TcpStream::connect((addr, port))
                    .await
                    .map_err(TransportError::Io)
            })
            .await?;
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();
        tracing::debug!(peer = %peer, "link connected");
        Ok(Self {
            stream,
            rbuf: BytesMut::with_capacity(READ_CHUNK),
            peer,
        })
    }

    /// Applies a latency profile.
    pub fn tune(&self, profile: TuneProfile) -> Result<()> {
        self.stream
            .set_nodelay(profile == TuneProfile::Interactive)?;
        Ok(())
    }

    /// Remote peer address, for diagnostics.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes the whole buffer before `deadline`.
    pub async fn write_all(&mut self, buf: &[u8], deadline: Deadline) -> Result<()> {
        deadline
            .bound(async {
                self.stream.write_all(buf).await?;
                self.stream.flush().await?;
                Ok(())
            })
            .await
    }

    /// Fills the whole buffer before `deadline`, consuming any internally
    /// buffered bytes first.
    pub async fn read_exact(&mut self, buf: &mut [u8], deadline: Deadline) -> Result<()> {
        let buffered = self.rbuf.len().min(buf.len());
        buf[..buffered].copy_from_slice(&self.rbuf[..buffered]);
        self.rbuf.advance(buffered);
        if buffered == buf.len() {
            return Ok(());
        }
        let rest = &mut buf[buffered..];
        deadline
            .bound(async {
                self.stream
                    .read_exact(rest)
                    .await
                    .map_err(|e| match e.kind() {
                        std::io::ErrorKind::UnexpectedEof => TransportError::Closed,
                        _ => TransportError::Io(e),
                    })?;
                Ok(())
            })
            .await
    }

    /// Reads one newline-terminated line, without the newline.
    ///
    /// A line longer than `max_len` is a protocol fault, not truncated.
    /// Stream close before the newline reports [`TransportError::Closed`].
    pub async fn read_line(&mut self, max_len: usize, deadline: Deadline) -> Result<String> {
        loop {
            if let Some(pos) = self.rbuf.iter().position(|&b| b == b'\n') {
                if pos > max_len {
                    return Err(TransportError::LineTooLong { limit: max_len });
                }
                let mut line = self.rbuf.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            if self.rbuf.len() > max_len {
                return Err(TransportError::LineTooLong { limit: max_len });
            }
            let n = deadline
                .bound(async {
                    self.stream
                        .read_buf(&mut self.rbuf)
                        .await
                        .map_err(TransportError::Io)
                })
                .await?;
            if n == 0 {
                return Err(TransportError::Closed);
            }
        }
    }

    /// Reads whatever is currently available, up to `buf.len()` bytes.
    ///
    /// Returns 0 only when the peer has closed the stream. Used by the
    /// best-effort streaming tunnel where no length is framed.
    pub async fn read_available(&mut self, buf: &mut [u8], deadline: Deadline) -> Result<usize> {
        if !self.rbuf.is_empty() {
            let n = self.rbuf.len().min(buf.len());
            buf[..n].copy_from_slice(&self.rbuf[..n]);
            self.rbuf.advance(n);
            return Ok(n);
        }
        deadline
            .bound(async {
                self.stream.read(buf).await.map_err(TransportError::Io)
            })
            .await
    }

    /// Copies exactly `length` bytes from the link into `sink`.
    pub async fn stream_to(
        &mut self,
        sink: &mut (impl AsyncWrite + Unpin),
        length: u64,
        deadline: Deadline,
    ) -> Result<()> {
        let mut remaining = length;
        let mut chunk = vec![0u8; READ_CHUNK];
        while remaining > 0 {
            let want = (remaining as usize).min(chunk.len());
            self.read_exact(&mut chunk[..want], deadline).await?;
            deadline
                .bound(async {
                    sink.write_all(&chunk[..want])
                        .await
                        .map_err(TransportError::Io)
                })
                .await?;
            remaining -= want as u64;
        }
        deadline
            .bound(async { sink.flush().await.map_err(TransportError::Io) })
            .await
    }

    /// Copies exactly `length` bytes from `source` onto the link.
    ///
    /// A source that ends early is reported as [`TransportError::Closed`];
    /// the link is left with a short payload on the wire, so the caller must
    /// treat this as fatal for the connection.
    pub async fn stream_from(
        &mut self,
        source: &mut (impl AsyncRead + Unpin),
        length: u64,
        deadline: Deadline,
    ) -> Result<()> {
        let mut remaining = length;
        let mut chunk = vec![0u8; READ_CHUNK];
        while remaining > 0 {
            let want = (remaining as usize).min(chunk.len());
            let got = deadline
                .bound(async {
                    source
                        .read(&mut chunk[..want])
                        .await
                        .map_err(TransportError::Io)
                })
                .await?;
            if got == 0 {
                return Err(TransportError::Closed);
            }
            self.write_all(&chunk[..got], deadline).await?;
            remaining -= got as u64;
        }
        Ok(())
    }

    /// Shuts down the write side and drops the connection.
    pub async fn close(mut self) {
        let _ = self.stream.shutdown().await;
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("peer", &self.peer)
            .field("buffered", &self.rbuf.len())
            .finish()
    }
}

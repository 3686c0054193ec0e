//! Descriptor-scoped I/O and whole-file transfer.
//!
//! Reads and writes are split into begin/finish pairs (see
//! [`crate::pending`]) so callers can overlap local work with server
//! latency; the plain methods are begin-then-finish.

use chirp_proto::{OpenFlags, Request, Stat, MAX_CHUNK};
use chirp_transport::Deadline;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;
use crate::pending::{PendingAck, PendingRead, PendingStat, PendingWrite};
use crate::session::Session;

impl Session {
    /// Opens a remote file, returning the descriptor and its stat record.
    ///
    /// The stat line is part of the same protocol turn as the descriptor;
    /// if it cannot be decoded the whole call is a connection fault even
    /// though the open nominally succeeded.
    pub async fn open(
        &mut self,
        path: &str,
        flags: OpenFlags,
        mode: i64,
        deadline: Deadline,
    ) -> Result<(i64, Stat)> {
        let request = Request::new("open")
            .path(path)
            .arg(flags.mode_string())
            .arg(mode);
        let fd = self.simple_command(request, deadline).await?;
        let stat = self.read_stat(deadline).await?;
        Ok((fd, stat))
    }

    pub async fn close(&mut self, fd: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("close").arg(fd), deadline).await
    }

    /// Sends a positioned read request; the returned token's `finish`
    /// collects the payload.
    pub async fn pread_begin(
        &mut self,
        fd: i64,
        length: u64,
        offset: u64,
        deadline: Deadline,
    ) -> Result<PendingRead<'_>> {
        let request = Request::new("pread").arg(fd).arg(length).arg(offset);
        self.send_command(request, deadline).await?;
        Ok(PendingRead { session: self })
    }

    /// Positioned read into `buf`; returns the byte count.
    pub async fn pread(
        &mut self,
        fd: i64,
        buf: &mut [u8],
        offset: u64,
        deadline: Deadline,
    ) -> Result<u64> {
        let pending = self.pread_begin(fd, buf.len() as u64, offset, deadline).await?;
        pending.finish(buf, deadline).await
    }

    /// Sends a strided read request: `length` bytes total, in strides of
    /// `stride_length` every `stride_skip` bytes starting at `offset`.
    pub async fn sread_begin(
        &mut self,
        fd: i64,
        length: u64,
        stride_length: u64,
        stride_skip: u64,
        offset: u64,
        deadline: Deadline,
    ) -> Result<PendingRead<'_>> {
        let request = Request::new("sread")
            .arg(fd)
            .arg(length)
            .arg(stride_length)
            .arg(stride_skip)
            .arg(offset);
        self.send_command(request, deadline).await?;
        Ok(PendingRead { session: self })
    }

    /// Strided read into `buf`.
    pub async fn sread(
        &mut self,
        fd: i64,
        buf: &mut [u8],
        stride_length: u64,
        stride_skip: u64,
        offset: u64,
        deadline: Deadline,
    ) -> Result<u64> {
        let pending = self
            .sread_begin(fd, buf.len() as u64, stride_length, stride_skip, offset, deadline)
            .await?;
        pending.finish(buf, deadline).await
    }

    /// Sends a positioned write request and its payload.
    ///
    /// The payload is capped to the 16 MiB chunk limit; `sent()` on the
    /// returned token reports what actually went out. Callers split larger
    /// transfers across calls.
    pub async fn pwrite_begin(
        &mut self,
        fd: i64,
        buf: &[u8],
        offset: u64,
        deadline: Deadline,
    ) -> Result<PendingWrite<'_>> {
        let length = (buf.len() as u64).min(MAX_CHUNK);
        let request = Request::new("pwrite").arg(fd).arg(length).arg(offset);
        self.send_command(request, deadline).await?;
        self.write_payload(&buf[..length as usize], deadline).await?;
        Ok(PendingWrite { session: self, sent: length })
    }

    /// Positioned write; returns the acknowledged byte count.
    pub async fn pwrite(
        &mut self,
        fd: i64,
        buf: &[u8],
        offset: u64,
        deadline: Deadline,
    ) -> Result<i64> {
        let pending = self.pwrite_begin(fd, buf, offset, deadline).await?;
        pending.finish(deadline).await
    }

    /// Sends a strided write request and its payload, capped like
    /// [`Session::pwrite_begin`].
    pub async fn swrite_begin(
        &mut self,
        fd: i64,
        buf: &[u8],
        stride_length: u64,
        stride_skip: u64,
        offset: u64,
        deadline: Deadline,
    ) -> Result<PendingWrite<'_>> {
        let length = (buf.len() as u64).min(MAX_CHUNK);
        let request = Request::new("swrite")
            .arg(fd)
            .arg(length)
            .arg(stride_length)
            .arg(stride_skip)
            .arg(offset);
        self.send_command(request, deadline).await?;
        self.write_payload(&buf[..length as usize], deadline).await?;
        Ok(PendingWrite { session: self, sent: length })
    }

    /// Strided write; returns the acknowledged byte count.
    pub async fn swrite(
        &mut self,
        fd: i64,
        buf: &[u8],
        stride_length: u64,
        stride_skip: u64,
        offset: u64,
        deadline: Deadline,
    ) -> Result<i64> {
        let pending = self
            .swrite_begin(fd, buf, stride_length, stride_skip, offset, deadline)
            .await?;
        pending.finish(deadline).await
    }

    pub async fn fchmod(&mut self, fd: i64, mode: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("fchmod").arg(fd).arg(mode), deadline).await
    }

    pub async fn fchown(&mut self, fd: i64, uid: i64, gid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("fchown").arg(fd).arg(uid).arg(gid), deadline)
            .await
    }

    pub async fn ftruncate(&mut self, fd: i64, length: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("ftruncate").arg(fd).arg(length), deadline)
            .await
    }

    pub async fn fstat_begin(&mut self, fd: i64, deadline: Deadline) -> Result<PendingStat<'_>> {
        self.send_command(Request::new("fstat").arg(fd), deadline).await?;
        Ok(PendingStat { session: self })
    }

    pub async fn fstat(&mut self, fd: i64, deadline: Deadline) -> Result<Stat> {
        let pending = self.fstat_begin(fd, deadline).await?;
        pending.finish(deadline).await
    }

    pub async fn fsync_begin(&mut self, fd: i64, deadline: Deadline) -> Result<PendingAck<'_>> {
        self.send_command(Request::new("fsync").arg(fd), deadline).await?;
        Ok(PendingAck { session: self })
    }

    pub async fn fsync(&mut self, fd: i64, deadline: Deadline) -> Result<i64> {
        let pending = self.fsync_begin(fd, deadline).await?;
        pending.finish(deadline).await
    }

    /// Fetches a whole file into `sink`; returns the byte length.
    ///
    /// A transfer that ends short of the announced length breaks the
    /// session.
    pub async fn getfile(
        &mut self,
        path: &str,
        sink: &mut (impl AsyncWrite + Unpin),
        deadline: Deadline,
    ) -> Result<u64> {
        let length = self
            .simple_command(Request::new("getfile").path(path), deadline)
            .await? as u64;
        let link = self.link_mut();
        match link.stream_to(sink, length, deadline).await {
            Ok(()) => Ok(length),
            Err(_) => self.fault(),
        }
    }

    /// Fetches a whole file into a freshly allocated buffer.
    pub async fn getfile_buffer(&mut self, path: &str, deadline: Deadline) -> Result<Vec<u8>> {
        let length = self
            .simple_command(Request::new("getfile").path(path), deadline)
            .await? as usize;
        let mut buffer = vec![0u8; length];
        self.read_payload(&mut buffer, deadline).await?;
        Ok(buffer)
    }

    /// Stores `length` bytes from `source` as a whole file.
    ///
    /// The length is sent up front; a source that cannot supply exactly
    /// that many bytes leaves a short payload on the wire, which is fatal
    /// for the connection and never retried.
    pub async fn putfile(
        &mut self,
        path: &str,
        source: &mut (impl AsyncRead + Unpin),
        mode: i64,
        length: u64,
        deadline: Deadline,
    ) -> Result<i64> {
        let request = Request::new("putfile").path(path).arg(mode).arg(length);
        self.simple_command(request, deadline).await?;
        let link = self.link_mut();
        if link.stream_from(source, length, deadline).await.is_err() {
            return self.fault();
        }
        self.get_result(deadline).await
    }

    /// Stores a whole file from an in-memory buffer.
    pub async fn putfile_buffer(
        &mut self,
        path: &str,
        buf: &[u8],
        mode: i64,
        deadline: Deadline,
    ) -> Result<i64> {
        let request = Request::new("putfile").path(path).arg(mode).arg(buf.len());
        self.simple_command(request, deadline).await?;
        self.write_payload(buf, deadline).await?;
        self.get_result(deadline).await
    }

    /// Opens a best-effort streaming read of a file over the same
    /// connection. No length is framed; the stream runs until the server
    /// closes it.
    pub async fn getstream(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("getstream").path(path), deadline).await
    }

    /// Reads whatever streamed bytes are currently available; 0 means the
    /// server finished the stream.
    pub async fn getstream_read(&mut self, buf: &mut [u8], deadline: Deadline) -> Result<usize> {
        if self.is_broken() {
            return self.fault();
        }
        let link = self.link_mut();
        match link.read_available(buf, deadline).await {
            Ok(n) => Ok(n),
            Err(_) => self.fault(),
        }
    }

    /// Opens a best-effort streaming write to a file.
    pub async fn putstream(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("putstream").path(path), deadline).await
    }

    /// Appends bytes to an open put-stream.
    pub async fn putstream_write(&mut self, data: &[u8], deadline: Deadline) -> Result<usize> {
        self.write_payload(data, deadline).await?;
        Ok(data.len())
    }
}

//! Path-argument operations: namespace, metadata, ACLs, identity, checksum,
//! audit and allocation queries.
//!
//! Most of these are one `simple_command` with percent-encoded path
//! arguments; the remainder add a fixed-field payload line or a raw byte
//! payload whose length is the result value.

use chirp_proto::{AllocInfo, AuditEntry, Request, Stat, Statfs};
use chirp_transport::Deadline;

use crate::error::Result;
use crate::session::Session;

impl Session {
    pub async fn stat(&mut self, path: &str, deadline: Deadline) -> Result<Stat> {
        self.simple_command(Request::new("stat").path(path), deadline).await?;
        self.read_stat(deadline).await
    }

    pub async fn lstat(&mut self, path: &str, deadline: Deadline) -> Result<Stat> {
        self.simple_command(Request::new("lstat").path(path), deadline).await?;
        self.read_stat(deadline).await
    }

    pub async fn statfs(&mut self, path: &str, deadline: Deadline) -> Result<Statfs> {
        self.simple_command(Request::new("statfs").path(path), deadline).await?;
        self.read_statfs(deadline).await
    }

    pub async fn fstatfs(&mut self, fd: i64, deadline: Deadline) -> Result<Statfs> {
        self.simple_command(Request::new("fstatfs").arg(fd), deadline).await?;
        self.read_statfs(deadline).await
    }

    pub async fn access(&mut self, path: &str, mode: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("access").path(path).arg(mode), deadline).await
    }

    pub async fn chmod(&mut self, path: &str, mode: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("chmod").path(path).arg(mode), deadline).await
    }

    pub async fn chown(&mut self, path: &str, uid: i64, gid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("chown").path(path).arg(uid).arg(gid), deadline)
            .await
    }

    /// Like [`Session::chown`] but does not follow a final symlink.
    pub async fn lchown(&mut self, path: &str, uid: i64, gid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("lchown").path(path).arg(uid).arg(gid), deadline)
            .await
    }

    pub async fn truncate(&mut self, path: &str, length: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("truncate").path(path).arg(length), deadline)
            .await
    }

    pub async fn utime(
        &mut self,
        path: &str,
        actime: i64,
        modtime: i64,
        deadline: Deadline,
    ) -> Result<i64> {
        self.simple_command(
            Request::new("utime").path(path).arg(actime).arg(modtime),
            deadline,
        )
        .await
    }

    pub async fn unlink(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("unlink").path(path), deadline).await
    }

    pub async fn rename(&mut self, oldpath: &str, newpath: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("rename").path(oldpath).path(newpath), deadline)
            .await
    }

    pub async fn link(&mut self, oldpath: &str, newpath: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("link").path(oldpath).path(newpath), deadline)
            .await
    }

    pub async fn symlink(&mut self, oldpath: &str, newpath: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("symlink").path(oldpath).path(newpath), deadline)
            .await
    }

    pub async fn mkdir(&mut self, path: &str, mode: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("mkdir").path(path).arg(mode), deadline).await
    }

    pub async fn rmdir(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("rmdir").path(path), deadline).await
    }

    /// Removes a whole subtree.
    pub async fn rmall(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("rmall").path(path), deadline).await
    }

    pub async fn mkfifo(&mut self, path: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("mkfifo").path(path), deadline).await
    }

    /// Reads a symlink target; `max_len` bounds the reply.
    pub async fn readlink(&mut self, path: &str, max_len: u64, deadline: Deadline) -> Result<Vec<u8>> {
        let request = Request::new("readlink").path(path).arg(max_len);
        let length = self.simple_command(request, deadline).await?;
        self.read_counted(length, deadline).await
    }

    /// Asks the server for its local path backing `path`.
    pub async fn localpath(&mut self, path: &str, deadline: Deadline) -> Result<Vec<u8>> {
        let length = self
            .simple_command(Request::new("localpath").path(path), deadline)
            .await?;
        self.read_counted(length, deadline).await
    }

    /// The identity the server sees this session as.
    pub async fn whoami(&mut self, max_len: u64, deadline: Deadline) -> Result<String> {
        let length = self
            .simple_command(Request::new("whoami").arg(max_len), deadline)
            .await?;
        let bytes = self.read_counted(length, deadline).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// The identity the server would see `rhost` as.
    pub async fn whoareyou(&mut self, rhost: &str, max_len: u64, deadline: Deadline) -> Result<String> {
        let request = Request::new("whoareyou").arg(rhost).arg(max_len);
        let length = self.simple_command(request, deadline).await?;
        let bytes = self.read_counted(length, deadline).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Resolves a logical name to a URL.
    pub async fn lookup(&mut self, logical_name: &str, deadline: Deadline) -> Result<Vec<u8>> {
        let length = self
            .simple_command(Request::new("lookup").path(logical_name), deadline)
            .await?;
        self.read_counted(length, deadline).await
    }

    pub async fn setacl(
        &mut self,
        path: &str,
        subject: &str,
        rights: &str,
        deadline: Deadline,
    ) -> Result<i64> {
        self.simple_command(
            Request::new("setacl").path(path).arg(subject).arg(rights),
            deadline,
        )
        .await
    }

    pub async fn resetacl(&mut self, path: &str, rights: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("resetacl").path(path).arg(rights), deadline)
            .await
    }

    /// Third-party transfer of `path` to `newpath` on `hostname`.
    pub async fn thirdput(
        &mut self,
        path: &str,
        hostname: &str,
        newpath: &str,
        deadline: Deadline,
    ) -> Result<i64> {
        self.simple_command(
            Request::new("thirdput").path(path).arg(hostname).path(newpath),
            deadline,
        )
        .await
    }

    /// Presents a connection cookie.
    pub async fn cookie(&mut self, cookie: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("cookie").arg(cookie), deadline).await
    }

    /// Password login.
    pub async fn login(&mut self, name: &str, password: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("login").arg(name).arg(password), deadline)
            .await
    }

    /// MD5 digest of a remote file.
    ///
    /// The result must be exactly the digest length; anything else
    /// non-negative is a protocol fault.
    pub async fn md5(&mut self, path: &str, deadline: Deadline) -> Result<[u8; 16]> {
        let result = self.simple_command(Request::new("md5").path(path), deadline).await?;
        if result != 16 {
            return self.fault();
        }
        let mut digest = [0u8; 16];
        self.read_payload(&mut digest, deadline).await?;
        Ok(digest)
    }

    /// Usage audit of a subtree: one record per owner.
    ///
    /// A short or undecodable record aborts the whole call, discarding the
    /// records collected so far.
    pub async fn audit(&mut self, path: &str, deadline: Deadline) -> Result<Vec<AuditEntry>> {
        let count = self.simple_command(Request::new("audit").path(path), deadline).await?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let line = self.read_payload_line(deadline).await?;
            match AuditEntry::decode(&line) {
                Ok(entry) => entries.push(entry),
                Err(_) => return self.fault(),
            }
        }
        Ok(entries)
    }

    /// Creates a space allocation of `size` bytes at `path`.
    pub async fn mkalloc(&mut self, path: &str, size: i64, mode: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("mkalloc").path(path).arg(size).arg(mode), deadline)
            .await
    }

    /// Queries the allocation containing `path`.
    pub async fn lsalloc(&mut self, path: &str, deadline: Deadline) -> Result<AllocInfo> {
        let result = self.simple_command(Request::new("lsalloc").path(path), deadline).await?;
        if result != 0 {
            return self.fault();
        }
        let line = self.read_payload_line(deadline).await?;
        match AllocInfo::decode(&line) {
            Ok(info) => Ok(info),
            Err(_) => self.fault(),
        }
    }

    /// Reports where `path` lives. Purely local: the location is
    /// synthesized from this session's own host identity and no network
    /// I/O happens (single-server topology).
    pub fn locate(&self, path: &str, mut callback: impl FnMut(&str)) -> u64 {
        let host = self.hostport().split(':').next().unwrap_or_default();
        callback(&format!("{host}:{path}"));
        1
    }

    /// Reads a raw payload of exactly `length` bytes announced by a result
    /// line.
    async fn read_counted(&mut self, length: i64, deadline: Deadline) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; length.max(0) as usize];
        if !buffer.is_empty() {
            self.read_payload(&mut buffer, deadline).await?;
        }
        Ok(buffer)
    }
}

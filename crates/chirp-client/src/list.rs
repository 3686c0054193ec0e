//! Listing protocols: directories and ACLs.
//!
//! One command, then the server streams newline-terminated entries ended by
//! an empty line. Reading past the sentinel is never attempted; a stream
//! close before the sentinel breaks the session.

use chirp_proto::{Request, Stat};
use chirp_transport::Deadline;

use crate::error::Result;
use crate::session::Session;

impl Session {
    /// One step of a listing: the next entry, or `None` at the sentinel.
    pub(crate) async fn read_list_entry(&mut self, deadline: Deadline) -> Result<Option<String>> {
        let line = self.read_payload_line(deadline).await?;
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    /// Starts a directory listing.
    pub async fn opendir(&mut self, path: &str, deadline: Deadline) -> Result<()> {
        self.simple_command(Request::new("getdir").path(path), deadline).await?;
        Ok(())
    }

    /// Next directory entry, or `None` when the listing is exhausted.
    /// Exhaustion does not break the session; only a transport fault does.
    pub async fn readdir(&mut self, deadline: Deadline) -> Result<Option<String>> {
        self.read_list_entry(deadline).await
    }

    /// Lists a directory, invoking `callback` per name.
    pub async fn getdir(
        &mut self,
        path: &str,
        mut callback: impl FnMut(&str),
        deadline: Deadline,
    ) -> Result<()> {
        self.opendir(path, deadline).await?;
        while let Some(name) = self.readdir(deadline).await? {
            callback(&name);
        }
        Ok(())
    }

    /// Lists a directory with a stat record per entry.
    ///
    /// Each name line is followed by a stat line; a stat that fails to
    /// decode is a connection fault.
    pub async fn getlongdir(
        &mut self,
        path: &str,
        mut callback: impl FnMut(&str, &Stat),
        deadline: Deadline,
    ) -> Result<()> {
        self.simple_command(Request::new("getlongdir").path(path), deadline).await?;
        while let Some(name) = self.read_list_entry(deadline).await? {
            let stat = self.read_stat(deadline).await?;
            callback(&name, &stat);
        }
        Ok(())
    }

    /// Starts an ACL listing.
    pub async fn openacl(&mut self, path: &str, deadline: Deadline) -> Result<()> {
        self.simple_command(Request::new("getacl").path(path), deadline).await?;
        Ok(())
    }

    /// Next ACL entry, or `None` when the listing is exhausted.
    pub async fn readacl(&mut self, deadline: Deadline) -> Result<Option<String>> {
        self.read_list_entry(deadline).await
    }

    /// Lists the ACL of `path`, invoking `callback` per entry.
    pub async fn getacl(
        &mut self,
        path: &str,
        mut callback: impl FnMut(&str),
        deadline: Deadline,
    ) -> Result<()> {
        self.openacl(path, deadline).await?;
        while let Some(entry) = self.readacl(deadline).await? {
            callback(&entry);
        }
        Ok(())
    }
}

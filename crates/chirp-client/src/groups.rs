//! Group-based authorization operations.

use chirp_proto::Request;
use chirp_transport::Deadline;

use crate::error::Result;
use crate::session::Session;

impl Session {
    pub async fn group_create(&mut self, group: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("group_create").arg(group), deadline).await
    }

    pub async fn group_add(&mut self, group: &str, user: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("group_add").arg(group).arg(user), deadline)
            .await
    }

    pub async fn group_remove(&mut self, group: &str, user: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("group_remove").arg(group).arg(user), deadline)
            .await
    }

    /// Checks whether `user` is a member of `group`.
    pub async fn group_lookup(&mut self, group: &str, user: &str, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("group_lookup").arg(group).arg(user), deadline)
            .await
    }

    /// Lists the members of `group`, invoking `callback` per member.
    pub async fn group_list(
        &mut self,
        group: &str,
        mut callback: impl FnMut(&str),
        deadline: Deadline,
    ) -> Result<()> {
        self.simple_command(Request::new("group_list").arg(group), deadline).await?;
        while let Some(member) = self.read_list_entry(deadline).await? {
            callback(&member);
        }
        Ok(())
    }
}

//! Remote job submission and monitoring.

use chirp_proto::{JobState, Request};
use chirp_transport::Deadline;

use crate::error::Result;
use crate::session::Session;

impl Session {
    /// Submits a job; returns the job id.
    ///
    /// The stdio paths are percent-encoded; the command line rides as the
    /// raw trailing argument.
    pub async fn job_begin(
        &mut self,
        cwd: &str,
        infile: &str,
        outfile: &str,
        errfile: &str,
        cmdline: &str,
        deadline: Deadline,
    ) -> Result<i64> {
        let request = Request::new("job_begin")
            .arg(cwd)
            .path(infile)
            .path(outfile)
            .path(errfile)
            .trailing(cmdline);
        self.simple_command(request, deadline).await
    }

    pub async fn job_commit(&mut self, jobid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("job_commit").arg(jobid), deadline).await
    }

    pub async fn job_kill(&mut self, jobid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("job_kill").arg(jobid), deadline).await
    }

    pub async fn job_remove(&mut self, jobid: i64, deadline: Deadline) -> Result<i64> {
        self.simple_command(Request::new("job_remove").arg(jobid), deadline).await
    }

    /// Waits up to `wait_time` seconds server-side for a state change, then
    /// returns the job's decoded state.
    ///
    /// A malformed status line is a connection fault regardless of the
    /// command-level result.
    pub async fn job_wait(
        &mut self,
        jobid: i64,
        wait_time: u64,
        deadline: Deadline,
    ) -> Result<JobState> {
        let request = Request::new("job_wait").arg(jobid).arg(wait_time);
        self.simple_command(request, deadline).await?;
        let line = self.read_payload_line(deadline).await?;
        match JobState::decode(&line) {
            Ok(state) => Ok(state),
            Err(_) => self.fault(),
        }
    }

    /// Lists all jobs visible to this session, invoking `callback` per job.
    ///
    /// Any line that fails to decode aborts the whole call as a connection
    /// fault.
    pub async fn job_list(
        &mut self,
        mut callback: impl FnMut(&JobState),
        deadline: Deadline,
    ) -> Result<()> {
        self.simple_command(Request::new("job_list"), deadline).await?;
        while let Some(line) = self.read_list_entry(deadline).await? {
            match JobState::decode(&line) {
                Ok(state) => callback(&state),
                Err(_) => return self.fault(),
            }
        }
        Ok(())
    }
}

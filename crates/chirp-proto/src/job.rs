//! Job state line decoder.
//!
//! A job state line carries nine space-delimited fields. The state ordinal
//! is an opaque wire value interpreted by the caller; no semantic validation
//! happens here.

use crate::errors::DecodeError;

/// Decoded remote job status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobState {
    pub jobid: i64,
    pub command: String,
    pub owner: String,
    /// Opaque state ordinal.
    pub state: i64,
    pub exit_code: i64,
    pub submit_time: i64,
    pub start_time: i64,
    pub stop_time: i64,
    pub pid: i64,
}

impl JobState {
    /// Decodes a 9-field job state line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 9 {
            return Err(DecodeError::FieldCount {
                expected: 9,
                got: tokens.len(),
            });
        }
        let int = |index: usize| -> Result<i64, DecodeError> {
            tokens[index].parse().map_err(|_| DecodeError::BadInteger {
                index,
                token: tokens[index].to_string(),
            })
        };
        Ok(Self {
            jobid: int(0)?,
            command: tokens[1].to_string(),
            owner: tokens[2].to_string(),
            state: int(3)?,
            exit_code: int(4)?,
            submit_time: int(5)?,
            start_time: int(6)?,
            stop_time: int(7)?,
            pid: int(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_decode() {
        let job = JobState::decode("42 /bin/sort alice 2 0 1700000000 1700000010 0 8812").unwrap();
        assert_eq!(job.jobid, 42);
        assert_eq!(job.command, "/bin/sort");
        assert_eq!(job.owner, "alice");
        assert_eq!(job.state, 2);
        assert_eq!(job.exit_code, 0);
        assert_eq!(job.pid, 8812);
    }

    #[test]
    fn test_job_state_too_few_fields() {
        assert!(matches!(
            JobState::decode("42 /bin/sort alice 2"),
            Err(DecodeError::FieldCount { expected: 9, got: 4 })
        ));
    }

    #[test]
    fn test_job_state_opaque_ordinal_not_validated() {
        let job = JobState::decode("1 c o 9999 0 0 0 0 0").unwrap();
        assert_eq!(job.state, 9999);
    }
}

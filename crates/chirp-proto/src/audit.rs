//! Audit and allocation record decoders.

use crate::errors::DecodeError;

/// Per-subtree usage summary returned by an audit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditEntry {
    pub name: String,
    pub nfiles: i64,
    pub ndirs: i64,
    pub nbytes: i64,
}

impl AuditEntry {
    /// Decodes a `name nfiles ndirs nbytes` line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 4 {
            return Err(DecodeError::FieldCount {
                expected: 4,
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
            name: tokens[0].to_string(),
            nfiles: int(1)?,
            ndirs: int(2)?,
            nbytes: int(3)?,
        })
    }
}

/// Space allocation state for a directory subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocInfo {
    /// Root path of the allocation.
    pub path: String,
    pub total: i64,
    pub inuse: i64,
}

impl AllocInfo {
    /// Decodes a `path total inuse` line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(DecodeError::FieldCount {
                expected: 3,
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
            path: tokens[0].to_string(),
            total: int(1)?,
            inuse: int(2)?,
        })
    }
}

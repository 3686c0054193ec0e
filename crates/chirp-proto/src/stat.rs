//! Fixed-field stat and statfs line decoders.

use crate::errors::DecodeError;

pub(crate) fn parse_fields<const N: usize>(line: &str) -> Result<[i64; N], DecodeError> {
    let mut out = [0i64; N];
    let mut count = 0;
    for (index, token) in line.split_whitespace().enumerate() {
        if index >= N {
            count = index + 1;
            continue;
        }
        out[index] = token.parse().map_err(|_| DecodeError::BadInteger {
            index,
            token: token.to_string(),
        })?;
        count = index + 1;
    }
    if count != N {
        return Err(DecodeError::FieldCount {
            expected: N,
            got: count,
        });
    }
    Ok(out)
}

/// Decoded metadata snapshot, analogous to POSIX `stat`.
///
/// The server's device numbers are not locally meaningful: `dev` is always
/// normalized to -1 and `rdev` to 0 after decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub dev: i64,
    pub ino: i64,
    pub mode: i64,
    pub nlink: i64,
    pub uid: i64,
    pub gid: i64,
    pub rdev: i64,
    pub size: i64,
    pub blksize: i64,
    pub blocks: i64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

impl Stat {
    /// Decodes a 13-field stat line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let f = parse_fields::<13>(line)?;
        Ok(Self {
            dev: -1,
            ino: f[1],
            mode: f[2],
            nlink: f[3],
            uid: f[4],
            gid: f[5],
            rdev: 0,
            size: f[7],
            blksize: f[8],
            blocks: f[9],
            atime: f[10],
            mtime: f[11],
            ctime: f[12],
        })
    }
}

/// Decoded filesystem metadata, analogous to POSIX `statvfs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statfs {
    pub fstype: i64,
    pub bsize: i64,
    pub blocks: i64,
    pub bfree: i64,
    pub bavail: i64,
    pub files: i64,
    pub ffree: i64,
}

impl Statfs {
    /// Decodes a 7-field statfs line.
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let f = parse_fields::<7>(line)?;
        Ok(Self {
            fstype: f[0],
            bsize: f[1],
            blocks: f[2],
            bfree: f[3],
            bavail: f[4],
            files: f[5],
            ffree: f[6],
        })
    }
}

//! Open flags and their canonical wire mode string.
//!
//! The `open` request carries the access mode as a short letter string: a
//! base of `r`, `w`, or `rw`, then optional `c` (create), `t` (truncate),
//! `a` (append), `x` (exclusive), and `s` (sync) modifiers in that fixed
//! order.

/// Base access mode of an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Read,
    Write,
    ReadWrite,
}

/// Flags carried by an open request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub access: Access,
    pub create: bool,
    pub truncate: bool,
    pub append: bool,
    pub exclusive: bool,
    pub sync: bool,
}

impl OpenFlags {
    pub fn read() -> Self {
        Self::default()
    }

    pub fn write() -> Self {
        Self {
            access: Access::Write,
            ..Self::default()
        }
    }

    pub fn read_write() -> Self {
        Self {
            access: Access::ReadWrite,
            ..Self::default()
        }
    }

    pub fn create(mut self) -> Self {
        self.create = true;
        self
    }

    pub fn truncate(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn sync(mut self) -> Self {
        self.sync = true;
        self
    }

    /// Canonical wire mode string.
    pub fn mode_string(&self) -> String {
        let mut s = String::with_capacity(7);
        s.push_str(match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::ReadWrite => "rw",
        });
        if self.create {
            s.push('c');
        }
        if self.truncate {
            s.push('t');
        }
        if self.append {
            s.push('a');
        }
        if self.exclusive {
            s.push('x');
        }
        if self.sync {
            s.push('s');
        }
        s
    }
}

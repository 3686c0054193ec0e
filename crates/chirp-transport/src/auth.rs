//! Authentication handshake boundary.
//!
//! The handshake itself is delegated: the session layer hands a freshly
//! connected link to a negotiator and either gets back the negotiated
//! identity or tears the connection down.

use async_trait::async_trait;

use crate::deadline::Deadline;
use crate::error::Result;
use crate::link::Link;

/// Identity established by a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdent {
    /// Mechanism name, e.g. `hostname` or `password`.
    pub auth_type: String,
    /// Authenticated subject.
    pub subject: String,
}

/// Performs the authentication handshake on a fresh link.
#[async_trait]
pub trait AuthNegotiator: Send + Sync {
    async fn assert(&self, link: &mut Link, deadline: Deadline) -> Result<AuthIdent>;
}

//! Chirp transport link: a reliable ordered byte stream with
//! deadline-bounded primitives, plus the name resolution and authentication
//! boundaries the session layer delegates to.

pub mod auth;
pub mod deadline;
pub mod error;
pub mod link;
pub mod resolver;

pub use auth::{AuthIdent, AuthNegotiator};
pub use deadline::Deadline;
pub use error::{Result, TransportError};
pub use link::{Link, TuneProfile};
pub use resolver::{DnsResolver, NameResolver};

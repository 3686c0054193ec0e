//! Connection establishment.
//!
//! The [`Connector`] owns the pieces a session cannot: the name resolver,
//! the optional authentication negotiator, and the process-wide serial
//! counter for new sessions.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chirp_proto::CHIRP_PORT;
use chirp_transport::{
    AuthNegotiator, Deadline, DnsResolver, Link, NameResolver, TransportError, TuneProfile,
};

use crate::error::{ChirpError, Result};
use crate::session::Session;

/// Splits `host[:port]`, defaulting the port.
fn split_hostport(hostport: &str) -> Result<(&str, u16)> {
    match hostport.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| ChirpError::Config(format!("invalid port in {hostport:?}")))?;
            Ok((host, port))
        }
        None => Ok((hostport, CHIRP_PORT)),
    }
}

/// Factory for [`Session`]s.
pub struct Connector {
    resolver: Arc<dyn NameResolver>,
    auth: Option<Arc<dyn AuthNegotiator>>,
    serial: AtomicU64,
}

impl Connector {
    /// A connector using the system DNS resolver and no auth negotiator.
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(DnsResolver),
            auth: None,
            serial: AtomicU64::new(1),
        }
    }

    /// Replaces the name resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Installs an authentication negotiator used when a connect asks for
    /// the handshake.
    pub fn with_auth(mut self, auth: Arc<dyn AuthNegotiator>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Connects to `host[:port]` under `deadline`.
    ///
    /// With `negotiate_auth`, the installed negotiator runs on the fresh
    /// link; on handshake failure the half-built session is released and
    /// the error is [`ChirpError::Timeout`] if the deadline has passed,
    /// otherwise [`ChirpError::AuthDenied`].
    pub async fn connect(
        &self,
        hostport: &str,
        negotiate_auth: bool,
        deadline: Deadline,
    ) -> Result<Session> {
        let (host, port) = split_hostport(hostport)?;
        let addr = self
            .resolver
            .lookup(host)
            .await
            .map_err(|_| ChirpError::ResolveFailed(host.to_string()))?;

        let link = Link::connect(addr, port, deadline).await.map_err(|e| match e {
            TransportError::DeadlineExpired => ChirpError::Timeout,
            TransportError::Io(io) => ChirpError::Io(io),
            other => ChirpError::Io(std::io::Error::other(other)),
        })?;
        link.tune(TuneProfile::Interactive)
            .map_err(|e| ChirpError::Io(std::io::Error::other(e)))?;

        let mut link = link;
        if negotiate_auth {
            let negotiator = self
                .auth
                .as_ref()
                .ok_or_else(|| ChirpError::Config("no auth negotiator installed".to_string()))?;
            match negotiator.assert(&mut link, deadline).await {
                Ok(ident) => {
                    tracing::debug!(auth_type = %ident.auth_type, subject = %ident.subject, "authenticated");
                }
                Err(_) => {
                    link.close().await;
                    return Err(if deadline.is_expired() {
                        ChirpError::Timeout
                    } else {
                        ChirpError::AuthDenied
                    });
                }
            }
        }

        let serial = self.serial.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(host = hostport, serial, "session established");
        Ok(Session::new(link, hostport.to_string(), serial))
    }

    /// Convenience connect from the local `chirp.config` record in the
    /// working directory: `<host> <port> <cookie>`, then cookie
    /// authentication.
    pub async fn connect_from_config(&self, deadline: Deadline) -> Result<Session> {
        self.connect_from_config_path("chirp.config", deadline).await
    }

    /// As [`Connector::connect_from_config`], with an explicit record path.
    ///
    /// A rejected cookie disconnects the half-built session before the
    /// error is returned.
    pub async fn connect_from_config_path(
        &self,
        path: impl AsRef<Path>,
        deadline: Deadline,
    ) -> Result<Session> {
        let text = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| ChirpError::Config(format!("cannot read {:?}: {e}", path.as_ref())))?;

        let mut fields = text.split_whitespace();
        let (host, port, cookie) = match (fields.next(), fields.next(), fields.next()) {
            (Some(host), Some(port), Some(cookie)) => (host, port, cookie),
            _ => return Err(ChirpError::Config("malformed chirp.config record".to_string())),
        };
        let port: u16 = port
            .parse()
            .map_err(|_| ChirpError::Config(format!("invalid port {port:?} in chirp.config")))?;

        let mut session = self.connect(&format!("{host}:{port}"), false, deadline).await?;
        if let Err(e) = session.cookie(cookie, deadline).await {
            session.disconnect().await;
            return Err(e);
        }
        Ok(session)
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new()
    }
}

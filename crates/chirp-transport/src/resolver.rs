//! Hostname resolution boundary.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::{Result, TransportError};

/// Resolves a hostname to one address.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<IpAddr>;
}

/// System resolver backed by the runtime's DNS lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

#[async_trait]
impl NameResolver for DnsResolver {
    async fn lookup(&self, host: &str) -> Result<IpAddr> {
        if let Ok(addr) = host.parse::<IpAddr>() {
            return Ok(addr);
        }
        let mut addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|_| TransportError::Resolve {
                host: host.to_string(),
            })?;
        addrs
            .next()
            .map(|sock| sock.ip())
            .ok_or_else(|| TransportError::Resolve {
                host: host.to_string(),
            })
    }
}

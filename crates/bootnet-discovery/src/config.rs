//! Listener configuration.
//!
//! NAT mode and restriction list are kept in their textual form and parsed
//! when the listener starts, so a bad value fails the start like a bind
//! error does.

use crate::domain::DEFAULT_BUCKET_SIZE;
use std::net::{Ipv4Addr, SocketAddr};

/// Default discovery port.
pub const DEFAULT_DISCOVERY_PORT: u16 = 30301;

/// Discovery listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    /// UDP address to bind
    pub listen_addr: SocketAddr,
    /// NAT mechanism, e.g. `none` or `extip:203.0.113.7`
    pub nat: String,
    /// Comma-separated CIDR allow-list; empty means unrestricted
    pub restrict: String,
    /// Routing table bucket capacity
    pub bucket_size: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_DISCOVERY_PORT)),
            nat: "none".to_string(),
            restrict: String::new(),
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl ListenConfig {
    /// Default settings bound to `listen_addr`.
    pub fn with_addr(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Self::default()
        }
    }
}

//! Node record: the self-descriptor a boot node hands out.
//!
//! Rendered as an `enode://` URL:
//!
//! ```text
//! enode://<128 hex pubkey>@<ip>:<tcp port>[?discport=<udp port>]
//! ```

use super::errors::RecordError;
use super::node_id::NodeId;
use bootnet_crypto::PublicKey;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Reachable identity of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRecord {
    /// Uncompressed secp256k1 public key
    pub pubkey: PublicKey,
    /// Advertised IP
    pub ip: IpAddr,
    /// UDP port for discovery
    pub udp_port: u16,
    /// TCP port for the wire protocol
    pub tcp_port: u16,
}

impl NodeRecord {
    /// Record whose TCP and UDP ports are both `addr.port()`.
    pub fn new(pubkey: PublicKey, addr: SocketAddr) -> Self {
        Self {
            pubkey,
            ip: addr.ip(),
            udp_port: addr.port(),
            tcp_port: addr.port(),
        }
    }

    /// Node id derived from the public key.
    pub fn node_id(&self) -> NodeId {
        NodeId::from_public_key(&self.pubkey)
    }

    /// Discovery endpoint.
    pub fn udp_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.udp_port)
    }

    /// Same record with a wildcard IP replaced by `127.0.0.1`.
    pub fn with_loopback(&self) -> Self {
        let mut record = *self;
        if record.ip.is_unspecified() {
            record.ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        }
        record
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enode://{}@{}",
            hex::encode(self.pubkey.as_bytes()),
            SocketAddr::new(self.ip, self.tcp_port)
        )?;
        if self.udp_port != self.tcp_port {
            write!(f, "?discport={}", self.udp_port)?;
        }
        Ok(())
    }
}

impl FromStr for NodeRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("enode://").ok_or(RecordError::Scheme)?;
        let (id_hex, endpoint) = rest
            .split_once('@')
            .ok_or_else(|| RecordError::Address(rest.to_string()))?;

        if id_hex.len() != 128 {
            return Err(RecordError::PublicKey);
        }
        let mut raw = [0u8; 64];
        hex::decode_to_slice(id_hex, &mut raw).map_err(|_| RecordError::PublicKey)?;
        let pubkey = PublicKey::from_bytes(raw).map_err(|_| RecordError::PublicKey)?;

        let (host_port, query) = match endpoint.split_once('?') {
            Some((hp, q)) => (hp, Some(q)),
            None => (endpoint, None),
        };
        let addr: SocketAddr = host_port
            .parse()
            .map_err(|_| RecordError::Address(host_port.to_string()))?;

        let mut record = Self::new(pubkey, addr);
        if let Some(query) = query {
            for pair in query.split('&') {
                if let Some(value) = pair.strip_prefix("discport=") {
                    record.udp_port = value.parse().map_err(|_| RecordError::DiscPort)?;
                }
            }
        }
        Ok(record)
    }
}

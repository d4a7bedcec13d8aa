//! Domain errors for discovery.

use thiserror::Error;

/// Listener startup errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// UDP bind failed (port in use, permission denied, ...)
    #[error("could not bind UDP socket on {addr}: {source}")]
    Bind {
        /// Requested listen address
        addr: std::net::SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Bound socket did not report its local address
    #[error("could not read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// NAT mode could not be parsed
    #[error(transparent)]
    Nat(#[from] NatError),

    /// Restriction list could not be parsed
    #[error(transparent)]
    Netlist(#[from] NetlistError),
}

/// NAT mode parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NatError {
    /// Mechanism name not recognised
    #[error("unknown NAT mechanism {0:?}")]
    Unknown(String),

    /// Recognised but port mapping is not available here
    #[error("NAT mechanism {0:?} is not supported; use \"none\" or \"extip:<IP>\"")]
    Unsupported(String),

    /// `extip` given without a usable address
    #[error("missing or invalid IP address in {0:?}")]
    InvalidIp(String),
}

/// Netlist parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetlistError {
    /// Entry is not `<ip>/<prefix>`
    #[error("invalid CIDR mask {0:?}")]
    InvalidMask(String),

    /// Prefix longer than the address
    #[error("prefix /{prefix} too long for {mask:?}")]
    PrefixTooLong {
        /// Offending entry
        mask: String,
        /// Parsed prefix length
        prefix: u8,
    },
}

/// `enode://` URL parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Missing `enode://` scheme
    #[error("invalid URL scheme, want \"enode\"")]
    Scheme,

    /// Node id is not 128 hex characters of a curve point
    #[error("invalid public key in node URL")]
    PublicKey,

    /// Host/port section malformed
    #[error("invalid host or port in node URL: {0}")]
    Address(String),

    /// `discport` query parameter malformed
    #[error("invalid discport in query")]
    DiscPort,
}

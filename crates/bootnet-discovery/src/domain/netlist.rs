//! CIDR allow-lists for restricting which peers the listener talks to.

use super::errors::NetlistError;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// One `<ip>/<prefix>` network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    /// Network address
    pub addr: IpAddr,
    /// Prefix length in bits
    pub prefix: u8,
}

impl Cidr {
    /// Whether `ip` is inside this network.
    ///
    /// IPv4-mapped IPv6 addresses are matched against IPv4 networks.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip.to_canonical()) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                prefix_matches(&net.octets(), &ip.octets(), self.prefix, 4)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                prefix_matches(&net.octets(), &ip.octets(), self.prefix, 16)
            }
            _ => false,
        }
    }
}

impl FromStr for Cidr {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, prefix) = s
            .split_once('/')
            .ok_or_else(|| NetlistError::InvalidMask(s.to_string()))?;
        let addr: IpAddr = ip
            .parse()
            .map_err(|_| NetlistError::InvalidMask(s.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| NetlistError::InvalidMask(s.to_string()))?;

        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(NetlistError::PrefixTooLong {
                mask: s.to_string(),
                prefix,
            });
        }
        Ok(Self { addr, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// Compare the first `prefix_bits` bits of two addresses.
fn prefix_matches(a: &[u8], b: &[u8], prefix_bits: u8, max_bytes: usize) -> bool {
    let prefix_bytes = (prefix_bits / 8) as usize;
    let remaining_bits = prefix_bits % 8;

    if a[..prefix_bytes.min(max_bytes)] != b[..prefix_bytes.min(max_bytes)] {
        return false;
    }

    if remaining_bits > 0 && prefix_bytes < max_bytes {
        let mask_byte = 0xFFu8 << (8 - remaining_bits);
        return (a[prefix_bytes] & mask_byte) == (b[prefix_bytes] & mask_byte);
    }

    true
}

/// List of networks. An address is allowed if any entry contains it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netlist(Vec<Cidr>);

impl Netlist {
    /// Parse a comma-separated list. Whitespace around entries is ignored.
    pub fn parse(s: &str) -> Result<Self, NetlistError> {
        s.split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Whether `ip` is in any listed network.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.iter().any(|c| c.contains(ip))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Netlist {
    type Err = NetlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cidr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", cidr)?;
        }
        Ok(())
    }
}

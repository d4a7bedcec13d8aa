//! NAT traversal mode.
//!
//! Only static address advertisement is implemented. The port-mapping
//! mechanisms are recognised so that a misconfiguration gets a precise error
//! instead of "unknown".
//!
//! | Input | Result |
//! |-------|--------|
//! | `""`, `none`, `off` | [`NatMode::None`] |
//! | `extip:<IP>` | [`NatMode::ExtIp`] |
//! | `any`, `upnp`, `pmp`, `natpmp`, `stun` | [`NatError::Unsupported`] |

use super::errors::NatError;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// How the listener learns its externally reachable address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NatMode {
    /// Advertise the bound address as-is
    #[default]
    None,
    /// Advertise a fixed external IP
    ExtIp(IpAddr),
}

impl NatMode {
    /// Parse a mode string, case-insensitive on the mechanism name.
    pub fn parse(input: &str) -> Result<Self, NatError> {
        let (mech, arg) = match input.split_once(':') {
            Some((m, a)) => (m, Some(a)),
            None => (input, None),
        };

        match mech.to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(NatMode::None),
            "extip" | "ip" => {
                let ip = arg
                    .and_then(|a| a.parse::<IpAddr>().ok())
                    .ok_or_else(|| NatError::InvalidIp(input.to_string()))?;
                Ok(NatMode::ExtIp(ip))
            }
            "any" | "auto" | "upnp" | "pmp" | "natpmp" | "nat-pmp" | "stun" => {
                Err(NatError::Unsupported(mech.to_string()))
            }
            _ => Err(NatError::Unknown(mech.to_string())),
        }
    }

    /// Externally reachable IP, if one is configured.
    pub fn external_ip(&self) -> Option<IpAddr> {
        match self {
            NatMode::None => None,
            NatMode::ExtIp(ip) => Some(*ip),
        }
    }
}

impl FromStr for NatMode {
    type Err = NatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatMode::None => f.write_str("none"),
            NatMode::ExtIp(ip) => write!(f, "extip:{}", ip),
        }
    }
}

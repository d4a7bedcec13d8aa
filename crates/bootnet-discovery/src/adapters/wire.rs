//! Datagram codec.
//!
//! # Wire Protocol
//!
//! Every datagram starts with a one-byte message type and the sender's
//! 32-byte node id:
//!
//! - PING (0x01): body = sender public key (64 bytes)
//! - PONG (0x02): empty body
//! - FIND_NODE (0x03): body = target node id (32 bytes)
//! - NODES (0x04): body = count (1 byte), then per node
//!   `[pubkey 64][family 1][ip 4|16][udp port 2, big-endian]`

use crate::domain::{NodeId, NodeRecord};
use bootnet_crypto::PublicKey;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// Upper bound for any datagram we send or accept.
pub const MAX_PACKET_SIZE: usize = 1280;

/// Nodes per NODES reply. Keeps IPv6 replies under [`MAX_PACKET_SIZE`].
pub const MAX_NODES_PER_PACKET: usize = 12;

const HEADER_LEN: usize = 1 + 32;

/// Discovery message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Liveness probe carrying the sender's public key.
    Ping = 0x01,
    /// Reply to a PING.
    Pong = 0x02,
    /// Request for nodes close to a target id.
    FindNode = 0x03,
    /// Reply to FIND_NODE.
    Nodes = 0x04,
}

impl TryFrom<u8> for MessageType {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(MessageType::Ping),
            0x02 => Ok(MessageType::Pong),
            0x03 => Ok(MessageType::FindNode),
            0x04 => Ok(MessageType::Nodes),
            other => Err(WireError::UnknownType(other)),
        }
    }
}

/// Decoding failures. All of them cause the datagram to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("datagram too short: {0} bytes")]
    TooShort(usize),
    #[error("datagram too large: {0} bytes")]
    TooLarge(usize),
    #[error("unknown message type 0x{0:02x}")]
    UnknownType(u8),
    #[error("unexpected body length {actual} for {kind:?}")]
    BodyLength { kind: MessageType, actual: usize },
    #[error("public key is not a curve point")]
    InvalidPublicKey,
    #[error("unknown address family {0}")]
    AddressFamily(u8),
    #[error("too many nodes: {0}")]
    TooManyNodes(usize),
}

/// Decoded datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Ping { sender: NodeId, pubkey: PublicKey },
    Pong { sender: NodeId },
    FindNode { sender: NodeId, target: NodeId },
    Nodes { sender: NodeId, nodes: Vec<NodeRecord> },
}

impl Packet {
    pub fn message_type(&self) -> MessageType {
        match self {
            Packet::Ping { .. } => MessageType::Ping,
            Packet::Pong { .. } => MessageType::Pong,
            Packet::FindNode { .. } => MessageType::FindNode,
            Packet::Nodes { .. } => MessageType::Nodes,
        }
    }

    /// Node id in the datagram header.
    pub fn sender(&self) -> &NodeId {
        match self {
            Packet::Ping { sender, .. }
            | Packet::Pong { sender }
            | Packet::FindNode { sender, .. }
            | Packet::Nodes { sender, .. } => sender,
        }
    }

    /// Serialize. NODES lists are truncated to [`MAX_NODES_PER_PACKET`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + 64);
        out.push(self.message_type() as u8);
        out.extend_from_slice(self.sender().as_bytes());

        match self {
            Packet::Ping { pubkey, .. } => out.extend_from_slice(pubkey.as_bytes()),
            Packet::Pong { .. } => {}
            Packet::FindNode { target, .. } => out.extend_from_slice(target.as_bytes()),
            Packet::Nodes { nodes, .. } => {
                let nodes = &nodes[..nodes.len().min(MAX_NODES_PER_PACKET)];
                out.push(nodes.len() as u8);
                for node in nodes {
                    out.extend_from_slice(node.pubkey.as_bytes());
                    match node.ip {
                        IpAddr::V4(ip) => {
                            out.push(4);
                            out.extend_from_slice(&ip.octets());
                        }
                        IpAddr::V6(ip) => {
                            out.push(6);
                            out.extend_from_slice(&ip.octets());
                        }
                    }
                    out.extend_from_slice(&node.udp_port.to_be_bytes());
                }
            }
        }
        out
    }

    /// Parse a datagram.
    pub fn decode(data: &[u8]) -> Result<Self, WireError> {
        if data.len() > MAX_PACKET_SIZE {
            return Err(WireError::TooLarge(data.len()));
        }
        if data.len() < HEADER_LEN {
            return Err(WireError::TooShort(data.len()));
        }

        let kind = MessageType::try_from(data[0])?;
        let sender = NodeId::new(read_array(&data[1..HEADER_LEN]));
        let body = &data[HEADER_LEN..];
        let bad_length = || WireError::BodyLength {
            kind,
            actual: body.len(),
        };

        match kind {
            MessageType::Ping => {
                if body.len() != 64 {
                    return Err(bad_length());
                }
                let pubkey = parse_pubkey(body)?;
                Ok(Packet::Ping { sender, pubkey })
            }
            MessageType::Pong => {
                if !body.is_empty() {
                    return Err(bad_length());
                }
                Ok(Packet::Pong { sender })
            }
            MessageType::FindNode => {
                if body.len() != 32 {
                    return Err(bad_length());
                }
                Ok(Packet::FindNode {
                    sender,
                    target: NodeId::new(read_array(body)),
                })
            }
            MessageType::Nodes => {
                let (&count, mut rest) = body.split_first().ok_or_else(bad_length)?;
                let count = count as usize;
                if count > MAX_NODES_PER_PACKET {
                    return Err(WireError::TooManyNodes(count));
                }

                let mut nodes = Vec::with_capacity(count);
                for _ in 0..count {
                    let (node, remaining) = decode_node(rest).ok_or_else(bad_length)??;
                    nodes.push(node);
                    rest = remaining;
                }
                if !rest.is_empty() {
                    return Err(bad_length());
                }
                Ok(Packet::Nodes { sender, nodes })
            }
        }
    }
}

/// Decode one NODES entry. `None` means the buffer ran out.
fn decode_node(buf: &[u8]) -> Option<Result<(NodeRecord, &[u8]), WireError>> {
    if buf.len() < 65 {
        return None;
    }
    let pubkey = match parse_pubkey(&buf[..64]) {
        Ok(pk) => pk,
        Err(e) => return Some(Err(e)),
    };

    let ip_len = match buf[64] {
        4 => 4,
        6 => 16,
        other => return Some(Err(WireError::AddressFamily(other))),
    };
    let rest = &buf[65..];
    if rest.len() < ip_len + 2 {
        return None;
    }

    let ip = if ip_len == 4 {
        IpAddr::V4(Ipv4Addr::from(read_array::<4>(&rest[..4])))
    } else {
        IpAddr::V6(Ipv6Addr::from(read_array::<16>(&rest[..16])))
    };
    let port = u16::from_be_bytes([rest[ip_len], rest[ip_len + 1]]);

    let record = NodeRecord::new(pubkey, (ip, port).into());
    Some(Ok((record, &rest[ip_len + 2..])))
}

fn parse_pubkey(bytes: &[u8]) -> Result<PublicKey, WireError> {
    PublicKey::from_bytes(read_array(bytes)).map_err(|_| WireError::InvalidPublicKey)
}

/// Copy a slice already known to be `N` bytes long.
fn read_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootnet_crypto::NodeKey;
    use std::net::SocketAddr;

    fn record(addr: &str) -> NodeRecord {
        let addr: SocketAddr = addr.parse().unwrap();
        NodeRecord::new(NodeKey::generate().public_key(), addr)
    }

    fn sender() -> (NodeId, PublicKey) {
        let pk = NodeKey::generate().public_key();
        (NodeId::from_public_key(&pk), pk)
    }

    #[test]
    fn test_ping_layout() {
        let (id, pubkey) = sender();
        let bytes = Packet::Ping { sender: id, pubkey }.encode();

        assert_eq!(bytes.len(), 1 + 32 + 64);
        assert_eq!(bytes[0], MessageType::Ping as u8);
        assert_eq!(&bytes[1..33], id.as_bytes());
        assert_eq!(&bytes[33..], pubkey.as_bytes());
        assert_eq!(
            Packet::decode(&bytes),
            Ok(Packet::Ping { sender: id, pubkey })
        );
    }

    #[test]
    fn test_nodes_mixed_families() {
        let (id, _) = sender();
        let nodes = vec![record("10.1.2.3:30301"), record("[fd00::7]:30305")];
        let packet = Packet::Nodes {
            sender: id,
            nodes: nodes.clone(),
        };

        let bytes = packet.encode();
        assert_eq!(bytes.len(), 33 + 1 + (64 + 1 + 4 + 2) + (64 + 1 + 16 + 2));
        assert_eq!(Packet::decode(&bytes), Ok(packet));
    }

    #[test]
    fn test_nodes_truncated_on_encode() {
        let (id, _) = sender();
        let nodes: Vec<_> = (0..20)
            .map(|i| record(&format!("[fd00::{}]:30301", i + 1)))
            .collect();
        let bytes = Packet::Nodes { sender: id, nodes }.encode();

        assert_eq!(bytes[33] as usize, MAX_NODES_PER_PACKET);
        assert!(bytes.len() <= MAX_PACKET_SIZE);
        match Packet::decode(&bytes).unwrap() {
            Packet::Nodes { nodes, .. } => assert_eq!(nodes.len(), MAX_NODES_PER_PACKET),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_short_and_unknown() {
        assert_eq!(Packet::decode(&[0x01; 10]), Err(WireError::TooShort(10)));

        let mut bytes = vec![0x09];
        bytes.extend_from_slice(&[0u8; 32]);
        assert_eq!(Packet::decode(&bytes), Err(WireError::UnknownType(0x09)));
    }

    #[test]
    fn test_rejects_bad_body_lengths() {
        let (id, _) = sender();
        let mut pong = Packet::Pong { sender: id }.encode();
        pong.push(0);
        assert!(matches!(
            Packet::decode(&pong),
            Err(WireError::BodyLength { kind: MessageType::Pong, actual: 1 })
        ));

        let mut find = Packet::FindNode {
            sender: id,
            target: id,
        }
        .encode();
        find.pop();
        assert!(matches!(
            Packet::decode(&find),
            Err(WireError::BodyLength { kind: MessageType::FindNode, .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_pubkey() {
        let mut bytes = vec![MessageType::Ping as u8];
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(Packet::decode(&bytes), Err(WireError::InvalidPublicKey));
    }

    #[test]
    fn test_rejects_truncated_and_padded_nodes() {
        let (id, _) = sender();
        let bytes = Packet::Nodes {
            sender: id,
            nodes: vec![record("10.0.0.1:1")],
        }
        .encode();

        assert!(matches!(
            Packet::decode(&bytes[..bytes.len() - 1]),
            Err(WireError::BodyLength { .. })
        ));

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            Packet::decode(&padded),
            Err(WireError::BodyLength { .. })
        ));

        let mut bad_family = bytes;
        bad_family[33 + 1 + 64] = 5;
        assert_eq!(
            Packet::decode(&bad_family),
            Err(WireError::AddressFamily(5))
        );
    }

    #[test]
    fn test_rejects_oversized() {
        let data = vec![0x02; MAX_PACKET_SIZE + 1];
        assert_eq!(
            Packet::decode(&data),
            Err(WireError::TooLarge(MAX_PACKET_SIZE + 1))
        );
    }
}

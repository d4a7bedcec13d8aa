//! Adapters Layer - Socket and wire format
//!
//! - `wire`: datagram codec
//! - `udp`: tokio UDP listener

pub mod udp;
pub mod wire;

pub use udp::{listen_udp, ListenerHandle};
pub use wire::{MessageType, Packet, WireError, MAX_NODES_PER_PACKET, MAX_PACKET_SIZE};

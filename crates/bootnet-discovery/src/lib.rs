//! # bootnet-discovery - Boot Node Discovery Listener
//!
//! UDP listener that makes a devnet boot node reachable: peers PING it, get
//! recorded in a Kademlia routing table, and can ask for neighbours with
//! FIND_NODE.
//!
//! ## Architecture
//!
//! - **Domain Layer:** node ids, XOR distance, routing table, `enode://`
//!   records, NAT mode and CIDR restriction lists
//! - **Service Layer:** datagram-in, reply-out state machine
//! - **Adapters Layer:** wire codec and the tokio UDP socket
//!
//! ## Example
//!
//! ```no_run
//! use bootnet_crypto::NodeKey;
//! use bootnet_discovery::{listen_udp, ListenConfig};
//!
//! # async fn run() -> Result<(), bootnet_discovery::DiscoveryError> {
//! let key = NodeKey::generate();
//! let handle = listen_udp(&key, &ListenConfig::default()).await?;
//! println!("{}", handle.self_record().with_loopback());
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod service;

pub use adapters::{listen_udp, ListenerHandle, Packet, WireError};
pub use config::{ListenConfig, DEFAULT_DISCOVERY_PORT};
pub use domain::{
    bucket_for_peer, Cidr, DiscoveryError, InsertOutcome, NatError, NatMode, Netlist,
    NetlistError, NodeId, NodeRecord, RecordError, RoutingTable,
};
pub use service::DiscoveryService;

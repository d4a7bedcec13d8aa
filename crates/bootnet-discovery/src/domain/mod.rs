//! Domain Layer - Pure discovery logic with no I/O
//!
//! - Node identifiers and XOR distance
//! - Node records (`enode://` URLs)
//! - Routing table with k-buckets
//! - NAT mode and CIDR restriction lists

pub mod errors;
pub mod nat;
pub mod netlist;
pub mod node_id;
pub mod record;
pub mod routing_table;

pub use errors::{DiscoveryError, NatError, NetlistError, RecordError};
pub use nat::NatMode;
pub use netlist::{Cidr, Netlist};
pub use node_id::{bucket_for_peer, distance_cmp, NodeId};
pub use record::NodeRecord;
pub use routing_table::{InsertOutcome, KBucket, RoutingTable, DEFAULT_BUCKET_SIZE, NUM_BUCKETS};

//! Discovery state machine: decoded datagram in, optional reply out.
//!
//! No I/O happens here; the UDP adapter owns the socket and feeds datagrams
//! through [`DiscoveryService::handle`].

use crate::adapters::wire::{Packet, MAX_NODES_PER_PACKET};
use crate::domain::{InsertOutcome, Netlist, NodeId, NodeRecord, RoutingTable};
use std::net::SocketAddr;
use tracing::{debug, trace};

/// Per-listener protocol state.
#[derive(Debug)]
pub struct DiscoveryService {
    local: NodeRecord,
    local_id: NodeId,
    table: RoutingTable,
    restrict: Option<Netlist>,
}

impl DiscoveryService {
    pub fn new(local: NodeRecord, bucket_size: usize, restrict: Option<Netlist>) -> Self {
        let local_id = local.node_id();
        Self {
            local,
            local_id,
            table: RoutingTable::new(local_id, bucket_size),
            restrict,
        }
    }

    /// Advertised self record.
    pub fn local_record(&self) -> &NodeRecord {
        &self.local
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Process one datagram from `from`. Returns the reply to send, if any.
    pub fn handle(&mut self, data: &[u8], from: SocketAddr) -> Option<Packet> {
        if let Some(restrict) = &self.restrict {
            if !restrict.contains(&from.ip()) {
                trace!("[discovery] dropping datagram from {} (not in netlist)", from);
                return None;
            }
        }

        let packet = match Packet::decode(data) {
            Ok(p) => p,
            Err(e) => {
                debug!("[discovery] malformed datagram from {}: {}", from, e);
                return None;
            }
        };

        if *packet.sender() == self.local_id {
            trace!("[discovery] ignoring datagram carrying our own id from {}", from);
            return None;
        }

        match packet {
            Packet::Ping { sender, pubkey } => {
                if NodeId::from_public_key(&pubkey) != sender {
                    debug!("[discovery] PING from {} with mismatched id", from);
                    return None;
                }
                let outcome = self.table.insert(NodeRecord::new(pubkey, from));
                if outcome == InsertOutcome::Added {
                    debug!("[discovery] new peer {:?} at {}", sender, from);
                }
                Some(Packet::Pong {
                    sender: self.local_id,
                })
            }
            Packet::Pong { sender } => {
                self.table.touch(&sender);
                None
            }
            Packet::FindNode { sender, target } => {
                if !self.table.contains(&sender) {
                    debug!("[discovery] FIND_NODE from unknown sender {}", from);
                    return None;
                }
                self.table.touch(&sender);
                Some(Packet::Nodes {
                    sender: self.local_id,
                    nodes: self.table.closest(&target, MAX_NODES_PER_PACKET),
                })
            }
            Packet::Nodes { .. } => {
                // Boot nodes do not issue lookups.
                trace!("[discovery] unsolicited NODES from {}", from);
                None
            }
        }
    }
}

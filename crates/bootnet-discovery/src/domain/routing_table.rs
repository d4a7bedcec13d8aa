//! Kademlia routing table of peers that have pinged the boot node.
//!
//! ## Layout
//!
//! 256 k-buckets indexed by [`bucket_for_peer`]. Each bucket keeps entries in
//! least-recently-seen order (oldest first). A full bucket drops newcomers:
//! established peers are never evicted by unsolicited pings.

use super::node_id::{bucket_for_peer, distance_cmp, NodeId};
use super::record::NodeRecord;

/// Number of buckets (one per bit of the id).
pub const NUM_BUCKETS: usize = 256;

/// Default bucket capacity.
pub const DEFAULT_BUCKET_SIZE: usize = 16;

/// Result of [`RoutingTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New entry appended to its bucket
    Added,
    /// Existing entry moved to most-recently-seen
    Refreshed,
    /// Bucket already at capacity, entry dropped
    BucketFull,
    /// Record carries our own id
    SelfEntry,
}

/// A k-bucket storing up to k peers at a specific distance range.
#[derive(Debug, Clone, Default)]
pub struct KBucket {
    entries: Vec<NodeRecord>,
}

impl KBucket {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, least recently seen first.
    pub fn entries(&self) -> &[NodeRecord] {
        &self.entries
    }

    fn position(&self, id: &NodeId) -> Option<usize> {
        self.entries.iter().position(|r| r.node_id() == *id)
    }

    /// Move the entry to the tail, optionally replacing its endpoint.
    fn bump(&mut self, index: usize, record: Option<NodeRecord>) {
        let existing = self.entries.remove(index);
        self.entries.push(record.unwrap_or(existing));
    }
}

/// Routing table centred on the local node id.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    local: NodeId,
    bucket_size: usize,
    buckets: Vec<KBucket>,
}

impl RoutingTable {
    /// Create an empty table. A `bucket_size` of zero is treated as one.
    pub fn new(local: NodeId, bucket_size: usize) -> Self {
        Self {
            local,
            bucket_size: bucket_size.max(1),
            buckets: vec![KBucket::default(); NUM_BUCKETS],
        }
    }

    /// Insert or refresh a peer.
    pub fn insert(&mut self, record: NodeRecord) -> InsertOutcome {
        let id = record.node_id();
        if id == self.local {
            return InsertOutcome::SelfEntry;
        }

        let bucket = &mut self.buckets[bucket_for_peer(&self.local, &id)];
        if let Some(index) = bucket.position(&id) {
            bucket.bump(index, Some(record));
            return InsertOutcome::Refreshed;
        }
        if bucket.len() >= self.bucket_size {
            return InsertOutcome::BucketFull;
        }
        bucket.entries.push(record);
        InsertOutcome::Added
    }

    /// Mark a known peer as seen. Returns `false` if unknown.
    pub fn touch(&mut self, id: &NodeId) -> bool {
        let bucket = &mut self.buckets[bucket_for_peer(&self.local, id)];
        match bucket.position(id) {
            Some(index) => {
                bucket.bump(index, None);
                true
            }
            None => false,
        }
    }

    /// Remove a peer, returning its record.
    pub fn remove(&mut self, id: &NodeId) -> Option<NodeRecord> {
        let bucket = &mut self.buckets[bucket_for_peer(&self.local, id)];
        bucket.position(id).map(|index| bucket.entries.remove(index))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Look up a peer by id.
    pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        let bucket = &self.buckets[bucket_for_peer(&self.local, id)];
        bucket.position(id).map(|index| &bucket.entries[index])
    }

    /// Up to `count` peers ordered by XOR distance to `target`.
    pub fn closest(&self, target: &NodeId, count: usize) -> Vec<NodeRecord> {
        let mut all: Vec<NodeRecord> = self
            .buckets
            .iter()
            .flat_map(|b| b.entries.iter().copied())
            .collect();
        all.sort_by(|a, b| distance_cmp(target, &a.node_id(), &b.node_id()));
        all.truncate(count);
        all
    }

    pub fn bucket(&self, index: usize) -> Option<&KBucket> {
        self.buckets.get(index)
    }

    /// Total number of peers.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(KBucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(KBucket::is_empty)
    }
}

//! Node identifiers and XOR distance.

use bootnet_crypto::{keccak256, PublicKey};
use std::cmp::Ordering;
use std::fmt;

/// 256-bit node identifier: `keccak256(uncompressed public key)`.
///
/// Comparison is constant-time so that table lookups keyed on attacker
/// supplied ids do not leak how many leading bytes matched.
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Clone, Copy, Hash)]
pub struct NodeId(pub [u8; 32]);

impl PartialEq for NodeId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        let mut result = 0u8;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            result |= a ^ b;
        }
        result == 0
    }
}

impl Eq for NodeId {}

impl NodeId {
    /// Create a NodeId from raw 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the id of a public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        Self(keccak256(key.as_bytes()))
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}..)", hex::encode(&self.0[..8]))
    }
}

/// Bucket index of `remote` relative to `local`.
///
/// Index is the position of the first differing bit: 0 means the ids differ
/// in the top bit (farthest), 255 means they share 255 leading bits.
/// Identical ids also map to 255.
#[inline]
pub fn bucket_for_peer(local: &NodeId, remote: &NodeId) -> usize {
    let local_bytes = local.as_bytes();
    let remote_bytes = remote.as_bytes();

    for i in 0..32 {
        let xor = local_bytes[i] ^ remote_bytes[i];
        if xor != 0 {
            return i * 8 + xor.leading_zeros() as usize;
        }
    }

    255
}

/// Order `a` and `b` by XOR distance to `target` (closest first).
pub fn distance_cmp(target: &NodeId, a: &NodeId, b: &NodeId) -> Ordering {
    for i in 0..32 {
        let da = a.0[i] ^ target.0[i];
        let db = b.0[i] ^ target.0[i];
        if da != db {
            return da.cmp(&db);
        }
    }
    Ordering::Equal
}

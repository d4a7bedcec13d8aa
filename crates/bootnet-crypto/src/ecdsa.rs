//! # Node Keys (secp256k1)
//!
//! The boot node identity and every keystore account are secp256k1 keys.
//!
//! ## Encodings
//!
//! - Secret key: 32 bytes, big-endian scalar
//! - Public key: 64 bytes, uncompressed SEC1 point without the `0x04` tag
//!   (the form carried in `enode://` URLs)
//! - Address: last 20 bytes of `keccak256(public key)`

use crate::{keccak256, Address, CryptoError};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

/// Uncompressed secp256k1 public key (64 bytes, no SEC1 tag).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    /// Create from the 64-byte uncompressed form, validating the point.
    pub fn from_bytes(bytes: [u8; 64]) -> Result<Self, CryptoError> {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(&bytes);
        VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Ethereum address of this key.
    pub fn to_address(&self) -> Address {
        let hash = keccak256(&self.0);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Address::new(bytes)
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        // Uncompressed encoding is always 65 bytes: tag || x || y
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&point.as_bytes()[1..65]);
        Self(bytes)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// secp256k1 key pair.
#[derive(Clone)]
pub struct NodeKey {
    signing_key: SigningKey,
}

impl NodeKey {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a slice, checking the length first.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Self::from_bytes(array)
    }

    /// Get public key (uncompressed, 64 bytes).
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Ethereum address derived from the public key.
    pub fn address(&self) -> Address {
        self.public_key().to_address()
    }

    /// Get secret key bytes (for serialization).
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.to_bytes();
        let mut b = other.to_bytes();
        let mut diff = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        a.zeroize();
        b.zeroize();
        diff == 0
    }
}

impl Eq for NodeKey {}

impl std::fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_bytes() {
        let original = NodeKey::generate();
        let restored = NodeKey::from_bytes(original.to_bytes()).unwrap();

        assert_eq!(original, restored);
        assert_eq!(original.public_key(), restored.public_key());
    }

    #[test]
    fn test_zero_key_rejected() {
        assert!(matches!(
            NodeKey::from_bytes([0u8; 32]),
            Err(CryptoError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_short_slice_rejected() {
        let err = NodeKey::from_slice(&[1u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        ));
    }

    #[test]
    fn test_known_address() {
        // Secret key 1 maps to the generator point.
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let key = NodeKey::from_bytes(secret).unwrap();

        assert_eq!(
            key.address().to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_public_key_revalidates() {
        let key = NodeKey::generate();
        let pubkey = key.public_key();

        assert_eq!(PublicKey::from_bytes(*pubkey.as_bytes()).unwrap(), pubkey);
        assert!(PublicKey::from_bytes([0u8; 64]).is_err());
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(NodeKey::generate(), NodeKey::generate());
    }
}

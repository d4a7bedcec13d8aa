//! # bootnet-crypto - Keys, Addresses and Keystores
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Boot node identity, account keys |
//! | `keyfile` | hex | Persistent boot node key |
//! | `address` | keccak256 + EIP-55 | Account addresses |
//! | `keystore` | scrypt + AES-128-CTR | Password-protected account files |
//! | `hashing` | Keccak-256 | Addresses, node ids, MACs |
//!
//! ## Security Properties
//!
//! - Node and account keys come from the OS CSPRNG
//! - Secret material is zeroized after encoding/decoding
//! - Keystore MACs are compared in constant time

#![warn(clippy::all)]

pub mod address;
pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod keyfile;
pub mod keystore;

// Re-exports
pub use address::Address;
pub use ecdsa::{NodeKey, PublicKey};
pub use errors::CryptoError;
pub use hashing::{keccak256, Hash, KeccakHasher};
pub use keyfile::{load_key, save_key};
pub use keystore::{
    decrypt_key, encrypt_key, store_key, unlock, KdfStrength, KeystoreError, KeystoreFile,
    ScryptParams, StoredAccount,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

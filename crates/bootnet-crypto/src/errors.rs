//! Crypto error types.

use thiserror::Error;

/// Key and address errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key file could not be read or written
    #[error("key file {path}: {source}")]
    KeyFile {
        /// Path of the key file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key material is not valid hex
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key (zero or not below the curve order)
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Address string is malformed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

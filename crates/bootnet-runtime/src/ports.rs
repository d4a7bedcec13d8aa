//! # Ports
//!
//! Contracts the bootstrap sequence needs from its collaborators. The
//! production adapters live in [`crate::adapters`]; tests substitute their
//! own to force failures at a given stage.

use async_trait::async_trait;
use bootnet_crypto::{KeystoreError, NodeKey, StoredAccount};
use bootnet_discovery::{DiscoveryError, ListenConfig, ListenerHandle};
use std::path::Path;

/// Starts the discovery listener for a node identity.
#[async_trait]
pub trait DiscoveryPort: Send + Sync {
    /// Bind and start serving. Fails on bind errors; never retries.
    async fn start(
        &self,
        key: &NodeKey,
        config: &ListenConfig,
    ) -> Result<ListenerHandle, DiscoveryError>;
}

/// Creates password-protected accounts.
pub trait AccountStore: Send + Sync {
    /// Create a new account under `dir`, encrypted with `password`.
    ///
    /// Every call yields a distinct address.
    fn create_account(&self, dir: &Path, password: &str) -> Result<StoredAccount, KeystoreError>;
}

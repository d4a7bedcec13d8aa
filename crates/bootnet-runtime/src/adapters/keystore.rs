//! Web3 v3 keystore adapter.

use crate::ports::AccountStore;
use bootnet_crypto::{store_key, KdfStrength, KeystoreError, StoredAccount};
use std::path::Path;
use tracing::info;

/// [`AccountStore`] writing Web3 Secret Storage v3 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Web3Keystore {
    strength: KdfStrength,
}

impl Web3Keystore {
    pub fn new(strength: KdfStrength) -> Self {
        Self { strength }
    }
}

impl AccountStore for Web3Keystore {
    fn create_account(&self, dir: &Path, password: &str) -> Result<StoredAccount, KeystoreError> {
        let params = self.strength.params();
        info!(
            "[keystore] Encrypting new account (scrypt N={}, p={})",
            params.n(),
            params.p
        );
        store_key(dir, password, params)
    }
}

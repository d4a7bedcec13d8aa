//! # Bootstrap Configuration
//!
//! Fixed defaults for the devnet bootstrap. The binary never overrides them;
//! tests and embedders point `root` at a temporary directory and bind port 0.

use bootnet_crypto::KdfStrength;
use bootnet_discovery::ListenConfig;
use std::path::PathBuf;

/// Password length for the funded account.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Complete bootstrap configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory holding the chain directory and the boot key.
    pub root: PathBuf,
    /// Chain/account data directory name under `root`.
    pub chain_dir_name: String,
    /// Boot node key file name under `root`.
    pub boot_key_name: String,
    /// Discovery listener configuration.
    pub network: ListenConfig,
    /// Account configuration.
    pub account: AccountConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("bootnet"),
            chain_dir_name: "private-chain".to_string(),
            boot_key_name: "boot.key".to_string(),
            network: ListenConfig::default(),
            account: AccountConfig::default(),
        }
    }
}

impl BootstrapConfig {
    /// Defaults rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// `<root>/<chain_dir_name>`
    pub fn chain_dir(&self) -> PathBuf {
        self.root.join(&self.chain_dir_name)
    }

    /// `<root>/<boot_key_name>`
    pub fn boot_key_path(&self) -> PathBuf {
        self.root.join(&self.boot_key_name)
    }
}

/// Account configuration.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Keystore work factor.
    pub kdf: KdfStrength,
    /// Generated password length.
    pub password_length: usize,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            kdf: KdfStrength::Standard,
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

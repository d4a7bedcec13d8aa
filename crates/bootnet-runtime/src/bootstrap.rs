//! # Bootstrap Sequence
//!
//! ```text
//! DirectoryReady → IdentityReady → ListenerRunning → AccountCreated → GenesisPrinted
//! ```
//!
//! Each step runs only if the previous one succeeded. Nothing is rolled
//! back on failure: the chain directory and boot key stay for the next run.
//!
//! ## Output
//!
//! Exactly three lines go to the supplied writer:
//!
//! ```text
//! boot node started: enode://<pubkey>@127.0.0.1:30301
//! Account address: {<lowercase hex>}, account password: <password>
//! genesis.json: <document>
//! ```

use crate::account::generate_password;
use crate::adapters::{UdpDiscovery, Web3Keystore};
use crate::config::BootstrapConfig;
use crate::errors::{BootstrapError, BootstrapStage};
use crate::genesis::{random_nonce, render_genesis};
use crate::identity::ensure_node_key;
use crate::ports::{AccountStore, DiscoveryPort};
use crate::provision::ensure_chain_dir;
use bootnet_crypto::Address;
use bootnet_discovery::ListenerHandle;
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What a successful run produced.
#[derive(Debug)]
pub struct BootstrapReport {
    /// Printed boot node URL (wildcard IP replaced by loopback)
    pub enode: String,
    /// Funded account
    pub address: Address,
    /// Plaintext account password (printed once, never stored)
    pub password: String,
    /// Keystore file of the account
    pub keystore_path: PathBuf,
    /// Rendered genesis document
    pub genesis: String,
    /// Running discovery listener
    pub listener: ListenerHandle,
}

/// Runs the bootstrap sequence against its collaborators.
pub struct Bootstrapper {
    config: BootstrapConfig,
    discovery: Arc<dyn DiscoveryPort>,
    accounts: Arc<dyn AccountStore>,
}

impl Bootstrapper {
    /// Production wiring: UDP listener and Web3 keystore.
    pub fn new(config: BootstrapConfig) -> Self {
        let accounts = Arc::new(Web3Keystore::new(config.account.kdf));
        Self::with_adapters(config, Arc::new(UdpDiscovery), accounts)
    }

    pub fn with_adapters(
        config: BootstrapConfig,
        discovery: Arc<dyn DiscoveryPort>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            config,
            discovery,
            accounts,
        }
    }

    /// Run every step, writing the protocol lines to `out`.
    pub async fn run<R, W>(&self, rng: &mut R, out: &mut W) -> Result<BootstrapReport, BootstrapError>
    where
        R: Rng + ?Sized,
        W: Write + ?Sized,
    {
        let chain_dir = self.config.chain_dir();
        ensure_chain_dir(&chain_dir)?;
        info!("Reached {}", BootstrapStage::DirectoryReady);

        let key = ensure_node_key(&self.config.boot_key_path())?;
        info!("Reached {}", BootstrapStage::IdentityReady);

        let listener = self
            .discovery
            .start(&key, &self.config.network)
            .await
            .map_err(BootstrapError::Listener)?;
        let enode = listener.self_record().with_loopback().to_string();
        writeln!(out, "boot node started: {}", enode)
            .map_err(output_error(BootstrapStage::ListenerRunning))?;
        info!("Reached {}", BootstrapStage::ListenerRunning);

        let password = generate_password(rng, self.config.account.password_length);
        // Scrypt runs on the blocking pool.
        let accounts = Arc::clone(&self.accounts);
        let (dir, pw) = (chain_dir.clone(), password.clone());
        let account = tokio::task::spawn_blocking(move || accounts.create_account(&dir, &pw))
            .await
            .map_err(BootstrapError::AccountTask)?
            .map_err(BootstrapError::Account)?;
        writeln!(
            out,
            "Account address: {{{:x}}}, account password: {}",
            account.address, password
        )
        .map_err(output_error(BootstrapStage::AccountCreated))?;
        info!("Reached {}", BootstrapStage::AccountCreated);

        let genesis = render_genesis(&account.address, random_nonce(rng));
        writeln!(out, "genesis.json: {}", genesis)
            .map_err(output_error(BootstrapStage::GenesisPrinted))?;
        info!("Reached {}", BootstrapStage::GenesisPrinted);

        Ok(BootstrapReport {
            enode,
            address: account.address,
            password,
            keystore_path: account.path,
            genesis,
            listener,
        })
    }
}

fn output_error(stage: BootstrapStage) -> impl FnOnce(std::io::Error) -> BootstrapError {
    move |source| BootstrapError::Output { stage, source }
}

//! Bootstrap errors and the stage each one aborts.

use bootnet_crypto::{CryptoError, KeystoreError};
use bootnet_discovery::DiscoveryError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Bootstrap state machine. Each variant is reached only if every earlier
/// one was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapStage {
    DirectoryReady,
    IdentityReady,
    ListenerRunning,
    AccountCreated,
    GenesisPrinted,
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapStage::DirectoryReady => "directory",
            BootstrapStage::IdentityReady => "identity",
            BootstrapStage::ListenerRunning => "listener",
            BootstrapStage::AccountCreated => "account",
            BootstrapStage::GenesisPrinted => "genesis",
        };
        f.write_str(name)
    }
}

/// Fatal bootstrap failures. The message is the one-line diagnostic printed
/// by the binary.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not create chain directory {}: {source}", .path.display())]
    ChainDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create boot key file: {source}")]
    KeyCreate {
        path: PathBuf,
        #[source]
        source: CryptoError,
    },

    #[error("could not load boot key file: {source}")]
    KeyLoad {
        path: PathBuf,
        #[source]
        source: CryptoError,
    },

    #[error("could not start boot node: {0}")]
    Listener(#[source] DiscoveryError),

    #[error("failed to create account: {0}")]
    Account(#[source] KeystoreError),

    #[error("account creation did not complete: {0}")]
    AccountTask(#[source] tokio::task::JoinError),

    #[error("could not write output: {source}")]
    Output {
        stage: BootstrapStage,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    /// Stage whose transition failed.
    pub fn stage(&self) -> BootstrapStage {
        match self {
            BootstrapError::ChainDir { .. } => BootstrapStage::DirectoryReady,
            BootstrapError::KeyCreate { .. } | BootstrapError::KeyLoad { .. } => {
                BootstrapStage::IdentityReady
            }
            BootstrapError::Listener(_) => BootstrapStage::ListenerRunning,
            BootstrapError::Account(_) | BootstrapError::AccountTask(_) => {
                BootstrapStage::AccountCreated
            }
            BootstrapError::Output { stage, .. } => *stage,
        }
    }
}

//! Boot node identity: load the key file, creating it on first run.

use crate::errors::BootstrapError;
use bootnet_crypto::{load_key, save_key, CryptoError, NodeKey};
use std::path::Path;
use tracing::info;

/// Make sure a node key exists at `path`, then load it.
///
/// An existing file is never rewritten, even if it turns out to be corrupt.
pub fn ensure_node_key(path: &Path) -> Result<NodeKey, BootstrapError> {
    let exists = path.try_exists().map_err(|source| BootstrapError::KeyLoad {
        path: path.to_path_buf(),
        source: CryptoError::KeyFile {
            path: path.display().to_string(),
            source,
        },
    })?;

    if !exists {
        let key = NodeKey::generate();
        save_key(path, &key).map_err(|source| BootstrapError::KeyCreate {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Generated boot node key at {}", path.display());
    }

    load_key(path).map_err(|source| BootstrapError::KeyLoad {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_generates_then_reuses() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("boot.key");

        let first = ensure_node_key(&path).unwrap();
        let on_disk = fs::read(&path).unwrap();
        let second = ensure_node_key(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&path).unwrap(), on_disk);
    }

    #[test]
    fn test_existing_key_is_loaded_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("boot.key");
        let key = NodeKey::generate();
        save_key(&path, &key).unwrap();

        assert_eq!(ensure_node_key(&path).unwrap(), key);
    }

    #[test]
    fn test_corrupt_key_is_not_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("boot.key");
        fs::write(&path, b"garbage").unwrap();

        let err = ensure_node_key(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::KeyLoad { .. }));
        assert_eq!(fs::read(&path).unwrap(), b"garbage");
    }

    #[test]
    fn test_missing_parent_fails_create() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("boot.key");

        let err = ensure_node_key(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::KeyCreate { .. }));
    }
}

//! Chain directory provisioning.

use crate::errors::BootstrapError;
use std::fs::DirBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Owner-only: read, write and search.
const CHAIN_DIR_MODE: u32 = 0o700;

/// Create `path` (and parents) unless something already exists there.
///
/// An existing entry is accepted whatever its type; a plain file at `path`
/// surfaces later when the keystore writes into it. Returns `true` if the
/// directory was created by this call.
pub fn ensure_chain_dir(path: &Path) -> Result<bool, BootstrapError> {
    let to_error = |source| BootstrapError::ChainDir {
        path: path.to_path_buf(),
        source,
    };

    if path.try_exists().map_err(to_error)? {
        debug!("Chain directory {} already exists", path.display());
        return Ok(false);
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(CHAIN_DIR_MODE);
    }
    builder.create(path).map_err(to_error)?;

    info!("Created chain directory {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a").join("private-chain");

        assert!(ensure_chain_dir(&path).unwrap());
        assert!(path.is_dir());
    }

    #[test]
    fn test_existing_directory_is_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("private-chain");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), b"data").unwrap();

        assert!(!ensure_chain_dir(&path).unwrap());
        assert_eq!(fs::read(path.join("keep.txt")).unwrap(), b"data");
    }

    #[test]
    fn test_existing_file_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("private-chain");
        fs::write(&path, b"not a dir").unwrap();

        assert!(!ensure_chain_dir(&path).unwrap());
        assert!(path.is_file());
    }

    #[test]
    fn test_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::write(&root, b"plain file").unwrap();

        let err = ensure_chain_dir(&root.join("private-chain")).unwrap_err();
        assert!(matches!(err, BootstrapError::ChainDir { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("private-chain");
        ensure_chain_dir(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, CHAIN_DIR_MODE);
    }
}

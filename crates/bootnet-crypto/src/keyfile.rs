//! # Node Key Files
//!
//! The boot node identity is stored as 64 hex characters (the 32-byte secret
//! scalar) with owner-only permissions. Trailing whitespace is tolerated on
//! load so hand-edited files keep working.

use crate::{CryptoError, NodeKey};
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroize;

/// Write `key` to `path` as hex, creating or truncating the file.
pub fn save_key(path: &Path, key: &NodeKey) -> Result<(), CryptoError> {
    let mut encoded = hex::encode(key.to_bytes());
    let result = write_private(path, encoded.as_bytes());
    encoded.zeroize();
    result.map_err(|source| CryptoError::KeyFile {
        path: path.display().to_string(),
        source,
    })
}

/// Read a hex key file written by [`save_key`].
pub fn load_key(path: &Path) -> Result<NodeKey, CryptoError> {
    let mut content = fs::read_to_string(path).map_err(|source| CryptoError::KeyFile {
        path: path.display().to_string(),
        source,
    })?;

    let trimmed = content.trim_end();
    if trimmed.len() != 64 {
        let actual = trimmed.len() / 2;
        content.zeroize();
        return Err(CryptoError::InvalidKeyLength {
            expected: 32,
            actual,
        });
    }

    let mut bytes = [0u8; 32];
    let decoded = hex::decode_to_slice(trimmed, &mut bytes);
    content.zeroize();
    decoded?;

    let key = NodeKey::from_bytes(bytes);
    bytes.zeroize();
    key
}

fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boot.key");
        let key = NodeKey::generate();

        save_key(&path, &key).unwrap();
        let loaded = load_key(&path).unwrap();

        assert_eq!(loaded, key);
    }

    #[test]
    fn test_file_is_plain_hex() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boot.key");
        let key = NodeKey::generate();

        save_key(&path, &key).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert_eq!(content, hex::encode(key.to_bytes()));
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boot.key");
        let key = NodeKey::generate();
        fs::write(&path, format!("{}\n", hex::encode(key.to_bytes()))).unwrap();

        assert_eq!(load_key(&path).unwrap(), key);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = load_key(&dir.path().join("absent.key")).unwrap_err();
        assert!(matches!(err, CryptoError::KeyFile { .. }));
    }

    #[test]
    fn test_corrupt_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boot.key");

        fs::write(&path, "not a key").unwrap();
        assert!(matches!(
            load_key(&path),
            Err(CryptoError::InvalidKeyLength { .. })
        ));

        fs::write(&path, "zz".repeat(32)).unwrap();
        assert!(matches!(load_key(&path), Err(CryptoError::InvalidHex(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("boot.key");
        save_key(&path, &NodeKey::generate()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

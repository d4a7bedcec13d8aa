//! # Web3 Keystore (Secret Storage v3)
//!
//! Password-protected account files compatible with the `keystore/` layout of
//! Ethereum clients.
//!
//! ## Format
//!
//! | Field | Value |
//! |-------|-------|
//! | KDF | scrypt, dklen 32, random 32-byte salt |
//! | Cipher | AES-128-CTR keyed with `dk[0..16]`, random 16-byte IV |
//! | MAC | `keccak256(dk[16..32] ‖ ciphertext)` |
//! | Name | `UTC--<timestamp>--<address>` |
//!
//! ## Work Factors
//!
//! - `Standard`: N = 2^18, r = 8, p = 1 (~256 MiB, about a second)
//! - `Light`: N = 2^12, r = 8, p = 6 (tests and throwaway accounts)

use crate::{Address, CryptoError, KeccakHasher, NodeKey};
use aes::cipher::{KeyIvInit, StreamCipher};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroize;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

const KEYSTORE_VERSION: u32 = 3;
const DKLEN: usize = 32;
const CIPHER: &str = "aes-128-ctr";
const KDF: &str = "scrypt";

/// Keystore errors.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// Filesystem failure while reading or writing a key file
    #[error("keystore I/O on {path}: {source}")]
    Io {
        /// File or directory involved
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed keystore JSON
    #[error("keystore JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// scrypt rejected its parameters
    #[error("scrypt: {0}")]
    Kdf(String),

    /// Cipher setup failed
    #[error("cipher: {0}")]
    Cipher(String),

    /// Cipher/KDF or version the reader does not handle
    #[error("unsupported keystore: {0}")]
    Unsupported(String),

    /// Wrong password or tampered ciphertext
    #[error("could not decrypt key with given password")]
    MacMismatch,

    /// Decrypted key does not belong to the stored address
    #[error("key content mismatch: have account {actual}, want {expected}")]
    AddressMismatch {
        /// Address recorded in the file
        expected: Address,
        /// Address of the decrypted key
        actual: Address,
    },

    /// Key material problem
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Work-factor preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KdfStrength {
    /// Client default for interactive accounts
    #[default]
    Standard,
    /// Cheap parameters for tests and throwaway keys
    Light,
}

impl KdfStrength {
    /// Concrete scrypt parameters for this preset.
    pub fn params(self) -> ScryptParams {
        match self {
            Self::Standard => ScryptParams::STANDARD,
            Self::Light => ScryptParams::LIGHT,
        }
    }
}

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptParams {
    /// log2 of the CPU/memory cost N
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl ScryptParams {
    /// N = 2^18, p = 1.
    pub const STANDARD: Self = Self {
        log_n: 18,
        r: 8,
        p: 1,
    };

    /// N = 2^12, p = 6.
    pub const LIGHT: Self = Self {
        log_n: 12,
        r: 8,
        p: 6,
    };

    /// The cost N as written to the file.
    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }

    fn derive(&self, password: &str, salt: &[u8]) -> Result<[u8; DKLEN], KeystoreError> {
        let params = scrypt::Params::new(self.log_n, self.r, self.p, DKLEN)
            .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
        let mut derived = [0u8; DKLEN];
        scrypt::scrypt(password.as_bytes(), salt, &params, &mut derived)
            .map_err(|e| KeystoreError::Kdf(e.to_string()))?;
        Ok(derived)
    }
}

/// On-disk keystore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreFile {
    /// Account address (bare lowercase hex)
    pub address: Address,
    /// Encrypted key material
    pub crypto: CryptoJson,
    /// Random identifier
    pub id: Uuid,
    /// Format version (3)
    pub version: u32,
}

/// `crypto` section of a keystore file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoJson {
    pub cipher: String,
    pub ciphertext: String,
    pub cipherparams: CipherParams,
    pub kdf: String,
    pub kdfparams: KdfParams,
    pub mac: String,
}

/// Cipher parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

/// scrypt parameters as stored in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    pub dklen: usize,
    pub n: u64,
    pub p: u32,
    pub r: u32,
    pub salt: String,
}

/// Result of [`store_key`].
#[derive(Debug, Clone)]
pub struct StoredAccount {
    /// New account address
    pub address: Address,
    /// Path of the written keystore file
    pub path: PathBuf,
    /// Keystore id
    pub id: Uuid,
}

/// Encrypt `key` under `password`.
pub fn encrypt_key(
    key: &NodeKey,
    password: &str,
    params: ScryptParams,
) -> Result<KeystoreFile, KeystoreError> {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let mut derived = params.derive(password, &salt)?;
    let mut ciphertext = key.to_bytes();
    let applied = apply_ctr(&derived[..16], &iv, &mut ciphertext);
    let mac = mac(&derived[16..], &ciphertext);
    derived.zeroize();
    if let Err(e) = applied {
        ciphertext.zeroize();
        return Err(e);
    }

    Ok(KeystoreFile {
        address: key.address(),
        crypto: CryptoJson {
            cipher: CIPHER.to_string(),
            ciphertext: hex::encode(ciphertext),
            cipherparams: CipherParams {
                iv: hex::encode(iv),
            },
            kdf: KDF.to_string(),
            kdfparams: KdfParams {
                dklen: DKLEN,
                n: params.n(),
                p: params.p,
                r: params.r,
                salt: hex::encode(salt),
            },
            mac: hex::encode(mac),
        },
        id: Uuid::new_v4(),
        version: KEYSTORE_VERSION,
    })
}

/// Decrypt a keystore document, verifying MAC and address.
pub fn decrypt_key(file: &KeystoreFile, password: &str) -> Result<NodeKey, KeystoreError> {
    if file.version != KEYSTORE_VERSION {
        return Err(KeystoreError::Unsupported(format!(
            "version {}",
            file.version
        )));
    }
    let crypto = &file.crypto;
    if crypto.cipher != CIPHER {
        return Err(KeystoreError::Unsupported(format!("cipher {}", crypto.cipher)));
    }
    if crypto.kdf != KDF {
        return Err(KeystoreError::Unsupported(format!("kdf {}", crypto.kdf)));
    }

    let kdf = &crypto.kdfparams;
    if kdf.dklen != DKLEN || !kdf.n.is_power_of_two() || kdf.n < 2 {
        return Err(KeystoreError::Unsupported(format!(
            "scrypt n={} dklen={}",
            kdf.n, kdf.dklen
        )));
    }
    let params = ScryptParams {
        log_n: kdf.n.trailing_zeros() as u8,
        r: kdf.r,
        p: kdf.p,
    };

    let salt = hex::decode(&kdf.salt).map_err(CryptoError::from)?;
    let iv = hex::decode(&crypto.cipherparams.iv).map_err(CryptoError::from)?;
    let mut ciphertext = hex::decode(&crypto.ciphertext).map_err(CryptoError::from)?;
    let expected_mac = hex::decode(&crypto.mac).map_err(CryptoError::from)?;

    let mut derived = params.derive(password, &salt)?;
    let computed_mac = mac(&derived[16..], &ciphertext);
    if !constant_time_eq(&computed_mac, &expected_mac) {
        derived.zeroize();
        return Err(KeystoreError::MacMismatch);
    }

    let applied = apply_ctr(&derived[..16], &iv, &mut ciphertext);
    derived.zeroize();
    applied?;

    let key = NodeKey::from_slice(&ciphertext);
    ciphertext.zeroize();
    let key = key?;

    let actual = key.address();
    if actual != file.address {
        return Err(KeystoreError::AddressMismatch {
            expected: file.address,
            actual,
        });
    }
    Ok(key)
}

/// Generate a new account key, encrypt it and write it into `dir`.
///
/// The directory is created (owner-only) if missing.
pub fn store_key(
    dir: &Path,
    password: &str,
    params: ScryptParams,
) -> Result<StoredAccount, KeystoreError> {
    let key = NodeKey::generate();
    let file = encrypt_key(&key, password, params)?;
    let path = dir.join(keystore_file_name(Utc::now(), &file.address));

    let json = serde_json::to_vec(&file)?;
    write_key_file(dir, &path, &json)?;
    debug!("[keystore] Wrote {}", path.display());

    Ok(StoredAccount {
        address: file.address,
        path,
        id: file.id,
    })
}

/// Read and decrypt the keystore file at `path`.
pub fn unlock(path: &Path, password: &str) -> Result<NodeKey, KeystoreError> {
    let content = fs::read(path).map_err(|source| KeystoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: KeystoreFile = serde_json::from_slice(&content)?;
    decrypt_key(&file, password)
}

/// `UTC--2024-01-31T09-41-07.123456789Z--<address>`
pub fn keystore_file_name(now: DateTime<Utc>, address: &Address) -> String {
    format!(
        "UTC--{}--{:x}",
        now.format("%Y-%m-%dT%H-%M-%S%.9fZ"),
        address
    )
}

fn apply_ctr(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), KeystoreError> {
    let mut cipher =
        Aes128Ctr::new_from_slices(key, iv).map_err(|e| KeystoreError::Cipher(e.to_string()))?;
    cipher.apply_keystream(data);
    Ok(())
}

fn mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut hasher = KeccakHasher::new();
    hasher.update(mac_key).update(ciphertext);
    hasher.finalize()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// Write to a temporary sibling, then rename so readers never see a partial file.
fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> KeystoreError {
    let path = path.display().to_string();
    move |source| KeystoreError::Io { path, source }
}

fn write_key_file(dir: &Path, path: &Path, data: &[u8]) -> Result<(), KeystoreError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(io_err(dir))?;

    let tmp = dir.join(format!(".{}.tmp", Uuid::new_v4()));
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let written = options.open(&tmp).and_then(|mut f| {
        f.write_all(data)?;
        f.sync_all()
    });
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(&tmp)(source));
    }
    fs::rename(&tmp, path).map_err(io_err(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = NodeKey::generate();
        let file = encrypt_key(&key, "hunter2", ScryptParams::LIGHT).unwrap();

        assert_eq!(file.address, key.address());
        assert_eq!(decrypt_key(&file, "hunter2").unwrap(), key);
    }

    #[test]
    fn test_wrong_password_fails() {
        let key = NodeKey::generate();
        let file = encrypt_key(&key, "right", ScryptParams::LIGHT).unwrap();

        assert!(matches!(
            decrypt_key(&file, "wrong"),
            Err(KeystoreError::MacMismatch)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = NodeKey::generate();
        let mut file = encrypt_key(&key, "pw", ScryptParams::LIGHT).unwrap();
        let mut raw = hex::decode(&file.crypto.ciphertext).unwrap();
        raw[0] ^= 0xff;
        file.crypto.ciphertext = hex::encode(raw);

        assert!(matches!(
            decrypt_key(&file, "pw"),
            Err(KeystoreError::MacMismatch)
        ));
    }

    #[test]
    fn test_file_fields() {
        let key = NodeKey::generate();
        let file = encrypt_key(&key, "pw", ScryptParams::LIGHT).unwrap();
        let json: serde_json::Value = serde_json::to_value(&file).unwrap();

        assert_eq!(json["version"], 3);
        assert_eq!(json["crypto"]["cipher"], "aes-128-ctr");
        assert_eq!(json["crypto"]["kdf"], "scrypt");
        assert_eq!(json["crypto"]["kdfparams"]["n"], 4096);
        assert_eq!(json["crypto"]["kdfparams"]["p"], 6);
        assert_eq!(json["crypto"]["kdfparams"]["dklen"], 32);
        assert_eq!(json["address"], format!("{:x}", key.address()));
    }

    #[test]
    fn test_standard_params() {
        assert_eq!(KdfStrength::Standard.params().n(), 262_144);
        assert_eq!(KdfStrength::Standard.params().p, 1);
        assert_eq!(KdfStrength::Light.params().n(), 4096);
    }

    #[test]
    fn test_store_and_unlock() {
        let dir = tempdir().unwrap();
        let stored = store_key(dir.path(), "s3cret", ScryptParams::LIGHT).unwrap();

        assert!(stored.path.starts_with(dir.path()));
        let name = stored.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("UTC--"));
        assert!(name.ends_with(&format!("{:x}", stored.address)));

        let key = unlock(&stored.path, "s3cret").unwrap();
        assert_eq!(key.address(), stored.address);
    }

    #[test]
    fn test_store_accumulates_files() {
        let dir = tempdir().unwrap();
        let a = store_key(dir.path(), "a", ScryptParams::LIGHT).unwrap();
        let b = store_key(dir.path(), "b", ScryptParams::LIGHT).unwrap();

        assert_ne!(a.address, b.address);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_store_into_plain_file_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("private-chain");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = store_key(&blocker, "pw", ScryptParams::LIGHT).unwrap_err();
        assert!(matches!(err, KeystoreError::Io { .. }));
    }

    #[test]
    fn test_file_name_format() {
        let when = Utc.with_ymd_and_hms(2024, 1, 31, 9, 41, 7).unwrap();
        let address: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();

        assert_eq!(
            keystore_file_name(when, &address),
            "UTC--2024-01-31T09-41-07.000000000Z--5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
    }
}

//! File Key Store Adapter
//!
//! Implements `KeyStore` over JSON keypair files: a single array of 64
//! byte values, the 32-byte secret followed by the 32-byte public key.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{KeyLoadError, Keypair, KEYPAIR_LEN};
use crate::ports::outbound::KeyStore;

/// Keypair files resolved relative to a root directory.
#[derive(Clone, Debug)]
pub struct FileKeyStore {
    root: PathBuf,
}

impl FileKeyStore {
    /// Resolve names relative to `root`. Absolute names ignore it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a name resolves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self, name: &str) -> Result<Keypair, KeyLoadError> {
        let path = self.path_for(name);
        debug!("[seeded-account] Loading keypair from {:?}", path);
        read_keypair_file(&path)
    }
}

/// Read a keypair file.
pub fn read_keypair_file(path: &Path) -> Result<Keypair, KeyLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes: Vec<u8> =
        serde_json::from_str(&contents).map_err(|e| KeyLoadError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let bytes: [u8; KEYPAIR_LEN] =
        bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| KeyLoadError::Malformed {
                path: path.to_path_buf(),
                reason: format!("expected {} bytes, got {}", KEYPAIR_LEN, bytes.len()),
            })?;

    Keypair::from_keypair_bytes(&bytes).ok_or_else(|| KeyLoadError::InvalidKeypair {
        path: path.to_path_buf(),
    })
}

/// Write a keypair file in the same format.
pub fn write_keypair_file(path: &Path, keypair: &Keypair) -> std::io::Result<()> {
    let json = serde_json::to_string(&keypair.to_keypair_bytes().to_vec())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_written_keypair() {
        let dir = tempfile::tempdir().unwrap();
        let keypair = Keypair::from_seed([3u8; 32]);
        write_keypair_file(&dir.path().join("wallet.json"), &keypair).unwrap();

        let store = FileKeyStore::new(dir.path());
        let loaded = store.load("wallet.json").unwrap();
        assert_eq!(loaded.identity(), keypair.identity());
    }

    #[test]
    fn test_nested_path_created() {
        let dir = tempfile::tempdir().unwrap();
        let keypair = Keypair::generate();
        let path = dir.path().join("dist/program/keypair.json");
        write_keypair_file(&path, &keypair).unwrap();
        assert_eq!(read_keypair_file(&path).unwrap().identity(), keypair.identity());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path());
        assert!(matches!(
            store.load("absent.json"),
            Err(KeyLoadError::Io { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let store = FileKeyStore::new(dir.path());
        assert!(matches!(
            store.load("bad.json"),
            Err(KeyLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("short.json"), "[1,2,3]").unwrap();
        let store = FileKeyStore::new(dir.path());
        match store.load("short.json") {
            Err(KeyLoadError::Malformed { reason, .. }) => assert!(reason.contains("got 3")),
            other => panic!("expected malformed, got {:?}", other.map(|k| k.identity())),
        }
    }

    #[test]
    fn test_mismatched_public_half() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = Keypair::from_seed([4u8; 32]).to_keypair_bytes();
        bytes[32..].copy_from_slice(Keypair::from_seed([5u8; 32]).identity().as_bytes());
        fs::write(
            dir.path().join("mixed.json"),
            serde_json::to_string(&bytes.to_vec()).unwrap(),
        )
        .unwrap();
        let store = FileKeyStore::new(dir.path());
        assert!(matches!(
            store.load("mixed.json"),
            Err(KeyLoadError::InvalidKeypair { .. })
        ));
    }
}

//! Keypair loading helpers
//!
//! Accounts are always caller-supplied; this module only turns stored key
//! material into a [`Keypair`] and never persists anything.

use solana_sdk::signature::Keypair;
use std::path::Path;
use thiserror::Error;

/// Load a keypair from a solana-keygen JSON file (an array of 64 bytes)
pub fn load_keypair(path: impl AsRef<Path>) -> Result<Keypair, WalletError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| WalletError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let bytes: Vec<u8> = serde_json::from_str(&raw).map_err(|e| WalletError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Keypair::try_from(bytes.as_slice()).map_err(|e| WalletError::InvalidKey(e.to_string()))
}

/// Decode a keypair from a base58-encoded 64-byte secret key
pub fn keypair_from_base58(encoded: &str) -> Result<Keypair, WalletError> {
    let bytes = bs58::decode(encoded).into_vec()?;
    Keypair::try_from(bytes.as_slice()).map_err(|e| WalletError::InvalidKey(e.to_string()))
}

/// Error types for keypair loading
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("failed to read keypair file {path}: {message}")]
    Io { path: String, message: String },

    #[error("malformed keypair file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid base58 secret key: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("invalid secret key bytes: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;
    use std::io::Write;

    #[test]
    fn test_load_keypair_file_roundtrip() {
        let keypair = Keypair::new();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet-keypair.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();

        let loaded = load_keypair(&path).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_keypair_missing_file() {
        let result = load_keypair("/nonexistent/wallet-keypair.json");
        assert!(matches!(result, Err(WalletError::Io { .. })));
    }

    #[test]
    fn test_load_keypair_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = load_keypair(&path);
        assert!(matches!(result, Err(WalletError::Parse { .. })));
    }

    #[test]
    fn test_base58_roundtrip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let decoded = keypair_from_base58(&encoded).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_base58_rejects_garbage() {
        assert!(matches!(
            keypair_from_base58("not-base58-0OIl"),
            Err(WalletError::Base58(_))
        ));
        // valid base58, wrong length
        assert!(matches!(
            keypair_from_base58("abc"),
            Err(WalletError::InvalidKey(_))
        ));
    }
}

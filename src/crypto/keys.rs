use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use zeroize::Zeroize;

use super::encryption::EncryptedData;
use super::CryptoError;

pub const KEY_LENGTH: usize = 32; // AES-256

/// Report payload key, zeroed on drop. Configured as base64 text.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct ReportKey {
    key_bytes: [u8; KEY_LENGTH],
}

impl ReportKey {
    /// Fresh random key.
    pub fn generate() -> Self {
        let mut key_bytes = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut key_bytes);
        Self { key_bytes }
    }

    /// Parse a standard base64 encoding of exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        if decoded.len() != KEY_LENGTH {
            let len = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKey(format!(
                "expected {KEY_LENGTH} bytes, got {len}"
            )));
        }
        let mut key_bytes = [0u8; KEY_LENGTH];
        key_bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { key_bytes })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.key_bytes)
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedData, CryptoError> {
        EncryptedData::encrypt(&self.key_bytes, plaintext)
    }

    pub fn decrypt(&self, encrypted: &EncryptedData) -> Result<Vec<u8>, CryptoError> {
        encrypted.decrypt(&self.key_bytes)
    }

    /// Encrypt into the stored blob layout.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.encrypt(plaintext)?.to_bytes())
    }

    /// Inverse of `seal`.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypt(&EncryptedData::from_bytes(sealed)?)
    }
}

impl std::fmt::Debug for ReportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReportKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip() {
        let key = ReportKey::generate();
        let restored = ReportKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.key_bytes, restored.key_bytes);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(ReportKey::generate().key_bytes, ReportKey::generate().key_bytes);
    }

    #[test]
    fn rejects_wrong_length() {
        let short = STANDARD.encode([7u8; 16]);
        assert!(matches!(
            ReportKey::from_base64(&short),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(ReportKey::from_base64("not base64 !!").is_err());
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        let encoded = format!("  {}\n", STANDARD.encode([1u8; KEY_LENGTH]));
        assert!(ReportKey::from_base64(&encoded).is_ok());
    }

    #[test]
    fn seal_and_open() {
        let key = ReportKey::generate();
        let sealed = key.seal(b"payload").unwrap();
        assert_ne!(&sealed[12..], b"payload");
        assert_eq!(key.open(&sealed).unwrap(), b"payload");
        assert!(matches!(
            ReportKey::generate().open(&sealed),
            Err(CryptoError::DecryptionFailed)
        ));
        assert!(matches!(key.open(&sealed[..10]), Err(CryptoError::CorruptedData)));
    }

    #[test]
    fn debug_does_not_leak_key() {
        assert_eq!(format!("{:?}", ReportKey::generate()), "ReportKey(..)");
    }
}

//! Ed25519 keypairs, public keys and ledger addresses.

use ed25519_dalek::SigningKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::derivation::DerivedKeyMaterial;
use crate::{Result, WalletError};

/// Public key length in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Expanded private key length (secret seed followed by public key)
pub const KEYPAIR_LEN: usize = 64;

/// Hex characters kept from the public key digest for wallet ids
pub const FINGERPRINT_HEX_LEN: usize = 8;

/// 32-byte Ed25519 public key; its base58 form is the ledger address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| WalletError::KeyLength {
            expected: PUBLIC_KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Parse a base58 ledger address; it must decode to exactly 32 bytes
    pub fn from_base58(address: &str) -> Result<Self> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|e| WalletError::InvalidAddress(format!("'{address}' is not base58: {e}")))?;
        if decoded.len() != PUBLIC_KEY_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "'{address}' decodes to {} bytes, expected {PUBLIC_KEY_LEN}",
                decoded.len()
            )));
        }
        Self::from_bytes(&decoded)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base58 ledger address
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base58(&text).map_err(serde::de::Error::custom)
    }
}

/// Check whether `address` is a valid ledger address
pub fn is_valid_address(address: &str) -> bool {
    PublicKey::from_base58(address).is_ok()
}

/// Wallet id: the first 8 lowercase hex characters of SHA-256(public key)
pub fn fingerprint(public_key: &PublicKey) -> String {
    let digest = Sha256::digest(public_key.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(FINGERPRINT_HEX_LEN);
    id
}

/// Ed25519 signing keypair
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Expand derived key material into a keypair (RFC 8032)
    pub fn from_seed(material: &DerivedKeyMaterial) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(material.key()),
        }
    }

    /// Public half
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// 64-byte private key: secret seed followed by the public key
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LEN]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Id derived from the public key
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.public_key())
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::master_key;

    fn vector_keypair() -> Keypair {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        Keypair::from_seed(&master_key(&seed).unwrap())
    }

    #[test]
    fn test_public_key_matches_slip10_master() {
        let keypair = vector_keypair();
        assert_eq!(
            keypair.public_key().to_hex(),
            "a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed"
        );
    }

    #[test]
    fn test_private_key_layout() {
        let keypair = vector_keypair();
        let bytes = keypair.to_bytes();
        assert_eq!(
            hex::encode(&bytes[..32]),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(&bytes[32..], keypair.public_key().as_bytes());
    }

    #[test]
    fn test_address_roundtrip() {
        let public_key = vector_keypair().public_key();
        let address = public_key.to_base58();
        assert!(is_valid_address(&address));
        assert_eq!(address.parse::<PublicKey>().unwrap(), public_key);
    }

    #[test]
    fn test_address_rejections() {
        assert_eq!(PublicKey::from_base58("0OIl").unwrap_err().code(), "INVALID_ADDRESS");
        let short = bs58::encode([1u8; 31]).into_string();
        assert!(!is_valid_address(&short));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_fingerprint_shape() {
        let id = vector_keypair().fingerprint();
        assert_eq!(id.len(), FINGERPRINT_HEX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_serde_uses_base58() {
        let public_key = vector_keypair().public_key();
        let json = serde_json::to_string(&public_key).unwrap();
        assert_eq!(json, format!("\"{}\"", public_key.to_base58()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, public_key);
    }

    #[test]
    fn test_debug_omits_secret() {
        let keypair = vector_keypair();
        let debug = format!("{keypair:?}");
        assert!(!debug.contains("2b4be7f1"));
    }
}

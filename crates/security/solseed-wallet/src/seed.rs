//! BIP-39 seed derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::mnemonic::Mnemonic;
use crate::{Result, WalletError};

/// Seed length in bytes
pub const SEED_LEN: usize = 64;

/// PBKDF2-HMAC-SHA512 iteration count fixed by BIP-39
pub const PBKDF2_ROUNDS: u32 = 2048;

const SALT_PREFIX: &str = "mnemonic";

/// 64-byte seed stretched from a mnemonic and passphrase
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SEED_LEN] = bytes.try_into().map_err(|_| WalletError::KeyLength {
            expected: SEED_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Short, non-reversible identifier used to tell seeds apart
    pub fn fingerprint(&self) -> [u8; 8] {
        let digest = Sha256::digest(self.0);
        let mut out = [0u8; 8];
        out.copy_from_slice(&digest[..8]);
        out
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Stretch a mnemonic into a seed.
///
/// Both the sentence and the salt (`"mnemonic" + passphrase`) are NFKD
/// normalized before PBKDF2-HMAC-SHA512 with 2048 rounds.
pub fn to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    let sentence = Zeroizing::new(mnemonic.phrase().nfkd().collect::<String>());
    let salt = Zeroizing::new(format!("{SALT_PREFIX}{passphrase}").nfkd().collect::<String>());

    let mut seed = Seed([0u8; SEED_LEN]);
    pbkdf2_hmac::<Sha512>(sentence.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed.0);
    seed
}

//! SLIP-0010 hierarchical derivation for Ed25519.
//!
//! Ed25519 only defines hardened child derivation, so every segment of a path
//! handed to [`derive`] must carry the hardening offset. Paths with normal
//! segments still parse, which lets callers report them, but derivation rejects
//! them before any hashing happens.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::seed::Seed;
use crate::{Result, WalletError};

type HmacSha512 = Hmac<Sha512>;

/// Offset added to an index to mark it hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP-44 purpose segment
pub const BIP44_PURPOSE: u32 = 44;

/// SLIP-44 coin type registered for Solana
pub const SOLANA_COIN_TYPE: u32 = 501;

const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// Seed sizes accepted by the master key step (BIP-32 allows 128 to 512 bits)
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// One path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildIndex {
    /// Hardened segment, index stored without the offset
    Hardened(u32),
    /// Normal segment; parseable but never derivable on Ed25519
    Normal(u32),
}

impl ChildIndex {
    /// Hardened segment for `index`
    pub fn hardened(index: u32) -> Result<Self> {
        Self::check_range(index)?;
        Ok(ChildIndex::Hardened(index))
    }

    /// Normal segment for `index`
    pub fn normal(index: u32) -> Result<Self> {
        Self::check_range(index)?;
        Ok(ChildIndex::Normal(index))
    }

    fn check_range(index: u32) -> Result<()> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "index {index} exceeds {}",
                HARDENED_OFFSET - 1
            )));
        }
        Ok(())
    }

    /// Index without the hardening offset
    pub fn index(self) -> u32 {
        match self {
            ChildIndex::Hardened(i) | ChildIndex::Normal(i) => i,
        }
    }

    /// Whether the segment is hardened
    pub fn is_hardened(self) -> bool {
        matches!(self, ChildIndex::Hardened(_))
    }

    /// Serialized index, offset applied for hardened segments
    pub fn to_raw(self) -> u32 {
        match self {
            ChildIndex::Hardened(i) => i | HARDENED_OFFSET,
            ChildIndex::Normal(i) => i,
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildIndex::Hardened(i) => write!(f, "{i}'"),
            ChildIndex::Normal(i) => write!(f, "{i}"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let (digits, hardened) = match s.strip_suffix(&['\'', 'h', 'H'][..]) {
            Some(digits) => (digits, true),
            None => (s, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WalletError::InvalidPath(format!("malformed segment '{s}'")));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| WalletError::InvalidPath(format!("segment '{s}' out of range")))?;

        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A derivation path such as `m/44'/501'/0'/0'`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    segments: Vec<ChildIndex>,
}

impl DerivationPath {
    /// Path from explicit segments
    pub fn new(segments: Vec<ChildIndex>) -> Self {
        Self { segments }
    }

    /// The master path `m`
    pub fn master() -> Self {
        Self::default()
    }

    /// Wallet path `m/44'/<coin_type>'/<account>'/0'`
    pub fn for_account(coin_type: u32, account: u32) -> Result<Self> {
        Ok(Self::new(vec![
            ChildIndex::hardened(BIP44_PURPOSE)?,
            ChildIndex::hardened(coin_type)?,
            ChildIndex::hardened(account)?,
            ChildIndex::hardened(0)?,
        ]))
    }

    /// Segments after `m`
    pub fn segments(&self) -> &[ChildIndex] {
        &self.segments
    }

    /// Number of segments after `m`
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether every segment is hardened
    pub fn is_fully_hardened(&self) -> bool {
        self.segments.iter().all(|s| s.is_hardened())
    }

    /// Account segment of a BIP-44 path, if present
    pub fn account(&self) -> Option<u32> {
        self.segments.get(2).map(|s| s.index())
    }

    /// Copy of this path with one more segment
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut segments = self.segments.clone();
        segments.push(index);
        Self { segments }
    }

    fn ensure_hardened(&self) -> Result<()> {
        match self.segments.iter().position(|s| !s.is_hardened()) {
            Some(position) => Err(WalletError::NonHardenedSegment {
                path: self.to_string(),
                position,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(WalletError::InvalidPath(format!(
                    "'{s}' must start with 'm'"
                )))
            }
        }
        let segments = parts.map(ChildIndex::from_str).collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }
}

/// Private key and chain code produced by one derivation step
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeyMaterial {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl DerivedKeyMaterial {
    fn from_hmac(mac: HmacSha512) -> Self {
        let mut output = Zeroizing::new([0u8; 64]);
        output.copy_from_slice(&mac.finalize().into_bytes());
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..]);
        Self { key, chain_code }
    }

    /// 32-byte Ed25519 secret seed (IL)
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// 32-byte chain code (IR)
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    fn hardened_child(&self, index: u32) -> Result<Self> {
        let mut mac = new_mac(&self.chain_code)?;
        mac.update(&[0u8]);
        mac.update(&self.key);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        Ok(Self::from_hmac(mac))
    }
}

impl fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKeyMaterial([REDACTED])")
    }
}

fn new_mac(key: &[u8]) -> Result<HmacSha512> {
    HmacSha512::new_from_slice(key).map_err(|e| WalletError::Crypto(e.to_string()))
}

/// Master node for `seed`
pub fn master_key(seed: &[u8]) -> Result<DerivedKeyMaterial> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(WalletError::KeyLength {
            expected: MAX_SEED_LEN,
            actual: seed.len(),
        });
    }
    let mut mac = new_mac(MASTER_HMAC_KEY)?;
    mac.update(seed);
    Ok(DerivedKeyMaterial::from_hmac(mac))
}

/// Derive the key material at `path` from a BIP-39 seed
pub fn derive(seed: &Seed, path: &DerivationPath) -> Result<DerivedKeyMaterial> {
    derive_from_seed_bytes(seed.as_bytes(), path)
}

/// Derive from raw seed bytes (16 to 64 bytes)
pub fn derive_from_seed_bytes(seed: &[u8], path: &DerivationPath) -> Result<DerivedKeyMaterial> {
    path.ensure_hardened()?;

    let mut node = master_key(seed)?;
    for segment in path.segments() {
        node = node.hardened_child(segment.index())?;
    }

    debug!(path = %path, depth = path.depth(), "Derived key material");
    Ok(node)
}

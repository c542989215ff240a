//! A single derived wallet.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::derivation::{derive, DerivationPath};
use crate::keypair::{Keypair, PublicKey};
use crate::seed::Seed;
use crate::Result;

/// Wallet derived at `m/44'/<coin_type>'/<account_index>'/0'`
#[derive(Clone, PartialEq, Eq)]
pub struct Wallet {
    pub(crate) id: String,
    account_index: u32,
    path: DerivationPath,
    keypair: Keypair,
}

impl Wallet {
    /// Registry id (public key fingerprint, suffixed on collision)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Account segment of the derivation path
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Full derivation path
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Signing keypair
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Public key
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        self.public_key().to_hex()
    }

    /// 64-byte private key as lowercase hex
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.keypair.to_bytes().as_slice()))
    }

    /// Base58 ledger address
    pub fn address(&self) -> String {
        self.public_key().to_base58()
    }

    /// Exportable record including the private key
    pub fn export(&self) -> WalletExport {
        WalletExport {
            id: self.id.clone(),
            public_key: self.public_key_hex(),
            private_key: self.private_key_hex().to_string(),
            path: self.path.to_string(),
            address: self.address(),
            account_index: self.account_index,
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("id", &self.id)
            .field("account_index", &self.account_index)
            .field("path", &self.path.to_string())
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Serializable wallet record
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct WalletExport {
    /// Registry id
    pub id: String,
    /// Lowercase hex public key
    pub public_key: String,
    /// Lowercase hex 64-byte private key
    pub private_key: String,
    /// Derivation path text
    pub path: String,
    /// Base58 ledger address
    pub address: String,
    /// Account segment of the path
    pub account_index: u32,
}

impl fmt::Debug for WalletExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletExport")
            .field("id", &self.id)
            .field("public_key", &self.public_key)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Derive the wallet for `account` without touching any registry
pub fn derive_wallet(seed: &Seed, coin_type: u32, account: u32) -> Result<Wallet> {
    let path = DerivationPath::for_account(coin_type, account)?;
    let material = derive(seed, &path)?;
    let keypair = Keypair::from_seed(&material);
    Ok(Wallet {
        id: keypair.fingerprint(),
        account_index: account,
        path,
        keypair,
    })
}

//! Wallet-extension providers and connection bookkeeping.
//!
//! Besides wallets derived from a mnemonic, a user can fund an address typed in
//! by hand or one exposed by a browser-extension wallet. Extension wallets sit
//! behind [`WalletProvider`]; this crate never talks to a real extension.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::keypair::PublicKey;
use crate::{Result, WalletError};

/// Known extension wallets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Phantom
    Phantom,
    /// Solflare
    Solflare,
    /// Backpack
    Backpack,
    /// Coinbase Wallet
    Coinbase,
}

impl ProviderKind {
    /// Every provider, in display order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Phantom,
        ProviderKind::Solflare,
        ProviderKind::Backpack,
        ProviderKind::Coinbase,
    ];

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "Phantom",
            ProviderKind::Solflare => "Solflare",
            ProviderKind::Backpack => "Backpack",
            ProviderKind::Coinbase => "Coinbase Wallet",
        }
    }

    /// Where users install the extension
    pub fn install_url(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "https://phantom.app/",
            ProviderKind::Solflare => "https://solflare.com/",
            ProviderKind::Backpack => "https://backpack.app/",
            ProviderKind::Coinbase => "https://www.coinbase.com/wallet",
        }
    }

    fn not_installed(self) -> WalletError {
        WalletError::ProviderNotInstalled {
            provider: self.display_name().to_string(),
            install_url: self.install_url().to_string(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phantom" => Ok(ProviderKind::Phantom),
            "solflare" => Ok(ProviderKind::Solflare),
            "backpack" => Ok(ProviderKind::Backpack),
            "coinbase" | "coinbase wallet" => Ok(ProviderKind::Coinbase),
            other => Err(WalletError::ProviderConnection {
                provider: other.to_string(),
                message: "unknown wallet provider".to_string(),
            }),
        }
    }
}

/// Capability exposed by an extension wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Which wallet this is
    fn kind(&self) -> ProviderKind;

    /// Whether the extension is present
    fn is_installed(&self) -> bool {
        true
    }

    /// Ask the user to approve a connection and return the exposed public key
    async fn connect(&self) -> Result<PublicKey>;

    /// Drop the connection
    async fn disconnect(&self) -> Result<()>;

    /// Currently exposed public key, if connected
    fn public_key(&self) -> Option<PublicKey>;
}

/// How the funded address was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMethod {
    /// Typed in by hand
    Manual,
    /// Exposed by an extension wallet
    Extension,
}

/// The address currently selected for funding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// How it was supplied
    pub method: ConnectionMethod,
    /// Extension that exposed it, for [`ConnectionMethod::Extension`]
    pub provider: Option<ProviderKind>,
    /// The address
    pub address: PublicKey,
}

impl Connection {
    /// Manual connection to a validated base58 address
    pub fn manual(address: &str) -> Result<Self> {
        Ok(Self {
            method: ConnectionMethod::Manual,
            provider: None,
            address: PublicKey::from_base58(address.trim())?,
        })
    }
}

/// Registered providers plus the active connection
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn WalletProvider>>,
    connection: Option<Connection>,
}

impl ProviderRegistry {
    /// Registry with no providers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a provider
    pub fn register(&mut self, provider: Arc<dyn WalletProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    /// Provider for `kind`, if registered
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn WalletProvider>> {
        self.providers.get(&kind).cloned()
    }

    /// Installed providers, in display order
    pub fn available(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.get(kind).is_some_and(|p| p.is_installed()))
            .collect()
    }

    /// Active connection
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Connect through an extension wallet
    pub async fn connect(&mut self, kind: ProviderKind) -> Result<&Connection> {
        let provider = self
            .get(kind)
            .filter(|p| p.is_installed())
            .ok_or_else(|| kind.not_installed())?;

        self.disconnect().await;

        let address = provider.connect().await?;
        info!(provider = %kind, address = %address, "Wallet connected");
        let connection: &Connection = self.connection.insert(Connection {
            method: ConnectionMethod::Extension,
            provider: Some(kind),
            address,
        });
        Ok(connection)
    }

    /// Use a hand-entered address
    pub async fn connect_manual(&mut self, address: &str) -> Result<&Connection> {
        let connection = Connection::manual(address)?;
        self.disconnect().await;
        info!(address = %connection.address, "Manual address connected");
        let connection: &Connection = self.connection.insert(connection);
        Ok(connection)
    }

    /// Drop the active connection.
    ///
    /// Provider errors are logged and otherwise ignored; the connection is
    /// always cleared.
    pub async fn disconnect(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        if let Some(provider) = connection.provider.and_then(|kind| self.get(kind)) {
            if let Err(e) = provider.disconnect().await {
                warn!(provider = %provider.kind(), error = %e, "Provider disconnect failed");
            }
        }
        info!(method = ?connection.method, "Wallet disconnected");
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("connection", &self.connection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metadata() {
        assert_eq!(ProviderKind::ALL.len(), 4);
        assert_eq!(ProviderKind::Phantom.install_url(), "https://phantom.app/");
        assert_eq!(ProviderKind::Coinbase.to_string(), "Coinbase Wallet");
        assert_eq!("SOLFLARE".parse::<ProviderKind>().unwrap(), ProviderKind::Solflare);
        assert!("metamask".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_manual_connection_validates() {
        let address = bs58::encode([3u8; 32]).into_string();
        let connection = Connection::manual(&format!(" {address} ")).unwrap();
        assert_eq!(connection.method, ConnectionMethod::Manual);
        assert_eq!(connection.address.to_base58(), address);

        assert!(Connection::manual("not-an-address").is_err());
    }

    #[tokio::test]
    async fn test_missing_provider_reports_install_url() {
        let mut registry = ProviderRegistry::new();
        let err = registry.connect(ProviderKind::Backpack).await.unwrap_err();
        assert_eq!(
            err,
            WalletError::ProviderNotInstalled {
                provider: "Backpack".to_string(),
                install_url: "https://backpack.app/".to_string(),
            }
        );
        assert!(registry.available().is_empty());
    }
}

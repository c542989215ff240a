//! Display helpers for amounts, addresses and explorer links.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{lamports_to_sol, Network};

/// Decimal places shown for SOL amounts
pub const SOL_DISPLAY_DECIMALS: u32 = 4;

/// Addresses this short or shorter are shown in full
pub const SHORTEN_THRESHOLD: usize = 16;

/// Characters kept on each side by the long form
pub const LONG_ADDRESS_EDGE: usize = 8;

/// Characters kept on each side by the compact form
pub const SHORT_ADDRESS_EDGE: usize = 4;

const EXPLORER_BASE: &str = "https://explorer.solana.com";

/// Render `amount` truncated to four decimals, e.g. `1.5000 SOL`
pub fn format_sol(amount: Decimal) -> String {
    let truncated = amount.round_dp_with_strategy(SOL_DISPLAY_DECIMALS, RoundingStrategy::ToZero);
    format!("{truncated:.4} SOL")
}

/// Render a lamport balance as SOL
pub fn format_lamports(lamports: u64) -> String {
    format_sol(lamports_to_sol(lamports))
}

/// `first-n...last-n` for addresses longer than 16 characters
pub fn shorten_address(address: &str, edge: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= SHORTEN_THRESHOLD || edge.saturating_mul(2) >= chars.len() {
        return address.to_string();
    }
    let head: String = chars[..edge].iter().collect();
    let tail: String = chars[chars.len() - edge..].iter().collect();
    format!("{head}...{tail}")
}

/// Explorer page for a transaction
pub fn explorer_tx_url(signature: &str, network: Network) -> String {
    format!("{EXPLORER_BASE}/tx/{signature}?cluster={}", network.cluster())
}

/// Explorer page for an account
pub fn explorer_address_url(address: &str, network: Network) -> String {
    format!("{EXPLORER_BASE}/address/{address}?cluster={}", network.cluster())
}

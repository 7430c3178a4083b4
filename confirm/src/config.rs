//! Tunable limits and timeouts for the confirmation workflow.

use std::time::Duration;

use wallet_api::fiat_currency::FiatCurrency;
use wallet_api::money::Money;

/// Amount limits enforced by the amount validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Most that may be sent to a contact without a registered wallet.
    pub invitation_maximum: Money,
    /// Smallest on-chain output worth broadcasting.
    pub on_chain_minimum_sats: i64,
    /// Smallest lightning payment.
    pub lightning_minimum_sats: i64,
    /// Smallest amount accepted when moving funds into the lightning wallet.
    pub lightning_reload_minimum: Money,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            invitation_maximum: Money::fiat(10_000, FiatCurrency::USD),
            on_chain_minimum_sats: 546,
            lightning_minimum_sats: 1,
            lightning_reload_minimum: Money::fiat(500, FiatCurrency::USD),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationConfig {
    /// Offer fast/slow/cheap tiers. When off, only the standard fee is used.
    pub adjustable_fees_enabled: bool,
    /// Upper bound on a single fee recomputation by the wallet engine.
    pub fee_recompute_timeout: Duration,
    pub limits: ValidationLimits,
    /// Network that on-chain payment targets must belong to.
    pub network: bitcoin::Network,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            adjustable_fees_enabled: true,
            fee_recompute_timeout: Duration::from_secs(10),
            limits: ValidationLimits::default(),
            network: bitcoin::Network::Bitcoin,
        }
    }
}

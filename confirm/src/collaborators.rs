//! Services the confirmation workflow calls but does not implement.

use std::sync::Arc;

use async_trait::async_trait;
use wallet_api::fee_mode::TransactionFeeMode;
use wallet_api::money::Money;
pub use wallet_api::prefs::settings_store::SettingsStore;
pub use wallet_api::rate_cache::RateSource;
use wallet_api::ApiError;

use crate::fee::TransactionData;
use crate::intent::LightningPaymentIntent;
use crate::intent::OnChainPaymentIntent;
use crate::intent::OutgoingInvitation;
use crate::recipient::WalletTransactionType;
use crate::validation::SpendableBalances;

/// The wallet engine's transaction builder.
#[async_trait]
pub trait FeeEstimator: Send + Sync {
    /// Builds the transaction for a fee tier, or `None` if it is unaffordable.
    async fn compute_transaction_data(&self, mode: TransactionFeeMode) -> Option<TransactionData>;
}

/// Spendable balance, net of pending spends.
pub trait BalanceSource: Send + Sync {
    fn spendable_balance(&self, wallet: WalletTransactionType) -> Money;
}

impl BalanceSource for SpendableBalances {
    fn spendable_balance(&self, wallet: WalletTransactionType) -> Money {
        self.for_wallet(wallet)
    }
}

/// Dispatches confirmed payments.
#[async_trait]
pub trait PaymentSender: Send + Sync {
    async fn send_on_chain_payment(&self, intent: &OnChainPaymentIntent) -> Result<(), ApiError>;

    async fn send_lightning_payment(&self, intent: &LightningPaymentIntent) -> Result<(), ApiError>;

    async fn send_invite(&self, invitation: &OutgoingInvitation) -> Result<(), ApiError>;
}

/// Everything a `ConfirmationController` depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub fee_estimator: Arc<dyn FeeEstimator>,
    pub balances: Arc<dyn BalanceSource>,
    pub rates: Arc<dyn RateSource>,
    pub sender: Arc<dyn PaymentSender>,
    pub settings: Arc<dyn SettingsStore>,
}

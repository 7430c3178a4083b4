use thiserror::Error;
use wallet_api::fee_mode::TransactionFeeMode;
use wallet_api::fiat_currency::FiatCurrency;
use wallet_api::money::Currency;
use wallet_api::money::Money;

use crate::controller::ConfirmationState;
use crate::controller::PaymentKind;

/// Why an amount cannot be sent. Each variant carries the violated limit.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountValidationError {
    #[error("amount exceeds the spendable balance of {}", .spendable.to_btc_string())]
    InsufficientFunds { spendable: Money },
    #[error("amount exceeds the invitation maximum of {}", .0.to_grouped_string_with_symbol())]
    InvitationMaximum(Money),
    #[error("amount is below the minimum of {}", display_limit(.0))]
    BelowMinimum(Money),
    #[error("no exchange rate available for {0}")]
    MissingExchangeRate(Currency),
}

fn display_limit(limit: &Money) -> String {
    match limit.currency() {
        Currency::BTC => limit.to_sats_string(),
        Currency::Fiat(_) => limit.to_grouped_string_with_symbol(),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StringValidationError {
    #[error("value is empty")]
    Empty,
    #[error("invalid bitcoin address: {0}")]
    InvalidBitcoinAddress(String),
}

/// The wallet cannot afford the requested fee tier.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the {} fee costs more than the wallet can spend", .mode.title())]
pub struct FeeTooExpensiveError {
    pub mode: TransactionFeeMode,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no transaction data is available for the selected fee")]
pub struct MissingTransactionDataError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeChangeError {
    #[error(transparent)]
    TooExpensive(#[from] FeeTooExpensiveError),
    #[error("this payment's fee cannot be adjusted")]
    NotAdjustable,
    #[error("cannot change the fee while {0:?}")]
    Busy(ConfirmationState),
    #[error("recomputing the {} fee timed out", .0.title())]
    TimedOut(TransactionFeeMode),
    #[error("fee recomputation was superseded")]
    Superseded,
}

#[derive(Error, Debug)]
pub enum ConfirmationError {
    #[error(transparent)]
    Validation(#[from] AmountValidationError),
    #[error("invalid payment target: {0}")]
    InvalidPaymentTarget(#[from] StringValidationError),
    #[error(transparent)]
    MissingTransactionData(#[from] MissingTransactionDataError),
    #[error("no recipient has been set")]
    MissingRecipient,
    #[error("recipient cannot receive {0:?} payments")]
    RecipientMismatch(PaymentKind),
    #[error("no exchange rate available for {0:?}")]
    MissingExchangeRate(FiatCurrency),
    #[error("cannot confirm while {0:?}")]
    Busy(ConfirmationState),
    #[error("payment dispatch failed: {0}")]
    Dispatch(#[source] anyhow::Error),
}

//! What a confirmed payment hands to the payment-sending layer.

use serde::Serialize;
use wallet_api::exchange_rates::ExchangeRates;
use wallet_api::money::Money;

use crate::controller::PaymentKind;
use crate::fee::TransactionData;
use crate::recipient::ContactRecipient;
use crate::recipient::WalletTransactionType;
use crate::view_model::OutgoingTransactionData;
use crate::view_model::SharedPayload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnChainPaymentIntent {
    pub transaction_data: TransactionData,
    pub rates: ExchangeRates,
    pub outgoing: OutgoingTransactionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightningPaymentIntent {
    pub satoshi_amount: u64,
    /// Set when paying a raw invoice; contacts are paid through `receiver`.
    pub invoice: Option<String>,
    pub receiver: Option<ContactRecipient>,
    pub shared_payload: Option<SharedPayload>,
}

/// A payment to a contact who has no wallet address on file yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingInvitation {
    pub contact: ContactRecipient,
    pub btc_amount: Money,
    pub fiat_amount: Money,
    pub fee_sats: u64,
    pub wallet_type: WalletTransactionType,
    pub shared_payload: Option<SharedPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutgoingPaymentIntent {
    OnChain(OnChainPaymentIntent),
    Lightning(LightningPaymentIntent),
    Invite(OutgoingInvitation),
}

impl OutgoingPaymentIntent {
    pub fn kind(&self) -> PaymentKind {
        match self {
            Self::OnChain(_) => PaymentKind::OnChain,
            Self::Lightning(_) => PaymentKind::Lightning,
            Self::Invite(_) => PaymentKind::Invite,
        }
    }
}

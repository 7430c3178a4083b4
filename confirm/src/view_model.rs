//! Amount, currency and recipient state of a pending payment.

use serde::Serialize;
use wallet_api::converter::CurrencyConverter;
use wallet_api::converter::CurrencyPair;
use wallet_api::exchange_rates::ExchangeRates;
use wallet_api::money::Currency;
use wallet_api::money::Money;

use crate::fee::ConfirmTransactionFeeModel;
use crate::recipient::ContactRecipient;
use crate::recipient::PaymentRecipient;
use crate::recipient::WalletTransactionType;

/// Primary and secondary display strings for an amount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DualAmountLabels {
    pub primary: String,
    pub secondary: String,
}

/// Memo metadata shared with the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedPayload {
    pub memo: String,
    /// True only when the user wants to share and sharing is allowed.
    pub share: bool,
}

/// The payment instruction handed to the wallet layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingTransactionData {
    pub amount_sats: u64,
    pub fee_sats: u64,
    /// The raw address or invoice, for payment-target recipients.
    pub destination: Option<String>,
    pub contact: Option<ContactRecipient>,
    pub shared_payload: Option<SharedPayload>,
}

/// Holds a pending payment and derives display-ready values from it.
///
/// Nothing is cached: labels are recomputed from the current amount, rates
/// and wallet type on every call. The amount is kept in the currency it was
/// entered in, so a fiat amount entered before rates load survives until
/// they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentViewModel {
    amount: Money,
    exchange_rates: ExchangeRates,
    currency_pair: CurrencyPair,
    payment_recipient: Option<PaymentRecipient>,
    memo: Option<String>,
    shared_memo_desired: bool,
    shared_memo_allowed: bool,
    wallet_transaction_type: WalletTransactionType,
}

impl PaymentViewModel {
    /// `amount` may be in BTC or fiat; it is converted to BTC on demand.
    pub fn new(
        amount: Money,
        exchange_rates: ExchangeRates,
        currency_pair: CurrencyPair,
        wallet_transaction_type: WalletTransactionType,
    ) -> Self {
        Self {
            amount,
            exchange_rates,
            currency_pair,
            payment_recipient: None,
            memo: None,
            shared_memo_desired: false,
            shared_memo_allowed: false,
            wallet_transaction_type,
        }
    }

    pub fn with_recipient(mut self, recipient: PaymentRecipient) -> Self {
        self.payment_recipient = Some(recipient);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>, share_desired: bool, share_allowed: bool) -> Self {
        self.memo = Some(memo.into());
        self.shared_memo_desired = share_desired;
        self.shared_memo_allowed = share_allowed;
        self
    }

    // --- Getters ---

    /// The amount as entered.
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// The amount in BTC, or `None` while no rate for a fiat amount is known.
    pub fn btc_amount(&self) -> Option<Money> {
        wallet_api::converter::convert(&self.exchange_rates, self.amount, Currency::BTC)
    }

    pub fn exchange_rates(&self) -> &ExchangeRates {
        &self.exchange_rates
    }

    pub fn currency_pair(&self) -> CurrencyPair {
        self.currency_pair
    }

    pub fn payment_recipient(&self) -> Option<&PaymentRecipient> {
        self.payment_recipient.as_ref()
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    pub fn shared_memo_desired(&self) -> bool {
        self.shared_memo_desired
    }

    pub fn shared_memo_allowed(&self) -> bool {
        self.shared_memo_allowed
    }

    pub fn wallet_transaction_type(&self) -> WalletTransactionType {
        self.wallet_transaction_type
    }

    // --- Mutators ---

    pub fn set_btc_amount(&mut self, sats: u64) {
        self.amount = Money::from_sats(i64::try_from(sats).unwrap_or(i64::MAX));
    }

    pub fn set_exchange_rates(&mut self, rates: ExchangeRates) {
        self.exchange_rates = rates;
    }

    pub fn set_currency_pair(&mut self, pair: CurrencyPair) {
        self.currency_pair = pair;
    }

    pub fn set_recipient(&mut self, recipient: Option<PaymentRecipient>) {
        self.payment_recipient = recipient;
    }

    /// Switches between on-chain and lightning.
    ///
    /// Addresses and invoices are not interchangeable, so a raw payment target
    /// is cleared when the type actually changes. Contacts are kept.
    pub fn set_wallet_transaction_type(&mut self, wallet: WalletTransactionType) {
        if wallet == self.wallet_transaction_type {
            return;
        }
        self.wallet_transaction_type = wallet;
        if matches!(self.payment_recipient, Some(PaymentRecipient::PaymentTarget(_))) {
            tracing::debug!("clearing payment target after switching to {wallet:?}");
            self.payment_recipient = None;
        }
    }

    // --- Derived values ---

    /// A converter over the current amount, rates and currency pair.
    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(
            self.exchange_rates.clone(),
            self.amount,
            self.currency_pair,
        )
    }

    /// Labels for the current wallet type.
    pub fn labels(&self) -> DualAmountLabels {
        self.dual_amount_labels(self.wallet_transaction_type)
    }

    /// Formats the amount in the primary and secondary currencies.
    ///
    /// BTC is shown as "₿0.125" on-chain and "12,500,000 sats" on lightning;
    /// fiat as "$1,000.00". A side without a known rate renders empty.
    pub fn dual_amount_labels(&self, wallet: WalletTransactionType) -> DualAmountLabels {
        let converter = self.converter();
        let format = |amount: Option<Money>| -> String {
            match amount {
                Some(money) if money.currency().is_btc() => match wallet {
                    WalletTransactionType::OnChain => money.to_btc_string(),
                    WalletTransactionType::Lightning => money.to_sats_string(),
                },
                Some(money) => money.to_grouped_string_with_symbol(),
                None => String::new(),
            }
        };
        DualAmountLabels {
            primary: format(converter.primary_amount()),
            secondary: format(converter.secondary_amount()),
        }
    }

    /// The memo to attach, if any.
    pub fn shared_payload(&self) -> Option<SharedPayload> {
        self.memo
            .as_ref()
            .filter(|memo| !memo.trim().is_empty())
            .map(|memo| SharedPayload {
                memo: memo.clone(),
                share: self.shared_memo_desired && self.shared_memo_allowed,
            })
    }

    /// Assembles the instruction for the wallet layer. The fee model's
    /// transaction data, when present, decides the final amount and fee;
    /// otherwise the amount is zero until its BTC value is known.
    pub fn outgoing_transaction_data(
        &self,
        fee_model: &ConfirmTransactionFeeModel,
    ) -> OutgoingTransactionData {
        let amount_sats = fee_model
            .transaction_data()
            .map(|data| data.amount_sats)
            .unwrap_or_else(|| {
                self.btc_amount()
                    .map_or(0, |btc| btc.as_minor_units().max(0).unsigned_abs())
            });
        OutgoingTransactionData {
            amount_sats,
            fee_sats: fee_model.network_fee_sats(),
            destination: self
                .payment_recipient
                .as_ref()
                .and_then(|r| r.payment_target())
                .map(str::to_string),
            contact: self
                .payment_recipient
                .as_ref()
                .and_then(|r| r.contact())
                .cloned(),
            shared_payload: self.shared_payload(),
        }
    }
}

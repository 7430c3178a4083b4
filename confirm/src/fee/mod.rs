//! Network fee strategies for a pending payment.

mod adjustable;

pub use adjustable::AdjustableFeeModel;
pub use adjustable::AdjustableFeeSegment;
pub use adjustable::FeeCandidates;

use serde::Deserialize;
use serde::Serialize;
use wallet_api::fee_mode::TransactionFeeMode;

/// A concrete candidate transaction computed by the wallet engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionData {
    pub amount_sats: u64,
    pub fee_sats: u64,
    pub change_sats: u64,
}

impl TransactionData {
    pub fn new(amount_sats: u64, fee_sats: u64) -> Self {
        Self {
            amount_sats,
            fee_sats,
            change_sats: 0,
        }
    }

    pub fn with_change(mut self, change_sats: u64) -> Self {
        self.change_sats = change_sats;
        self
    }

    /// Amount plus fee.
    pub fn total_sats(&self) -> u64 {
        self.amount_sats.saturating_add(self.fee_sats)
    }
}

/// A fee fixed by the situation rather than chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedFee {
    pub fee_sats: u64,
    pub transaction_data: Option<TransactionData>,
}

impl From<TransactionData> for FixedFee {
    fn from(data: TransactionData) -> Self {
        Self {
            fee_sats: data.fee_sats,
            transaction_data: Some(data),
        }
    }
}

/// The fee situation of a confirmation screen.
///
/// Only `Adjustable` can change after construction; the other variants are
/// display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, strum::EnumIs)]
pub enum ConfirmTransactionFeeModel {
    Adjustable(AdjustableFeeModel),
    Required(FixedFee),
    Standard(FixedFee),
    Lightning { fee_sats: u64 },
}

impl ConfirmTransactionFeeModel {
    /// Builds the on-chain fee model from per-tier candidates.
    ///
    /// With adjustable fees enabled the user may pick among affordable tiers;
    /// otherwise the default tier is used as the standard fee. Returns `None`
    /// when the relevant tier(s) are unaffordable.
    pub fn on_chain(
        candidates: FeeCandidates,
        adjustable_fees_enabled: bool,
        preferred: TransactionFeeMode,
    ) -> Option<Self> {
        if adjustable_fees_enabled {
            AdjustableFeeModel::new(candidates, preferred).map(Self::Adjustable)
        } else {
            candidates
                .get(TransactionFeeMode::default())
                .cloned()
                .map(|data| Self::Standard(data.into()))
        }
    }

    pub fn required(data: TransactionData) -> Self {
        Self::Required(data.into())
    }

    pub fn lightning(fee_sats: u64) -> Self {
        Self::Lightning { fee_sats }
    }

    pub fn adjustable(&self) -> Option<&AdjustableFeeModel> {
        match self {
            Self::Adjustable(model) => Some(model),
            _ => None,
        }
    }

    pub fn network_fee_sats(&self) -> u64 {
        match self {
            Self::Adjustable(model) => model.network_fee_sats(),
            Self::Required(fixed) | Self::Standard(fixed) => fixed.fee_sats,
            Self::Lightning { fee_sats } => *fee_sats,
        }
    }

    /// The transaction that will actually be sent, when one applies.
    pub fn transaction_data(&self) -> Option<&TransactionData> {
        match self {
            Self::Adjustable(model) => model.transaction_data(),
            Self::Required(fixed) | Self::Standard(fixed) => fixed.transaction_data.as_ref(),
            Self::Lightning { .. } => None,
        }
    }

    /// Amount plus fee of the transaction to be sent, if known.
    pub fn total_sats(&self) -> Option<u64> {
        self.transaction_data().map(TransactionData::total_sats)
    }
}

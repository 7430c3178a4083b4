use std::collections::HashSet;

use strum::IntoEnumIterator;
use wallet_api::converter::CurrencyConverter;
use wallet_api::money::Currency;
use wallet_api::money::Money;

use super::Validator;
use crate::config::ValidationLimits;
use crate::error::AmountValidationError;
use crate::recipient::WalletTransactionType;

/// An independently skippable amount check. Checks run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum AmountValidationCategory {
    UsableBalance,
    InvitationMaximum,
    TransactionMinimum,
}

/// Spendable balance of each wallet, net of pending spends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendableBalances {
    pub on_chain: Money,
    pub lightning: Money,
}

impl SpendableBalances {
    pub fn from_sats(on_chain: i64, lightning: i64) -> Self {
        Self {
            on_chain: Money::from_sats(on_chain),
            lightning: Money::from_sats(lightning),
        }
    }

    pub fn for_wallet(&self, wallet: WalletTransactionType) -> Money {
        match wallet {
            WalletTransactionType::OnChain => self.on_chain,
            WalletTransactionType::Lightning => self.lightning,
        }
    }
}

/// Validates the amount held by a `CurrencyConverter`.
#[derive(Debug, Clone)]
pub struct CurrencyAmountValidator {
    balances: SpendableBalances,
    wallet: WalletTransactionType,
    limits: ValidationLimits,
    ignoring: HashSet<AmountValidationCategory>,
    is_invitation: bool,
    is_reload: bool,
}

impl CurrencyAmountValidator {
    pub fn new(
        balances: SpendableBalances,
        wallet: WalletTransactionType,
        limits: ValidationLimits,
    ) -> Self {
        Self {
            balances,
            wallet,
            limits,
            ignoring: HashSet::new(),
            is_invitation: false,
            is_reload: false,
        }
    }

    /// Skips the given categories.
    pub fn ignoring(mut self, categories: impl IntoIterator<Item = AmountValidationCategory>) -> Self {
        self.ignoring.extend(categories);
        self
    }

    /// Marks the recipient as an unregistered contact, enabling the invitation maximum.
    pub fn invitation(mut self, is_invitation: bool) -> Self {
        self.is_invitation = is_invitation;
        self
    }

    /// Marks the amount as a transfer into the lightning wallet.
    pub fn reload(mut self, is_reload: bool) -> Self {
        self.is_reload = is_reload;
        self
    }

    fn check(
        &self,
        category: AmountValidationCategory,
        converter: &CurrencyConverter,
    ) -> Result<(), AmountValidationError> {
        match category {
            AmountValidationCategory::UsableBalance => {
                let btc = btc_amount(converter)?;
                let spendable = self.balances.for_wallet(self.wallet);
                if btc > spendable {
                    return Err(AmountValidationError::InsufficientFunds { spendable });
                }
            }
            AmountValidationCategory::InvitationMaximum => {
                if !self.is_invitation {
                    return Ok(());
                }
                let limit = self.limits.invitation_maximum;
                let amount = converter.from_amount();
                let limit_in_amount_currency = converter
                    .convert(limit, amount.currency())
                    .ok_or(AmountValidationError::MissingExchangeRate(limit.currency()))?;
                if amount > limit_in_amount_currency {
                    return Err(AmountValidationError::InvitationMaximum(limit));
                }
            }
            AmountValidationCategory::TransactionMinimum => {
                let btc = btc_amount(converter)?;
                let minimum = self.minimum();
                let minimum_btc = converter
                    .convert(minimum, Currency::BTC)
                    .ok_or(AmountValidationError::MissingExchangeRate(minimum.currency()))?;
                if btc < minimum_btc {
                    return Err(AmountValidationError::BelowMinimum(minimum));
                }
            }
        }
        Ok(())
    }

    fn minimum(&self) -> Money {
        match self.wallet {
            WalletTransactionType::OnChain => Money::from_sats(self.limits.on_chain_minimum_sats),
            WalletTransactionType::Lightning if self.is_reload => {
                self.limits.lightning_reload_minimum
            }
            WalletTransactionType::Lightning => {
                Money::from_sats(self.limits.lightning_minimum_sats)
            }
        }
    }
}

fn btc_amount(converter: &CurrencyConverter) -> Result<Money, AmountValidationError> {
    converter
        .btc_amount()
        .ok_or(AmountValidationError::MissingExchangeRate(
            converter.from_amount().currency(),
        ))
}

impl Validator<CurrencyConverter> for CurrencyAmountValidator {
    type Error = AmountValidationError;

    fn validate(&self, converter: &CurrencyConverter) -> Result<(), Self::Error> {
        AmountValidationCategory::iter()
            .filter(|category| !self.ignoring.contains(category))
            .try_for_each(|category| self.check(category, converter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_api::converter::CurrencyPair;
    use wallet_api::exchange_rates::ExchangeRates;
    use wallet_api::fiat_currency::FiatCurrency;

    fn rates() -> ExchangeRates {
        ExchangeRates::new().with_price(Money::fiat(800_000, FiatCurrency::USD))
    }

    fn usd(cents: i64) -> Money {
        Money::fiat(cents, FiatCurrency::USD)
    }

    fn converter(amount: Money) -> CurrencyConverter {
        CurrencyConverter::new(rates(), amount, CurrencyPair::fiat_primary(FiatCurrency::USD))
    }

    fn validator() -> CurrencyAmountValidator {
        CurrencyAmountValidator::new(
            SpendableBalances::from_sats(100_000_000, 1_000_000),
            WalletTransactionType::OnChain,
            ValidationLimits::default(),
        )
    }

    #[test]
    fn invitation_above_maximum_is_rejected() {
        // 1000 USD at 8000 USD/BTC, expressed in BTC
        let amount = converter(Money::from_sats(12_500_000));
        let result = validator()
            .invitation(true)
            .ignoring([AmountValidationCategory::UsableBalance])
            .validate(&amount);
        assert_eq!(result, Err(AmountValidationError::InvitationMaximum(usd(10_000))));

        // and expressed in USD
        assert_eq!(
            validator().invitation(true).validate(&converter(usd(100_000))),
            Err(AmountValidationError::InvitationMaximum(usd(10_000)))
        );
    }

    #[test]
    fn invitation_at_maximum_is_accepted() {
        let exactly_100_usd = converter(Money::from_sats(1_250_000));
        assert_eq!(
            validator()
                .invitation(true)
                .ignoring([AmountValidationCategory::UsableBalance])
                .validate(&exactly_100_usd),
            Ok(())
        );
        assert_eq!(validator().invitation(true).validate(&converter(usd(10_000))), Ok(()));
        assert_eq!(validator().invitation(true).validate(&converter(usd(9_999))), Ok(()));
    }

    #[test]
    fn invitation_maximum_only_applies_to_invitations() {
        let amount = converter(usd(100_000));
        assert_eq!(validator().validate(&amount), Ok(()));
    }

    #[test]
    fn amount_above_balance_is_insufficient() {
        let validator = CurrencyAmountValidator::new(
            SpendableBalances::from_sats(10_000, 50_000),
            WalletTransactionType::OnChain,
            ValidationLimits::default(),
        );
        assert_eq!(
            validator.validate(&converter(Money::from_sats(10_001))),
            Err(AmountValidationError::InsufficientFunds {
                spendable: Money::from_sats(10_000)
            })
        );
        assert_eq!(validator.validate(&converter(Money::from_sats(10_000))), Ok(()));

        let lightning = CurrencyAmountValidator::new(
            SpendableBalances::from_sats(10_000, 50_000),
            WalletTransactionType::Lightning,
            ValidationLimits::default(),
        );
        assert_eq!(lightning.validate(&converter(Money::from_sats(20_000))), Ok(()));
    }

    #[test]
    fn dust_is_below_minimum() {
        assert_eq!(
            validator().validate(&converter(Money::from_sats(545))),
            Err(AmountValidationError::BelowMinimum(Money::from_sats(546)))
        );
        assert_eq!(validator().validate(&converter(Money::from_sats(546))), Ok(()));
        assert_eq!(
            validator()
                .ignoring([AmountValidationCategory::TransactionMinimum])
                .validate(&converter(Money::from_sats(0))),
            Ok(())
        );
    }

    #[test]
    fn lightning_payment_needs_one_sat() {
        let lightning = CurrencyAmountValidator::new(
            SpendableBalances::from_sats(0, 1_000_000),
            WalletTransactionType::Lightning,
            ValidationLimits::default(),
        );
        assert_eq!(
            lightning.validate(&converter(Money::from_sats(0))),
            Err(AmountValidationError::BelowMinimum(Money::from_sats(1)))
        );
        assert_eq!(lightning.validate(&converter(Money::from_sats(1))), Ok(()));
    }

    #[test]
    fn lightning_reload_uses_fiat_minimum() {
        let reload = CurrencyAmountValidator::new(
            SpendableBalances::from_sats(100_000_000, 0),
            WalletTransactionType::Lightning,
            ValidationLimits::default(),
        )
        .ignoring([AmountValidationCategory::UsableBalance])
        .reload(true);

        // 4.99 USD
        assert_eq!(
            reload.validate(&converter(usd(499))),
            Err(AmountValidationError::BelowMinimum(usd(500)))
        );
        assert_eq!(reload.validate(&converter(usd(500))), Ok(()));
    }

    #[test]
    fn earlier_category_wins() {
        // both over balance and over the invitation maximum
        let validator = CurrencyAmountValidator::new(
            SpendableBalances::from_sats(1_000, 0),
            WalletTransactionType::OnChain,
            ValidationLimits::default(),
        )
        .invitation(true);
        assert!(matches!(
            validator.validate(&converter(usd(100_000))),
            Err(AmountValidationError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn missing_rate_is_reported() {
        let no_rates = CurrencyConverter::new(
            ExchangeRates::new(),
            Money::fiat(100, FiatCurrency::EUR),
            CurrencyPair::fiat_primary(FiatCurrency::EUR),
        );
        assert_eq!(
            validator().validate(&no_rates),
            Err(AmountValidationError::MissingExchangeRate(FiatCurrency::EUR.into()))
        );
    }

    #[test]
    fn validation_is_repeatable() {
        let amount = converter(Money::from_sats(12_500_000));
        let validator = validator().invitation(true);
        assert_eq!(validator.validate(&amount), validator.validate(&amount));
    }
}

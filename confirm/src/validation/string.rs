use std::str::FromStr;

use bitcoin::address::NetworkUnchecked;
use bitcoin::Address;
use bitcoin::Network;

use super::Validator;
use crate::error::StringValidationError;

/// Rejects strings that are empty after trimming whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyStringValidator;

impl Validator<str> for NonEmptyStringValidator {
    type Error = StringValidationError;

    fn validate(&self, value: &str) -> Result<(), Self::Error> {
        if value.trim().is_empty() {
            return Err(StringValidationError::Empty);
        }
        Ok(())
    }
}

/// Accepts base58 and bech32 addresses valid for one network.
#[derive(Debug, Clone, Copy)]
pub struct BitcoinAddressValidator {
    network: Network,
}

impl BitcoinAddressValidator {
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

impl Validator<str> for BitcoinAddressValidator {
    type Error = StringValidationError;

    fn validate(&self, value: &str) -> Result<(), Self::Error> {
        let trimmed = value.trim();
        let valid = Address::<NetworkUnchecked>::from_str(trimmed)
            .map(|address| address.is_valid_for_network(self.network))
            .unwrap_or(false);
        if !valid {
            return Err(StringValidationError::InvalidBitcoinAddress(
                trimmed.to_string(),
            ));
        }
        Ok(())
    }
}

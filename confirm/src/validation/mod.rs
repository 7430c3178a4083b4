//! Composable validators.
//!
//! A `Validator` checks one thing. `CompositeValidator` runs several in order
//! and surfaces the first failure; later stages are not evaluated.

mod amount;
mod string;

pub use amount::AmountValidationCategory;
pub use amount::CurrencyAmountValidator;
pub use amount::SpendableBalances;
pub use string::BitcoinAddressValidator;
pub use string::NonEmptyStringValidator;

/// Checks a value, returning a typed reason on failure.
///
/// Validators are pure: validating the same input twice gives the same result.
pub trait Validator<T: ?Sized> {
    type Error;

    fn validate(&self, value: &T) -> Result<(), Self::Error>;
}

/// An ordered, short-circuiting chain of validators sharing an error type.
pub struct CompositeValidator<'a, T: ?Sized, E> {
    stages: Vec<Box<dyn Validator<T, Error = E> + Send + Sync + 'a>>,
}

impl<'a, T: ?Sized, E> CompositeValidator<'a, T, E> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage that runs after all existing ones.
    pub fn then(mut self, stage: impl Validator<T, Error = E> + Send + Sync + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<T: ?Sized, E> Default for CompositeValidator<'_, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, E> Validator<T> for CompositeValidator<'_, T, E> {
    type Error = E;

    fn validate(&self, value: &T) -> Result<(), E> {
        self.stages.iter().try_for_each(|stage| stage.validate(value))
    }
}

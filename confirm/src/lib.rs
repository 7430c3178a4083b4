//! Payment confirmation: the last step before a payment leaves the wallet.
//!
//! A [`ConfirmationController`] presents the amount in two currencies, lets
//! the user pick a fee tier, validates the amount against balance and
//! invitation limits, and hands an [`OutgoingPaymentIntent`] to a
//! [`PaymentSender`](collaborators::PaymentSender).

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod fee;
pub mod intent;
pub mod recipient;
pub mod validation;
pub mod view_model;

pub use collaborators::Collaborators;
pub use config::ConfirmationConfig;
pub use controller::ConfirmationController;
pub use controller::ConfirmationRequest;
pub use controller::ConfirmationState;
pub use controller::FeeSetup;
pub use error::ConfirmationError;
pub use error::FeeChangeError;
pub use intent::OutgoingPaymentIntent;

//! Orchestrates fee changes, validation and dispatch for one confirmation screen.

use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;
use wallet_api::fee_mode::TransactionFeeMode;
use wallet_api::prefs::settings_store::SettingsError;

use crate::collaborators::Collaborators;
use crate::config::ConfirmationConfig;
use crate::error::ConfirmationError;
use crate::error::FeeChangeError;
use crate::error::FeeTooExpensiveError;
use crate::error::MissingTransactionDataError;
use crate::fee::AdjustableFeeModel;
use crate::fee::ConfirmTransactionFeeModel;
use crate::fee::FeeCandidates;
use crate::fee::TransactionData;
use crate::intent::LightningPaymentIntent;
use crate::intent::OnChainPaymentIntent;
use crate::intent::OutgoingInvitation;
use crate::intent::OutgoingPaymentIntent;
use crate::recipient::PaymentRecipient;
use crate::recipient::TransactionType;
use crate::recipient::WalletTransactionType;
use crate::validation::BitcoinAddressValidator;
use crate::validation::CompositeValidator;
use crate::validation::CurrencyAmountValidator;
use crate::validation::NonEmptyStringValidator;
use crate::validation::SpendableBalances;
use crate::validation::Validator;
use crate::view_model::DualAmountLabels;
use crate::view_model::PaymentViewModel;

/// Which of the three confirmation handlers applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::EnumIs)]
pub enum PaymentKind {
    OnChain,
    Lightning,
    Invite,
}

impl PaymentKind {
    fn resolve(transaction_type: TransactionType, wallet: WalletTransactionType) -> Self {
        match (transaction_type, wallet) {
            (TransactionType::Invite, _) => Self::Invite,
            (TransactionType::Payment, WalletTransactionType::OnChain) => Self::OnChain,
            (TransactionType::Payment, WalletTransactionType::Lightning) => Self::Lightning,
        }
    }
}

/// Where a confirmation screen is in its lifecycle.
///
/// `RecomputingFee` and `Validating` are mutually exclusive: each can only be
/// entered from `AwaitingConfirmation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIs)]
pub enum ConfirmationState {
    AwaitingConfirmation,
    RecomputingFee(TransactionFeeMode),
    /// Validating the amount and dispatching the payment.
    Validating,
    Confirmed(PaymentKind),
    Dismissed,
}

/// How the fee of the payment was determined by the send-setup screen.
#[derive(Debug, Clone)]
pub enum FeeSetup {
    /// Per-tier candidates from the wallet engine.
    OnChain(FeeCandidates),
    /// A single transaction whose fee cannot be changed.
    Required(TransactionData),
    Lightning { fee_sats: u64 },
}

/// Everything the send-setup screen hands to the confirmation screen.
#[derive(Debug, Clone)]
pub struct ConfirmationRequest {
    pub transaction_type: TransactionType,
    pub view_model: PaymentViewModel,
    pub fee: FeeSetup,
    /// Moving on-chain funds into the lightning wallet.
    pub is_reload: bool,
}

struct Session {
    state: ConfirmationState,
    view_model: PaymentViewModel,
    fee_model: ConfirmTransactionFeeModel,
    /// Bumped whenever a pending recomputation must be discarded.
    generation: u64,
}

/// Drives one confirmation screen from presentation to dispatch.
///
/// All methods take `&self`; the controller can be shared between the task
/// awaiting a fee recomputation and the one handling dismissal.
pub struct ConfirmationController {
    transaction_type: TransactionType,
    is_reload: bool,
    config: ConfirmationConfig,
    collaborators: Collaborators,
    session: Mutex<Session>,
}

impl ConfirmationController {
    /// Builds the fee model, preselecting the user's preferred fee tier.
    pub fn new(
        request: ConfirmationRequest,
        config: ConfirmationConfig,
        collaborators: Collaborators,
    ) -> Result<Self, ConfirmationError> {
        let preferred = collaborators.settings.preferred_fee_mode();

        let fee_model = match request.fee {
            FeeSetup::OnChain(candidates) => ConfirmTransactionFeeModel::on_chain(
                candidates,
                config.adjustable_fees_enabled,
                preferred,
            )
            .ok_or_else(|| {
                tracing::warn!("no affordable fee tier for on-chain payment");
                MissingTransactionDataError
            })?,
            FeeSetup::Required(data) => ConfirmTransactionFeeModel::required(data),
            FeeSetup::Lightning { fee_sats } => ConfirmTransactionFeeModel::lightning(fee_sats),
        };

        let mut view_model = request.view_model;
        if let Some(data) = fee_model.transaction_data() {
            view_model.set_btc_amount(data.amount_sats);
        }

        tracing::debug!(
            "confirmation presented: {:?} via {:?}, fee {} sats",
            request.transaction_type,
            view_model.wallet_transaction_type(),
            fee_model.network_fee_sats()
        );

        Ok(Self {
            transaction_type: request.transaction_type,
            is_reload: request.is_reload,
            config,
            collaborators,
            session: Mutex::new(Session {
                state: ConfirmationState::AwaitingConfirmation,
                view_model,
                fee_model,
                generation: 0,
            }),
        })
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- Getters ---

    pub fn state(&self) -> ConfirmationState {
        self.session().state
    }

    pub fn current_fee_model(&self) -> ConfirmTransactionFeeModel {
        self.session().fee_model.clone()
    }

    pub fn view_model(&self) -> PaymentViewModel {
        self.session().view_model.clone()
    }

    pub fn dual_amount_labels(&self) -> DualAmountLabels {
        self.session().view_model.labels()
    }

    /// Pulls the latest rate snapshot and returns the recomputed labels.
    ///
    /// An empty snapshot (rates not loaded yet) keeps the current rates.
    pub fn refresh_rates(&self) -> DualAmountLabels {
        let rates = self.collaborators.rates.exchange_rates();
        let mut session = self.session();
        if !rates.is_empty() {
            session.view_model.set_exchange_rates(rates);
        }
        session.view_model.labels()
    }

    // --- Transitions ---

    /// Selects another fee tier, recomputing its transaction with the wallet engine.
    ///
    /// Unaffordable tiers are rejected without contacting the engine. If the
    /// screen is dismissed while the engine is working, the result is dropped.
    pub async fn change_fee_tier(&self, mode: TransactionFeeMode) -> Result<(), FeeChangeError> {
        let generation = {
            let mut session = self.session();
            if !session.state.is_awaiting_confirmation() {
                return Err(FeeChangeError::Busy(session.state));
            }
            let model = session
                .fee_model
                .adjustable()
                .ok_or(FeeChangeError::NotAdjustable)?;
            if !model.is_selectable(mode) {
                tracing::info!("{mode:?} fee tier is too expensive");
                return Err(FeeTooExpensiveError { mode }.into());
            }
            if model.selected_mode() == mode {
                return Ok(());
            }
            session.state = ConfirmationState::RecomputingFee(mode);
            session.generation += 1;
            session.generation
        };

        tracing::debug!("recomputing transaction for {mode:?} fee");
        let computed = tokio::time::timeout(
            self.config.fee_recompute_timeout,
            self.collaborators.fee_estimator.compute_transaction_data(mode),
        )
        .await;

        let mut session = self.session();
        if session.generation != generation {
            tracing::debug!("discarding {mode:?} fee recomputation for stale screen");
            return Err(FeeChangeError::Superseded);
        }
        session.state = ConfirmationState::AwaitingConfirmation;

        let Ok(data) = computed else {
            tracing::warn!("{mode:?} fee recomputation timed out");
            return Err(FeeChangeError::TimedOut(mode));
        };
        let ConfirmTransactionFeeModel::Adjustable(model) = &session.fee_model else {
            return Err(FeeChangeError::NotAdjustable);
        };
        let next = match model.copy_selecting(mode, |_| data) {
            Ok(next) => next,
            Err(e) => {
                tracing::info!("{mode:?} fee tier is no longer affordable");
                let marked = model.marking_unaffordable(mode);
                session.fee_model = ConfirmTransactionFeeModel::Adjustable(marked);
                return Err(e.into());
            }
        };

        if let Some(data) = next.transaction_data() {
            session.view_model.set_btc_amount(data.amount_sats);
        }
        tracing::info!(
            "selected {mode:?} fee of {} sats",
            next.network_fee_sats()
        );
        session.fee_model = ConfirmTransactionFeeModel::Adjustable(next);
        Ok(())
    }

    /// Validates the payment and hands it to the payment sender.
    ///
    /// Validation failures return the screen to `AwaitingConfirmation`. On
    /// success the screen is `Confirmed` and the dispatched intent is returned.
    pub async fn confirm(&self) -> Result<OutgoingPaymentIntent, ConfirmationError> {
        let intent = {
            let mut session = self.session();
            if !session.state.is_awaiting_confirmation() {
                return Err(ConfirmationError::Busy(session.state));
            }
            session.state = ConfirmationState::Validating;
            match self.prepare(&mut session) {
                Ok(intent) => intent,
                Err(e) => {
                    tracing::warn!("confirmation rejected: {e}");
                    session.state = ConfirmationState::AwaitingConfirmation;
                    return Err(e);
                }
            }
        };

        let kind = intent.kind();
        let sender = &self.collaborators.sender;
        let dispatched = match &intent {
            OutgoingPaymentIntent::OnChain(payment) => sender.send_on_chain_payment(payment).await,
            OutgoingPaymentIntent::Lightning(payment) => {
                sender.send_lightning_payment(payment).await
            }
            OutgoingPaymentIntent::Invite(invitation) => sender.send_invite(invitation).await,
        };

        let mut session = self.session();
        match dispatched {
            Ok(()) => {
                if session.state.is_validating() {
                    session.state = ConfirmationState::Confirmed(kind);
                }
                tracing::info!("{kind:?} payment dispatched");
                Ok(intent)
            }
            Err(e) => {
                tracing::error!("{kind:?} payment dispatch failed: {e:#}");
                if session.state.is_validating() {
                    session.state = ConfirmationState::AwaitingConfirmation;
                }
                Err(ConfirmationError::Dispatch(e))
            }
        }
    }

    /// Closes the screen, persisting the selected fee tier as the new default.
    ///
    /// Any fee recomputation still in flight is discarded when it completes.
    pub fn dismiss(&self) -> Result<(), SettingsError> {
        let selected = {
            let mut session = self.session();
            session.generation += 1;
            session.state = ConfirmationState::Dismissed;
            session
                .fee_model
                .adjustable()
                .map(AdjustableFeeModel::selected_mode)
        };
        match selected {
            Some(mode) => self.collaborators.settings.persist_fee_mode(mode),
            None => Ok(()),
        }
    }

    fn prepare(&self, session: &mut Session) -> Result<OutgoingPaymentIntent, ConfirmationError> {
        let rates = self.collaborators.rates.exchange_rates();
        if !rates.is_empty() {
            session.view_model.set_exchange_rates(rates);
        }

        let view_model = &session.view_model;
        let wallet = view_model.wallet_transaction_type();
        let kind = PaymentKind::resolve(self.transaction_type, wallet);
        let recipient = view_model
            .payment_recipient()
            .ok_or(ConfirmationError::MissingRecipient)?;
        self.check_recipient(kind, recipient)?;

        let balances = SpendableBalances {
            on_chain: self
                .collaborators
                .balances
                .spendable_balance(WalletTransactionType::OnChain),
            lightning: self
                .collaborators
                .balances
                .spendable_balance(WalletTransactionType::Lightning),
        };
        let converter = view_model.converter();
        CurrencyAmountValidator::new(balances, wallet, self.config.limits)
            .invitation(kind.is_invite())
            .reload(self.is_reload)
            .validate(&converter)?;
        let fiat = view_model.currency_pair().fiat;
        let btc_amount = view_model
            .btc_amount()
            .ok_or(ConfirmationError::MissingExchangeRate(fiat))?;

        let intent = match kind {
            PaymentKind::OnChain => {
                let transaction_data = session
                    .fee_model
                    .transaction_data()
                    .cloned()
                    .ok_or_else(|| {
                        tracing::error!("on-chain confirmation without transaction data");
                        MissingTransactionDataError
                    })?;
                OutgoingPaymentIntent::OnChain(OnChainPaymentIntent {
                    transaction_data,
                    rates: view_model.exchange_rates().clone(),
                    outgoing: view_model.outgoing_transaction_data(&session.fee_model),
                })
            }
            PaymentKind::Lightning => OutgoingPaymentIntent::Lightning(LightningPaymentIntent {
                satoshi_amount: btc_amount.as_minor_units().max(0).unsigned_abs(),
                invoice: recipient.payment_target().map(str::to_string),
                receiver: recipient.contact().cloned(),
                shared_payload: view_model.shared_payload(),
            }),
            PaymentKind::Invite => {
                let contact = recipient
                    .contact()
                    .cloned()
                    .ok_or(ConfirmationError::RecipientMismatch(kind))?;
                let fiat_amount = converter
                    .fiat_amount()
                    .ok_or(ConfirmationError::MissingExchangeRate(fiat))?;
                OutgoingPaymentIntent::Invite(OutgoingInvitation {
                    contact,
                    btc_amount,
                    fiat_amount,
                    fee_sats: session.fee_model.network_fee_sats(),
                    wallet_type: wallet,
                    shared_payload: view_model.shared_payload(),
                })
            }
        };
        Ok(intent)
    }

    /// Invitations go to unregistered contacts only; payments go to
    /// registered contacts or to a well-formed payment target.
    fn check_recipient(
        &self,
        kind: PaymentKind,
        recipient: &PaymentRecipient,
    ) -> Result<(), ConfirmationError> {
        match (kind, recipient) {
            (PaymentKind::Invite, PaymentRecipient::Contact(contact))
                if contact.needs_invitation() =>
            {
                Ok(())
            }
            (PaymentKind::Invite, _) => Err(ConfirmationError::RecipientMismatch(kind)),
            (_, PaymentRecipient::Contact(contact)) if contact.needs_invitation() => {
                Err(ConfirmationError::RecipientMismatch(kind))
            }
            (_, PaymentRecipient::Contact(_)) => Ok(()),
            (PaymentKind::OnChain, PaymentRecipient::PaymentTarget(target)) => {
                CompositeValidator::new()
                    .then(NonEmptyStringValidator)
                    .then(BitcoinAddressValidator::new(self.config.network))
                    .validate(target.as_str())?;
                Ok(())
            }
            (_, PaymentRecipient::PaymentTarget(target)) => {
                NonEmptyStringValidator.validate(target.as_str())?;
                Ok(())
            }
        }
    }
}

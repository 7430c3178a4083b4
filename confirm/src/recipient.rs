//! Who a payment goes to.

use serde::Deserialize;
use serde::Serialize;

/// Which wallet a payment debits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::EnumIs,
)]
pub enum WalletTransactionType {
    #[default]
    OnChain,
    Lightning,
}

/// Whether the confirmation sends a payment or an invitation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::EnumIs,
)]
pub enum TransactionType {
    #[default]
    Payment,
    Invite,
}

/// What the service knows about a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIs)]
pub enum IdentityKind {
    /// Not yet known to the service.
    Generic,
    /// Has been sent an invitation but has no address on file.
    Invite,
    /// Has a resolvable address on file.
    RegisteredUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneContact {
    /// E.164 formatted, e.g. "+15555550100".
    pub phone_number: String,
    pub display_name: Option<String>,
    pub kind: IdentityKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterContact {
    /// Handle without the leading '@'.
    pub handle: String,
    pub display_name: Option<String>,
    pub kind: IdentityKind,
}

/// A contact-backed recipient. Contacts can receive on-chain or lightning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactRecipient {
    Phone(PhoneContact),
    Twitter(TwitterContact),
}

impl ContactRecipient {
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::Phone(contact) => contact.kind,
            Self::Twitter(contact) => contact.kind,
        }
    }

    /// Contacts without an address on file must be paid by invitation.
    pub fn needs_invitation(&self) -> bool {
        !self.kind().is_registered_user()
    }

    /// The identity the service resolves: a phone number or "@handle".
    pub fn identity(&self) -> String {
        match self {
            Self::Phone(contact) => contact.phone_number.clone(),
            Self::Twitter(contact) => format!("@{}", contact.handle),
        }
    }

    /// Name for display, falling back to the identity.
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Phone(contact) => contact.display_name.as_ref(),
            Self::Twitter(contact) => contact.display_name.as_ref(),
        };
        name.cloned().unwrap_or_else(|| self.identity())
    }
}

/// The recipient of a pending payment.
///
/// A recipient is exactly one of a raw payment target or a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::EnumIs)]
pub enum PaymentRecipient {
    /// A bitcoin address or lightning invoice typed, pasted or scanned.
    PaymentTarget(String),
    Contact(ContactRecipient),
}

impl PaymentRecipient {
    pub fn phone(phone_number: impl Into<String>, kind: IdentityKind) -> Self {
        Self::Contact(ContactRecipient::Phone(PhoneContact {
            phone_number: phone_number.into(),
            display_name: None,
            kind,
        }))
    }

    pub fn twitter(handle: impl Into<String>, kind: IdentityKind) -> Self {
        Self::Contact(ContactRecipient::Twitter(TwitterContact {
            handle: handle.into(),
            display_name: None,
            kind,
        }))
    }

    pub fn payment_target(&self) -> Option<&str> {
        match self {
            Self::PaymentTarget(target) => Some(target),
            Self::Contact(_) => None,
        }
    }

    pub fn contact(&self) -> Option<&ContactRecipient> {
        match self {
            Self::PaymentTarget(_) => None,
            Self::Contact(contact) => Some(contact),
        }
    }
}

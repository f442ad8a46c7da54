//! Event types emitted by the donation registry contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/donation_registry/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the registry contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A donation was registered (`created` topic).
    DonationRegistered,
    /// The owner changed food type and quantity (`updated` topic).
    DonationUpdated,
    /// The owner flipped the active flag (`status` topic).
    StatusChanged,
    /// The owner set or replaced the recipient (`recipient` topic).
    RecipientAssigned,
    /// The authority was configured (`authority` topic).
    AuthoritySet,
    /// The registration fee changed (`fee_set` topic).
    FeeChanged,
    /// The capacity ceiling changed (`max_set` topic).
    MaxDonationsChanged,
    /// An event from this contract that we don't recognise.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::DonationRegistered,
            "updated" => Self::DonationUpdated,
            "status" => Self::StatusChanged,
            "recipient" => Self::RecipientAssigned,
            "authority" => Self::AuthoritySet,
            "fee_set" => Self::FeeChanged,
            "max_set" => Self::MaxDonationsChanged,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationRegistered => "donation_registered",
            Self::DonationUpdated => "donation_updated",
            Self::StatusChanged => "status_changed",
            Self::RecipientAssigned => "recipient_assigned",
            Self::AuthoritySet => "authority_set",
            Self::FeeChanged => "fee_changed",
            Self::MaxDonationsChanged => "max_donations_changed",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the event's second topic carries a donation ID.
    pub fn is_per_donation(&self) -> bool {
        matches!(
            self,
            Self::DonationRegistered
                | Self::DonationUpdated
                | Self::StatusChanged
                | Self::RecipientAssigned
        )
    }
}

/// A decoded registry event, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// RPC event ID; unique per event and used to deduplicate inserts.
    pub event_id: String,
    pub event_type: String,
    pub donation_id: Option<String>,
    /// Owner, updater, recipient or authority, depending on the kind.
    pub actor: Option<String>,
    /// Fee, quantity, active flag or capacity, depending on the kind.
    pub value: Option<String>,
    /// Lower-case hex content hash (registrations only).
    pub content_hash: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event row as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub donation_id: Option<String>,
    pub actor: Option<String>,
    pub value: Option<String>,
    pub content_hash: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

//! # Types
//!
//! Shared data structures used across all modules of the donation registry.
//!
//! ## Config / State split
//!
//! A [`Donation`] is stored as two separate ledger entries:
//!
//! - [`DonationConfig`]: written once at registration; never mutated.
//! - [`DonationState`]: rewritten by `update_donation`,
//!   `set_donation_status` and `assign_recipient`.
//!
//! The public API exposes the reconstructed [`Donation`] struct.

use soroban_sdk::{contracttype, Address, Bytes, Env, String};

/// Settlement currency a donation is denominated in.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Currency {
    Stx,
    Usd,
    Btc,
}

impl Currency {
    /// Parse the ticker supplied by a caller. Only exact upper-case tickers
    /// are accepted.
    pub fn parse(env: &Env, ticker: &String) -> Option<Self> {
        if *ticker == String::from_str(env, "STX") {
            Some(Currency::Stx)
        } else if *ticker == String::from_str(env, "USD") {
            Some(Currency::Usd)
        } else if *ticker == String::from_str(env, "BTC") {
            Some(Currency::Btc)
        } else {
            None
        }
    }
}

/// Immutable donation fields, written once at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationConfig {
    pub id: u64,
    pub content_hash: Bytes,
    pub owner: Address,
    pub description: String,
    pub location: String,
    pub currency: Currency,
    pub expiry: u32,
    pub created_at: u32,
}

/// Mutable donation fields.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationState {
    pub food_type: String,
    pub quantity: u64,
    pub last_modified_at: u32,
    pub active: bool,
    pub recipient: Option<Address>,
}

/// Full on-chain representation of a food donation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donation {
    /// Sequential identifier, assigned from the donation counter.
    pub id: u64,
    /// Caller-supplied content hash; also the deduplication key.
    pub content_hash: Bytes,
    /// Address that registered the donation. Only it may mutate the record.
    pub owner: Address,
    /// Short description of the food, 1–50 bytes.
    pub food_type: String,
    pub quantity: u64,
    /// Ledger sequence at registration.
    pub created_at: u32,
    /// Ledger sequence of the last field-changing mutation.
    pub last_modified_at: u32,
    pub active: bool,
    pub description: String,
    pub location: String,
    pub currency: Currency,
    /// Last ledger sequence at which the donation is still live.
    pub expiry: u32,
    pub recipient: Option<Address>,
}

impl Donation {
    pub fn from_parts(config: DonationConfig, state: DonationState) -> Self {
        Donation {
            id: config.id,
            content_hash: config.content_hash,
            owner: config.owner,
            food_type: state.food_type,
            quantity: state.quantity,
            created_at: config.created_at,
            last_modified_at: state.last_modified_at,
            active: state.active,
            description: config.description,
            location: config.location,
            currency: config.currency,
            expiry: config.expiry,
            recipient: state.recipient,
        }
    }

    /// `true` once the ledger has moved past the donation's expiry. The
    /// expiry ledger itself still counts as live.
    pub fn is_expired_at(&self, ledger: u32) -> bool {
        ledger > self.expiry
    }
}

/// The most recent `update_donation` call for a donation. Overwritten on
/// every update; no history is kept.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationUpdate {
    pub food_type: String,
    pub quantity: u64,
    pub updated_at: u32,
    /// Always the donation owner.
    pub updater: Address,
}

//! Contract events.
//!
//! Every successful state change publishes exactly one event. Per-donation
//! events carry the donation ID as the second topic so indexers can filter
//! on it; configuration events carry only the topic symbol.

use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationRegistered {
    pub donation_id: u64,
    pub owner: Address,
    pub content_hash: Bytes,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationUpdated {
    pub donation_id: u64,
    pub updater: Address,
    pub food_type: String,
    pub quantity: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub donation_id: u64,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecipientAssigned {
    pub donation_id: u64,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthoritySet {
    pub authority: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeChanged {
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxDonationsChanged {
    pub max_donations: u64,
}

pub fn emit_donation_registered(
    env: &Env,
    donation_id: u64,
    owner: Address,
    content_hash: Bytes,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("created"), donation_id),
        DonationRegistered {
            donation_id,
            owner,
            content_hash,
            fee,
        },
    );
}

pub fn emit_donation_updated(
    env: &Env,
    donation_id: u64,
    updater: Address,
    food_type: String,
    quantity: u64,
) {
    env.events().publish(
        (symbol_short!("updated"), donation_id),
        DonationUpdated {
            donation_id,
            updater,
            food_type,
            quantity,
        },
    );
}

pub fn emit_status_changed(env: &Env, donation_id: u64, active: bool) {
    env.events().publish(
        (symbol_short!("status"), donation_id),
        StatusChanged {
            donation_id,
            active,
        },
    );
}

pub fn emit_recipient_assigned(env: &Env, donation_id: u64, recipient: Address) {
    env.events().publish(
        (symbol_short!("recipient"), donation_id),
        RecipientAssigned {
            donation_id,
            recipient,
        },
    );
}

pub fn emit_authority_set(env: &Env, authority: Address) {
    env.events()
        .publish((symbol_short!("authority"),), AuthoritySet { authority });
}

pub fn emit_fee_changed(env: &Env, fee: i128) {
    env.events()
        .publish((symbol_short!("fee_set"),), FeeChanged { fee });
}

pub fn emit_max_donations_changed(env: &Env, max_donations: u64) {
    env.events().publish(
        (symbol_short!("max_set"),),
        MaxDonationsChanged { max_donations },
    );
}

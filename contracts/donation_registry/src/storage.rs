//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the registry.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key               | Type      | Description                                  |
//! |-------------------|-----------|----------------------------------------------|
//! | `DonationCount`   | `u64`     | Next donation ID / total donations created   |
//! | `MaxDonations`    | `u64`     | Capacity ceiling on donations ever created   |
//! | `RegistrationFee` | `i128`    | Fee charged on each registration             |
//! | `Authority`       | `Address` | Fee receiver and configuration admin         |
//! | `FeeToken`        | `Address` | SAC token the fee is paid in                 |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key               | Type             | Description                         |
//! |-------------------|------------------|-------------------------------------|
//! | `DonConfig(id)`   | `DonationConfig` | Immutable donation fields           |
//! | `DonState(id)`    | `DonationState`  | Mutable donation fields             |
//! | `DonUpdate(id)`   | `DonationUpdate` | Latest update record                |
//! | `HashIndex(hash)` | `u64`            | Content hash → donation ID          |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Bytes, Env};

use crate::types::{Donation, DonationConfig, DonationState, DonationUpdate};

// ── Defaults ─────────────────────────────────────────────────────────

pub const DEFAULT_MAX_DONATIONS: u64 = 10_000;
pub const DEFAULT_REGISTRATION_FEE: i128 = 500;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Donation counter (Instance).
    DonationCount,
    /// Capacity ceiling (Instance).
    MaxDonations,
    /// Registration fee (Instance).
    RegistrationFee,
    /// Authority address, set at most once (Instance).
    Authority,
    /// Fee token address, set by the constructor (Instance).
    FeeToken,
    /// Immutable donation fields keyed by ID (Persistent).
    DonConfig(u64),
    /// Mutable donation fields keyed by ID (Persistent).
    DonState(u64),
    /// Latest update record keyed by ID (Persistent).
    DonUpdate(u64),
    /// Deduplication index keyed by content hash (Persistent).
    HashIndex(Bytes),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Number of donations ever created, which is also the next ID to assign.
pub fn get_donation_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::DonationCount)
        .unwrap_or(0)
}

pub fn get_max_donations(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::MaxDonations)
        .unwrap_or(DEFAULT_MAX_DONATIONS)
}

pub fn set_max_donations(env: &Env, max: u64) {
    env.storage().instance().set(&DataKey::MaxDonations, &max);
    bump_instance(env);
}

pub fn get_registration_fee(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RegistrationFee)
        .unwrap_or(DEFAULT_REGISTRATION_FEE)
}

pub fn set_registration_fee(env: &Env, fee: i128) {
    env.storage().instance().set(&DataKey::RegistrationFee, &fee);
    bump_instance(env);
}

/// Retrieve the authority address, if one has been configured.
pub fn get_authority(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Authority)
}

pub fn set_authority(env: &Env, authority: &Address) {
    env.storage().instance().set(&DataKey::Authority, authority);
    bump_instance(env);
}

pub fn set_fee_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::FeeToken, token);
    bump_instance(env);
}

/// Retrieve the fee token.
/// Panics if the constructor never ran.
pub fn get_fee_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::FeeToken)
        .expect("fee token not set")
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Persist a newly registered donation.
///
/// Writes the config, the initial state and the hash index entry, then
/// advances the donation counter. These four writes always happen together.
pub fn save_new_donation(env: &Env, donation: &Donation) {
    let config_key = DataKey::DonConfig(donation.id);
    let state_key = DataKey::DonState(donation.id);
    let index_key = DataKey::HashIndex(donation.content_hash.clone());

    let config = DonationConfig {
        id: donation.id,
        content_hash: donation.content_hash.clone(),
        owner: donation.owner.clone(),
        description: donation.description.clone(),
        location: donation.location.clone(),
        currency: donation.currency,
        expiry: donation.expiry,
        created_at: donation.created_at,
    };

    let state = DonationState {
        food_type: donation.food_type.clone(),
        quantity: donation.quantity,
        last_modified_at: donation.last_modified_at,
        active: donation.active,
        recipient: donation.recipient.clone(),
    };

    let persistent = env.storage().persistent();
    persistent.set(&config_key, &config);
    persistent.set(&state_key, &state);
    persistent.set(&index_key, &donation.id);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
    bump_persistent(env, &index_key);

    env.storage()
        .instance()
        .set(&DataKey::DonationCount, &(donation.id + 1));
    bump_instance(env);
}

/// Load the full `Donation` by combining config and state.
pub fn load_donation(env: &Env, id: u64) -> Option<Donation> {
    let config = load_donation_config(env, id)?;
    let state = load_donation_state(env, id)?;
    Some(Donation::from_parts(config, state))
}

/// Load only the immutable donation fields.
pub fn load_donation_config(env: &Env, id: u64) -> Option<DonationConfig> {
    let key = DataKey::DonConfig(id);
    let config: DonationConfig = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(config)
}

/// Load only the mutable donation fields.
pub fn load_donation_state(env: &Env, id: u64) -> Option<DonationState> {
    let key = DataKey::DonState(id);
    let state: DonationState = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(state)
}

/// Save only the mutable donation fields.
pub fn save_donation_state(env: &Env, id: u64, state: &DonationState) {
    let key = DataKey::DonState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn load_donation_update(env: &Env, id: u64) -> Option<DonationUpdate> {
    let key = DataKey::DonUpdate(id);
    let update: DonationUpdate = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(update)
}

/// Replace the update record for `id`.
pub fn save_donation_update(env: &Env, id: u64, update: &DonationUpdate) {
    let key = DataKey::DonUpdate(id);
    env.storage().persistent().set(&key, update);
    bump_persistent(env, &key);
}

/// Look up the donation registered under `hash`.
pub fn find_by_hash(env: &Env, hash: &Bytes) -> Option<u64> {
    let key = DataKey::HashIndex(hash.clone());
    let id: u64 = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(id)
}

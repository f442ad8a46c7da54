//! # Donation Registry Contract
//!
//! Ledger-style registry of food donations. It records each donation once,
//! rejects duplicate content hashes and registrations beyond the configured
//! capacity, and lets only a donation's owner change it afterwards.
//!
//! | Phase         | Entry Point(s)                                                   |
//! |---------------|------------------------------------------------------------------|
//! | Bootstrap     | `__constructor`, [`DonationRegistry::set_authority_contract`]    |
//! | Configuration | `set_registration_fee`, `set_max_donations`                      |
//! | Registration  | [`DonationRegistry::register_donation`]                          |
//! | Owner updates | `update_donation`, `set_donation_status`, `assign_recipient`     |
//! | Queries       | `get_donation`, `get_donation_update`, `get_donation_count`, `check_donation_existence`, ... |
//!
//! ## Architecture
//!
//! Field checks live in [`validation`], storage access in [`storage`] and
//! event emission in [`events`]. Every entry point validates its whole input
//! before the first write, so a returned error never leaves a partial change
//! behind.

#![no_std]

#[cfg(test)]
extern crate std;

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Bytes, Env, String};

pub mod events;
mod storage;
mod types;
pub mod validation;

#[cfg(test)]
mod test_access_control;

use storage::{
    find_by_hash, load_donation, load_donation_config, load_donation_state,
    load_donation_update, save_donation_state, save_donation_update, save_new_donation,
};
pub use storage::{DEFAULT_MAX_DONATIONS, DEFAULT_REGISTRATION_FEE};
pub use types::{Currency, Donation, DonationUpdate};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotAuthorized         = 100,
    InvalidDonationId     = 101,
    InvalidFoodType       = 102,
    InvalidQuantity       = 103,
    InvalidTimestamp      = 104,
    DonationAlreadyExists = 105,
    NotFound              = 106,
    InvalidStatus         = 107,
    InvalidDescription    = 108,
    InvalidLocation       = 109,
    InvalidCurrency       = 110,
    InvalidUpdateParam    = 111,
    MaxDonationsExceeded  = 112,
    AuthorityNotVerified  = 113,
    InvalidExpiry         = 114,
    InvalidRecipient      = 115,
    UpdateNotAllowed      = 116,
}

#[contract]
pub struct DonationRegistry;

#[contractimpl]
impl DonationRegistry {
    // ─────────────────────────────────────────────────────────
    // Bootstrap and configuration
    // ─────────────────────────────────────────────────────────

    /// Deploy-time setup. `fee_token` is the SAC token registration fees
    /// are paid in.
    pub fn __constructor(env: Env, fee_token: Address) {
        storage::set_fee_token(&env, &fee_token);
    }

    /// Set the authority that receives fees and administers the registry.
    ///
    /// Succeeds once. The burn address is rejected with `NotAuthorized`;
    /// any call after a successful one fails with `UpdateNotAllowed`.
    pub fn set_authority_contract(env: Env, authority: Address) -> Result<(), Error> {
        if validation::is_burn_address(&env, &authority) {
            return Err(Error::NotAuthorized);
        }
        if storage::get_authority(&env).is_some() {
            return Err(Error::UpdateNotAllowed);
        }
        authority.require_auth();

        storage::set_authority(&env, &authority);
        events::emit_authority_set(&env, authority);
        Ok(())
    }

    /// Change the fee charged on each registration. Requires the authority.
    pub fn set_registration_fee(env: Env, fee: i128) -> Result<(), Error> {
        let authority = require_authority(&env)?;
        if fee < 0 {
            return Err(Error::InvalidUpdateParam);
        }
        authority.require_auth();

        storage::set_registration_fee(&env, fee);
        events::emit_fee_changed(&env, fee);
        Ok(())
    }

    /// Change the capacity ceiling. Requires the authority.
    ///
    /// A ceiling below the current count is accepted; it just blocks
    /// further registrations.
    pub fn set_max_donations(env: Env, max: u64) -> Result<(), Error> {
        let authority = require_authority(&env)?;
        if max == 0 {
            return Err(Error::InvalidUpdateParam);
        }
        authority.require_auth();

        storage::set_max_donations(&env, max);
        events::emit_max_donations_changed(&env, max);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────

    /// Register a new donation owned by `caller` and return its ID.
    ///
    /// Checks run in this order and the first failure is returned:
    /// capacity, hash, food type, quantity, description, location,
    /// currency, expiry, duplicate hash, authority configured, recipient.
    /// On success the current registration fee is transferred from
    /// `caller` to the authority before anything is written.
    #[allow(clippy::too_many_arguments)]
    pub fn register_donation(
        env: Env,
        caller: Address,
        content_hash: Bytes,
        food_type: String,
        quantity: u64,
        description: String,
        location: String,
        currency: String,
        expiry: u32,
        recipient: Option<Address>,
    ) -> Result<u64, Error> {
        caller.require_auth();
        let now = env.ledger().sequence();

        let id = storage::get_donation_count(&env);
        validation::check_capacity(id, storage::get_max_donations(&env))?;
        validation::check_content_hash(&content_hash)?;
        validation::check_food_type(&food_type)?;
        validation::check_quantity(quantity)?;
        validation::check_description(&description)?;
        validation::check_location(&location)?;
        let currency = validation::parse_currency(&env, &currency)?;
        validation::check_expiry(expiry, now)?;
        if find_by_hash(&env, &content_hash).is_some() {
            return Err(Error::DonationAlreadyExists);
        }
        let authority = require_authority(&env)?;
        if let Some(recipient) = &recipient {
            validation::check_recipient(&env, recipient)?;
        }

        // A failed transfer traps, and the host discards the whole call.
        let fee = storage::get_registration_fee(&env);
        if fee > 0 {
            let token_client = token::Client::new(&env, &storage::get_fee_token(&env));
            token_client.transfer(&caller, &authority, &fee);
        }

        let donation = Donation {
            id,
            content_hash,
            owner: caller,
            food_type,
            quantity,
            created_at: now,
            last_modified_at: now,
            active: true,
            description,
            location,
            currency,
            expiry,
            recipient,
        };
        save_new_donation(&env, &donation);

        events::emit_donation_registered(
            &env,
            id,
            donation.owner,
            donation.content_hash,
            fee,
        );
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────
    // Owner updates
    // ─────────────────────────────────────────────────────────

    /// Replace the food type and quantity of donation `id`.
    ///
    /// Only the owner may update. The previous update record is overwritten.
    pub fn update_donation(
        env: Env,
        caller: Address,
        id: u64,
        food_type: String,
        quantity: u64,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut state = load_owned_state(&env, &caller, id)?;
        validation::check_food_type(&food_type)?;
        validation::check_quantity(quantity)?;

        let now = env.ledger().sequence();
        state.food_type = food_type.clone();
        state.quantity = quantity;
        state.last_modified_at = now;
        save_donation_state(&env, id, &state);
        save_donation_update(
            &env,
            id,
            &DonationUpdate {
                food_type: food_type.clone(),
                quantity,
                updated_at: now,
                updater: caller.clone(),
            },
        );

        events::emit_donation_updated(&env, id, caller, food_type, quantity);
        Ok(())
    }

    /// Flip the active flag of donation `id`. Leaves `last_modified_at` alone.
    pub fn set_donation_status(
        env: Env,
        caller: Address,
        id: u64,
        active: bool,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut state = load_owned_state(&env, &caller, id)?;

        state.active = active;
        save_donation_state(&env, id, &state);

        events::emit_status_changed(&env, id, active);
        Ok(())
    }

    /// Set or replace the recipient of donation `id`.
    pub fn assign_recipient(
        env: Env,
        caller: Address,
        id: u64,
        recipient: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut state = load_owned_state(&env, &caller, id)?;
        validation::check_recipient(&env, &recipient)?;

        state.recipient = Some(recipient.clone());
        save_donation_state(&env, id, &state);

        events::emit_recipient_assigned(&env, id, recipient);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_donation(env: Env, id: u64) -> Option<Donation> {
        load_donation(&env, id)
    }

    /// The most recent update record for `id`, if it was ever updated.
    pub fn get_donation_update(env: Env, id: u64) -> Option<DonationUpdate> {
        load_donation_update(&env, id)
    }

    /// Total donations ever created, active or not.
    pub fn get_donation_count(env: Env) -> u64 {
        storage::get_donation_count(&env)
    }

    pub fn check_donation_existence(env: Env, content_hash: Bytes) -> bool {
        find_by_hash(&env, &content_hash).is_some()
    }

    pub fn get_donation_id_by_hash(env: Env, content_hash: Bytes) -> Option<u64> {
        find_by_hash(&env, &content_hash)
    }

    /// `true` once the current ledger is past the donation's expiry.
    pub fn is_donation_expired(env: Env, id: u64) -> Result<bool, Error> {
        let donation = load_donation(&env, id).ok_or(Error::NotFound)?;
        Ok(donation.is_expired_at(env.ledger().sequence()))
    }

    pub fn get_registration_fee(env: Env) -> i128 {
        storage::get_registration_fee(&env)
    }

    pub fn get_max_donations(env: Env) -> u64 {
        storage::get_max_donations(&env)
    }

    pub fn get_authority(env: Env) -> Option<Address> {
        storage::get_authority(&env)
    }

    pub fn get_fee_token(env: Env) -> Address {
        storage::get_fee_token(&env)
    }
}

/// Return the configured authority or `AuthorityNotVerified`.
fn require_authority(env: &Env) -> Result<Address, Error> {
    storage::get_authority(env).ok_or(Error::AuthorityNotVerified)
}

/// Load the mutable state of donation `id` after checking that it exists
/// and that `caller` owns it.
fn load_owned_state(
    env: &Env,
    caller: &Address,
    id: u64,
) -> Result<types::DonationState, Error> {
    let config = load_donation_config(env, id).ok_or(Error::NotFound)?;
    if config.owner != *caller {
        return Err(Error::NotAuthorized);
    }
    load_donation_state(env, id).ok_or(Error::NotFound)
}

//! Field validation shared by registration and update.
//!
//! Each check maps to exactly one [`Error`] variant. Callers run them in a
//! fixed order and return the first failure, before touching storage.

use soroban_sdk::{Address, Bytes, Env, String};

use crate::types::Currency;
use crate::Error;

pub const MAX_FOOD_TYPE_LEN: u32 = 50;
pub const MAX_DESCRIPTION_LEN: u32 = 200;
pub const MAX_LOCATION_LEN: u32 = 100;

/// Strkey of the all-zero ed25519 account. Never a valid authority or recipient.
pub const BURN_ADDRESS: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

pub fn burn_address(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, BURN_ADDRESS))
}

pub fn is_burn_address(env: &Env, address: &Address) -> bool {
    *address == burn_address(env)
}

pub fn check_capacity(count: u64, max: u64) -> Result<(), Error> {
    if count >= max {
        return Err(Error::MaxDonationsExceeded);
    }
    Ok(())
}

pub fn check_content_hash(hash: &Bytes) -> Result<(), Error> {
    if hash.is_empty() {
        return Err(Error::InvalidDonationId);
    }
    Ok(())
}

pub fn check_food_type(food_type: &String) -> Result<(), Error> {
    let len = food_type.len();
    if len == 0 || len > MAX_FOOD_TYPE_LEN {
        return Err(Error::InvalidFoodType);
    }
    Ok(())
}

pub fn check_quantity(quantity: u64) -> Result<(), Error> {
    if quantity == 0 {
        return Err(Error::InvalidQuantity);
    }
    Ok(())
}

pub fn check_description(description: &String) -> Result<(), Error> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidDescription);
    }
    Ok(())
}

pub fn check_location(location: &String) -> Result<(), Error> {
    let len = location.len();
    if len == 0 || len > MAX_LOCATION_LEN {
        return Err(Error::InvalidLocation);
    }
    Ok(())
}

pub fn parse_currency(env: &Env, ticker: &String) -> Result<Currency, Error> {
    Currency::parse(env, ticker).ok_or(Error::InvalidCurrency)
}

/// Expiry must lie strictly after the current ledger.
pub fn check_expiry(expiry: u32, now: u32) -> Result<(), Error> {
    if expiry <= now {
        return Err(Error::InvalidExpiry);
    }
    Ok(())
}

pub fn check_recipient(env: &Env, recipient: &Address) -> Result<(), Error> {
    if is_burn_address(env, recipient) {
        return Err(Error::InvalidRecipient);
    }
    Ok(())
}

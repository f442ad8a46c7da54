extern crate std;

use soroban_sdk::{
    testutils::{
        Address as _, AuthorizedFunction, AuthorizedInvocation, MockAuth, MockAuthInvoke,
    },
    token, Address, Bytes, Env, IntoVal, String, Symbol,
};

use crate::invariants;
use crate::validation::burn_address;
use crate::{
    DonationRegistry, DonationRegistryClient, Error, DEFAULT_MAX_DONATIONS,
    DEFAULT_REGISTRATION_FEE,
};

fn setup() -> (Env, DonationRegistryClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let token_admin = Address::generate(&env);
    let fee_token = env
        .register_stellar_asset_contract_v2(token_admin)
        .address();
    let contract_id = env.register(DonationRegistry, (fee_token.clone(),));
    let client = DonationRegistryClient::new(&env, &contract_id);
    (env, client, fee_token)
}

fn funded_caller(env: &Env, fee_token: &Address) -> Address {
    let caller = Address::generate(env);
    token::StellarAssetClient::new(env, fee_token).mint(&caller, &10_000i128);
    caller
}

/// The single auth recorded for the last call: `signer` approving `function`
/// on the registry with `args`.
fn expected_auth(
    env: &Env,
    client: &DonationRegistryClient,
    signer: &Address,
    function: &str,
    args: soroban_sdk::Vec<soroban_sdk::Val>,
) -> std::vec::Vec<(Address, AuthorizedInvocation)> {
    std::vec![(
        signer.clone(),
        AuthorizedInvocation {
            function: AuthorizedFunction::Contract((
                client.address.clone(),
                Symbol::new(env, function),
                args,
            )),
            sub_invocations: std::vec![],
        }
    )]
}

fn register(
    env: &Env,
    client: &DonationRegistryClient,
    owner: &Address,
    content_hash: &[u8],
) -> u64 {
    client.register_donation(
        owner,
        &Bytes::from_slice(env, content_hash),
        &String::from_str(env, "perishable"),
        &100,
        &String::from_str(env, "Fresh veggies"),
        &String::from_str(env, "CityZ"),
        &String::from_str(env, "STX"),
        &(env.ledger().sequence() + 1000),
        &None,
    )
}

// ─────────────────────────────────────────────────────────
// Authority
// ─────────────────────────────────────────────────────────

#[test]
fn test_defaults_before_configuration() {
    let (_env, client, fee_token) = setup();
    assert_eq!(client.get_authority(), None);
    assert_eq!(client.get_registration_fee(), DEFAULT_REGISTRATION_FEE);
    assert_eq!(client.get_max_donations(), DEFAULT_MAX_DONATIONS);
    assert_eq!(client.get_fee_token(), fee_token);
}

#[test]
fn test_set_authority_contract() {
    let (env, client, _fee_token) = setup();
    let authority = Address::generate(&env);

    client.set_authority_contract(&authority);
    assert_eq!(client.get_authority(), Some(authority));
}

#[test]
fn test_set_authority_requires_authority_signature() {
    let (env, client, _fee_token) = setup();
    let authority = Address::generate(&env);

    client.set_authority_contract(&authority);
    assert_eq!(
        env.auths(),
        std::vec![(
            authority.clone(),
            AuthorizedInvocation {
                function: AuthorizedFunction::Contract((
                    client.address.clone(),
                    Symbol::new(&env, "set_authority_contract"),
                    (authority.clone(),).into_val(&env),
                )),
                sub_invocations: std::vec![],
            }
        )]
    );
}

#[test]
fn test_set_registration_fee_requires_authority_signature() {
    let (env, client, _fee_token) = setup();
    let authority = Address::generate(&env);
    client.set_authority_contract(&authority);

    client.set_registration_fee(&1000);
    assert_eq!(
        env.auths(),
        expected_auth(
            &env,
            &client,
            &authority,
            "set_registration_fee",
            (1000_i128,).into_val(&env),
        )
    );
}

#[test]
fn test_set_max_donations_requires_authority_signature() {
    let (env, client, _fee_token) = setup();
    let authority = Address::generate(&env);
    client.set_authority_contract(&authority);

    client.set_max_donations(&5);
    assert_eq!(
        env.auths(),
        expected_auth(
            &env,
            &client,
            &authority,
            "set_max_donations",
            (5_u64,).into_val(&env),
        )
    );
}

#[test]
fn test_burn_authority_rejected() {
    let (env, client, _fee_token) = setup();

    let result = client.try_set_authority_contract(&burn_address(&env));
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
    assert_eq!(client.get_authority(), None);
}

#[test]
fn test_authority_set_only_once() {
    let (env, client, _fee_token) = setup();
    let first = Address::generate(&env);
    let second = Address::generate(&env);

    client.set_authority_contract(&first);
    assert_eq!(
        client.try_set_authority_contract(&second),
        Err(Ok(Error::UpdateNotAllowed))
    );
    assert_eq!(
        client.try_set_authority_contract(&first),
        Err(Ok(Error::UpdateNotAllowed))
    );
    assert_eq!(
        client.try_set_authority_contract(&burn_address(&env)),
        Err(Ok(Error::NotAuthorized))
    );
    assert_eq!(client.get_authority(), Some(first));
}

// ─────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────

#[test]
fn test_set_registration_fee() {
    let (env, client, fee_token) = setup();
    let authority = Address::generate(&env);
    client.set_authority_contract(&authority);

    client.set_registration_fee(&1000);
    assert_eq!(client.get_registration_fee(), 1000);

    let caller = funded_caller(&env, &fee_token);
    register(&env, &client, &caller, &[1, 2, 3]);

    let fee_client = token::Client::new(&env, &fee_token);
    assert_eq!(fee_client.balance(&authority), 1000);
    assert_eq!(fee_client.balance(&caller), 9_000);
}

#[test]
fn test_zero_fee_moves_nothing() {
    let (env, client, fee_token) = setup();
    let authority = Address::generate(&env);
    client.set_authority_contract(&authority);
    client.set_registration_fee(&0);

    // No balance needed when the fee is zero.
    let caller = Address::generate(&env);
    register(&env, &client, &caller, &[1]);
    assert_eq!(token::Client::new(&env, &fee_token).balance(&authority), 0);
    assert_eq!(client.get_donation_count(), 1);
}

#[test]
fn test_registration_fee_requires_authority() {
    let (_env, client, _fee_token) = setup();
    assert_eq!(
        client.try_set_registration_fee(&1000),
        Err(Ok(Error::AuthorityNotVerified))
    );
    assert_eq!(client.get_registration_fee(), DEFAULT_REGISTRATION_FEE);
}

#[test]
fn test_negative_fee_rejected() {
    let (env, client, _fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    assert_eq!(
        client.try_set_registration_fee(&-1),
        Err(Ok(Error::InvalidUpdateParam))
    );
    assert_eq!(client.get_registration_fee(), DEFAULT_REGISTRATION_FEE);
}

#[test]
fn test_max_donations_requires_authority() {
    let (_env, client, _fee_token) = setup();
    assert_eq!(
        client.try_set_max_donations(&5),
        Err(Ok(Error::AuthorityNotVerified))
    );
    assert_eq!(client.get_max_donations(), DEFAULT_MAX_DONATIONS);
}

#[test]
fn test_zero_max_donations_rejected() {
    let (env, client, _fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    assert_eq!(
        client.try_set_max_donations(&0),
        Err(Ok(Error::InvalidUpdateParam))
    );
    client.set_max_donations(&5);
    assert_eq!(client.get_max_donations(), 5);
}

// ─────────────────────────────────────────────────────────
// Ownership
// ─────────────────────────────────────────────────────────

#[test]
fn test_owner_operations_require_owner_signature() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let id = register(&env, &client, &owner, &[1, 2, 3]);
    let food_type = String::from_str(&env, "dairy");
    let recipient = Address::generate(&env);

    client.update_donation(&owner, &id, &food_type, &5);
    assert_eq!(
        env.auths(),
        expected_auth(
            &env,
            &client,
            &owner,
            "update_donation",
            (owner.clone(), id, food_type.clone(), 5_u64).into_val(&env),
        )
    );

    client.set_donation_status(&owner, &id, &false);
    assert_eq!(
        env.auths(),
        expected_auth(
            &env,
            &client,
            &owner,
            "set_donation_status",
            (owner.clone(), id, false).into_val(&env),
        )
    );

    client.assign_recipient(&owner, &id, &recipient);
    assert_eq!(
        env.auths(),
        expected_auth(
            &env,
            &client,
            &owner,
            "assign_recipient",
            (owner.clone(), id, recipient.clone()).into_val(&env),
        )
    );
}

#[test]
fn test_forged_caller_cannot_mutate_donation() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let intruder = Address::generate(&env);
    let id = register(&env, &client, &owner, &[1, 2, 3]);
    let before = client.get_donation(&id).unwrap();
    let food_type = String::from_str(&env, "dairy");

    // Only the intruder signs, but names the owner as caller.
    env.mock_auths(&[MockAuth {
        address: &intruder,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "update_donation",
            args: (owner.clone(), id, food_type.clone(), 5_u64).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client
        .try_update_donation(&owner, &id, &food_type, &5)
        .is_err());

    env.mock_auths(&[MockAuth {
        address: &intruder,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "set_donation_status",
            args: (owner.clone(), id, false).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client.try_set_donation_status(&owner, &id, &false).is_err());

    env.mock_auths(&[MockAuth {
        address: &intruder,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "assign_recipient",
            args: (owner.clone(), id, intruder.clone()).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client.try_assign_recipient(&owner, &id, &intruder).is_err());

    assert_eq!(client.get_donation(&id).unwrap(), before);
    assert!(client.get_donation_update(&id).is_none());

    // The owner's own signature goes through.
    env.mock_auths(&[MockAuth {
        address: &owner,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "update_donation",
            args: (owner.clone(), id, food_type.clone(), 5_u64).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    client.update_donation(&owner, &id, &food_type, &5);
    assert_eq!(client.get_donation(&id).unwrap().quantity, 5);
}

#[test]
fn test_non_authority_cannot_change_fee_or_cap() {
    let (env, client, _fee_token) = setup();
    let authority = Address::generate(&env);
    let intruder = Address::generate(&env);
    client.set_authority_contract(&authority);

    env.mock_auths(&[MockAuth {
        address: &intruder,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "set_registration_fee",
            args: (0_i128,).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client.try_set_registration_fee(&0).is_err());

    env.mock_auths(&[MockAuth {
        address: &intruder,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "set_max_donations",
            args: (1_u64,).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client.try_set_max_donations(&1).is_err());

    assert_eq!(client.get_registration_fee(), DEFAULT_REGISTRATION_FEE);
    assert_eq!(client.get_max_donations(), DEFAULT_MAX_DONATIONS);

    env.mock_auths(&[MockAuth {
        address: &authority,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "set_max_donations",
            args: (1_u64,).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    client.set_max_donations(&1);
    assert_eq!(client.get_max_donations(), 1);
}

#[test]
fn test_update_by_non_owner_rejected() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let intruder = Address::generate(&env);
    let id = register(&env, &client, &owner, &[1, 2, 3]);
    let before = client.get_donation(&id).unwrap();

    let result = client.try_update_donation(
        &intruder,
        &id,
        &String::from_str(&env, "non-perishable"),
        &200,
    );
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
    assert_eq!(client.get_donation(&id).unwrap(), before);
    assert!(client.get_donation_update(&id).is_none());
}

#[test]
fn test_ownership_checked_before_field_validation() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let id = register(&env, &client, &owner, &[1, 2, 3]);

    let result = client.try_update_donation(
        &Address::generate(&env),
        &id,
        &String::from_str(&env, ""),
        &0,
    );
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
}

#[test]
fn test_status_by_non_owner_rejected() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let id = register(&env, &client, &owner, &[1, 2, 3]);

    let result = client.try_set_donation_status(&Address::generate(&env), &id, &false);
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
    assert!(client.get_donation(&id).unwrap().active);

    assert_eq!(
        client.try_set_donation_status(&owner, &42, &false),
        Err(Ok(Error::NotFound))
    );
}

#[test]
fn test_recipient_by_non_owner_rejected() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let owner = funded_caller(&env, &fee_token);
    let id = register(&env, &client, &owner, &[1, 2, 3]);

    let result =
        client.try_assign_recipient(&Address::generate(&env), &id, &Address::generate(&env));
    assert_eq!(result, Err(Ok(Error::NotAuthorized)));
    assert_eq!(client.get_donation(&id).unwrap().recipient, None);

    assert_eq!(
        client.try_assign_recipient(&owner, &42, &Address::generate(&env)),
        Err(Ok(Error::NotFound))
    );
}

#[test]
fn test_authority_cannot_modify_foreign_donation() {
    let (env, client, fee_token) = setup();
    let authority = Address::generate(&env);
    client.set_authority_contract(&authority);
    let owner = funded_caller(&env, &fee_token);
    let id = register(&env, &client, &owner, &[1, 2, 3]);

    assert_eq!(
        client.try_set_donation_status(&authority, &id, &false),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn test_owners_manage_only_their_own_donations() {
    let (env, client, fee_token) = setup();
    client.set_authority_contract(&Address::generate(&env));
    let alice = funded_caller(&env, &fee_token);
    let bob = funded_caller(&env, &fee_token);
    let alice_id = register(&env, &client, &alice, &[1]);
    let bob_id = register(&env, &client, &bob, &[2]);

    client.update_donation(&alice, &alice_id, &String::from_str(&env, "dairy"), &5);
    client.update_donation(&bob, &bob_id, &String::from_str(&env, "grain"), &6);
    assert_eq!(
        client.try_update_donation(&alice, &bob_id, &String::from_str(&env, "dairy"), &5),
        Err(Ok(Error::NotAuthorized))
    );

    assert_eq!(client.get_donation_update(&alice_id).unwrap().updater, alice);
    assert_eq!(client.get_donation_update(&bob_id).unwrap().updater, bob);
    invariants::assert_all_registry_invariants(&client);
}

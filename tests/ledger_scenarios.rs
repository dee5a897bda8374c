// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

mod common;

use amun_token::core::ledger::{LedgerError, LedgerEvent};
use amun_token::core::types::Address;
use common::{deploy, sum_balances, user, AMOUNT, EXCEEDING_AMOUNT, TOTAL_SUPPLY_DEFAULT};

#[test]
fn deploy_credits_owner_with_total_supply() {
    let l = deploy();
    assert_eq!(l.total_supply(), TOTAL_SUPPLY_DEFAULT);
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT);
    assert_eq!(l.balance_of(&user(2)), 0);
    assert_eq!(l.name(), "TestToken");
    assert_eq!(l.symbol(), "TST");
    assert_eq!(l.decimals(), 18);
    assert_eq!(l.owner(), user(1));
    assert_eq!(
        l.events().as_slice(),
        &[LedgerEvent::Transfer {
            from: Address::ZERO,
            to: user(1),
            amount: TOTAL_SUPPLY_DEFAULT
        }]
    );
}

#[test]
fn transfer_updates_balances() {
    let mut l = deploy();
    let r = l.transfer(user(1), user(2), AMOUNT).unwrap();
    assert_eq!(l.balance_of(&user(2)), AMOUNT);
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT - AMOUNT);
    assert_eq!(r.seq, 1);
    assert_eq!(
        r.event,
        LedgerEvent::Transfer {
            from: user(1),
            to: user(2),
            amount: AMOUNT
        }
    );
}

#[test]
fn transfer_fails_without_enough_tokens() {
    let mut l = deploy();
    let before = l.clone();
    let err = l.transfer(user(2), user(1), AMOUNT).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            account: user(2),
            available: 0,
            required: AMOUNT
        }
    );
    assert_eq!(l, before);
}

#[test]
fn over_large_transfer_is_not_clamped() {
    let mut l = deploy();
    let err = l.transfer(user(1), user(2), EXCEEDING_AMOUNT).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            account: user(1),
            available: TOTAL_SUPPLY_DEFAULT,
            required: EXCEEDING_AMOUNT
        }
    );
    assert_eq!(l.balance_of(&user(2)), 0);
}

#[test]
fn approve_sets_allowance() {
    let mut l = deploy();
    assert_eq!(l.allowance(&user(1), &user(2)), 0);
    let r = l.approve(user(1), user(2), AMOUNT).unwrap();
    assert_eq!(l.allowance(&user(1), &user(2)), 1);
    assert_eq!(
        r.event,
        LedgerEvent::Approval {
            owner: user(1),
            spender: user(2),
            amount: AMOUNT
        }
    );
    // no balance or supply effect
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT);
    assert_eq!(l.total_supply(), TOTAL_SUPPLY_DEFAULT);
}

#[test]
fn approve_overwrites_previous_allowance() {
    let mut l = deploy();
    l.approve(user(1), user(2), 5).unwrap();
    l.approve(user(1), user(2), 3).unwrap();
    assert_eq!(l.allowance(&user(1), &user(2)), 3);
}

#[test]
fn transfer_from_fails_without_allowance() {
    let mut l = deploy();
    // user(1) spends from user(2), who never approved it.
    let err = l
        .transfer_from(user(1), user(2), user(1), AMOUNT)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientAllowance {
            owner: user(2),
            spender: user(1),
            allowance: 0,
            required: AMOUNT
        }
    );
}

#[test]
fn transfer_from_fails_without_enough_tokens() {
    let mut l = deploy();
    l.approve(user(1), user(2), EXCEEDING_AMOUNT).unwrap();
    let before = l.clone();
    let err = l
        .transfer_from(user(2), user(1), user(2), EXCEEDING_AMOUNT)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            account: user(1),
            available: TOTAL_SUPPLY_DEFAULT,
            required: EXCEEDING_AMOUNT
        }
    );
    assert_eq!(l, before);
    assert_eq!(l.allowance(&user(1), &user(2)), EXCEEDING_AMOUNT);
}

#[test]
fn transfer_from_moves_tokens_and_consumes_allowance() {
    let mut l = deploy();
    l.approve(user(1), user(2), AMOUNT).unwrap();
    let r = l.transfer_from(user(2), user(1), user(2), AMOUNT).unwrap();
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT - AMOUNT);
    assert_eq!(l.balance_of(&user(2)), AMOUNT);
    assert_eq!(l.allowance(&user(1), &user(2)), 0);
    assert_eq!(
        r.event,
        LedgerEvent::Transfer {
            from: user(1),
            to: user(2),
            amount: AMOUNT
        }
    );
}

#[test]
fn transfer_from_decrements_partial_allowance() {
    let mut l = deploy();
    l.approve(user(1), user(2), 7).unwrap();
    l.transfer_from(user(2), user(1), user(3), 2).unwrap();
    assert_eq!(l.allowance(&user(1), &user(2)), 5);
    assert_eq!(l.balance_of(&user(3)), 2);
}

#[test]
fn owner_mints_to_self() {
    let mut l = deploy();
    let r = l.mint(user(1), AMOUNT).unwrap();
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT + AMOUNT);
    assert_eq!(l.total_supply(), TOTAL_SUPPLY_DEFAULT + AMOUNT);
    assert_eq!(
        r.event,
        LedgerEvent::Transfer {
            from: Address::ZERO,
            to: user(1),
            amount: AMOUNT
        }
    );
}

#[test]
fn only_owner_can_mint() {
    let mut l = deploy();
    let before = l.clone();
    let err = l.mint(user(2), 1).unwrap_err();
    assert_eq!(err, LedgerError::NotAuthorized);
    assert_eq!(err.to_string(), "only owner can do this");
    assert_eq!(l.mint_to(user(2), 0, user(2)).unwrap_err(), LedgerError::NotAuthorized);
    assert_eq!(l, before);
}

#[test]
fn owner_mints_to_another_address() {
    let mut l = deploy();
    l.mint_to(user(1), AMOUNT, user(2)).unwrap();
    assert_eq!(l.balance_of(&user(2)), AMOUNT);
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT);
    assert_eq!(l.total_supply(), TOTAL_SUPPLY_DEFAULT + AMOUNT);
}

#[test]
fn burn_reduces_balance_and_supply() {
    let mut l = deploy();
    let r = l.burn(user(1), AMOUNT).unwrap();
    assert_eq!(
        r.event,
        LedgerEvent::Transfer {
            from: user(1),
            to: Address::ZERO,
            amount: AMOUNT
        }
    );
    assert_eq!(l.balance_of(&user(1)), TOTAL_SUPPLY_DEFAULT - AMOUNT);
    assert_eq!(l.total_supply(), TOTAL_SUPPLY_DEFAULT - AMOUNT);
}

#[test]
fn burn_fails_without_enough_tokens() {
    let mut l = deploy();
    let err = l.burn(user(2), AMOUNT).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            account: user(2),
            available: 0,
            required: AMOUNT
        }
    );
}

#[test]
fn mint_then_burn_round_trips() {
    let mut l = deploy();
    let supply = l.total_supply();
    let bal = l.balance_of(&user(1));
    l.mint(user(1), AMOUNT).unwrap();
    l.burn(user(1), AMOUNT).unwrap();
    assert_eq!(l.total_supply(), supply);
    assert_eq!(l.balance_of(&user(1)), bal);
}

#[test]
fn failed_calls_are_idempotent() {
    let mut l = deploy();
    let first = l.transfer(user(3), user(1), 4).unwrap_err();
    let second = l.transfer(user(3), user(1), 4).unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn events_are_ordered_one_per_successful_call() {
    let mut l = deploy();
    l.transfer(user(1), user(2), 2).unwrap();
    l.transfer(user(2), user(3), 5).unwrap_err();
    l.approve(user(2), user(3), 1).unwrap();
    l.transfer_from(user(3), user(2), user(4), 1).unwrap();
    l.burn(user(1), 1).unwrap();

    let seqs: Vec<u64> = l.events().since(0, 100).iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    assert_eq!(l.events().since(3, 1).len(), 1);
    assert_eq!(
        l.events().since(3, 1)[0].event,
        LedgerEvent::Transfer {
            from: user(2),
            to: user(4),
            amount: 1
        }
    );
    assert_eq!(sum_balances(&l), l.total_supply());
}

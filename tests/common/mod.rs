// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0

#![allow(dead_code)]

use amun_token::core::ledger::{Call, TokenLedger, TokenMetadata};
use amun_token::core::types::{Address, Amount};
use proptest::prelude::*;

pub const TOTAL_SUPPLY_DEFAULT: Amount = 10;
pub const AMOUNT: Amount = 1;
pub const EXCEEDING_AMOUNT: Amount = TOTAL_SUPPLY_DEFAULT + AMOUNT;

pub fn user(i: u8) -> Address {
    let mut b = [0u8; 20];
    b[0] = 0xa0;
    b[19] = i;
    Address::from_bytes(b)
}

pub fn meta(owner: Address) -> TokenMetadata {
    TokenMetadata {
        name: "TestToken".to_string(),
        symbol: "TST".to_string(),
        decimals: 18,
        owner,
    }
}

/// Ledger deployed by `user(1)` with the default supply.
pub fn deploy() -> TokenLedger {
    TokenLedger::new(meta(user(1)), TOTAL_SUPPLY_DEFAULT).unwrap()
}

pub fn sum_balances(l: &TokenLedger) -> Amount {
    l.balances().map(|(_, v)| *v).sum()
}

/// Small address space so calls collide on the same accounts often.
pub fn arb_user() -> impl Strategy<Value = Address> {
    (1u8..=4).prop_map(user)
}

pub fn arb_amount() -> impl Strategy<Value = Amount> {
    prop_oneof![0u128..=12, Just(Amount::MAX)]
}

pub fn arb_call() -> impl Strategy<Value = Call> {
    prop_oneof![
        (arb_user(), arb_amount()).prop_map(|(to, amount)| Call::Transfer { to, amount }),
        (arb_user(), arb_amount()).prop_map(|(spender, amount)| Call::Approve { spender, amount }),
        (arb_user(), arb_user(), arb_amount())
            .prop_map(|(from, to, amount)| Call::TransferFrom { from, to, amount }),
        (arb_amount(), proptest::option::of(arb_user()))
            .prop_map(|(amount, to)| Call::Mint { amount, to }),
        arb_amount().prop_map(|amount| Call::Burn { amount }),
    ]
}

pub fn arb_calls(max: usize) -> impl Strategy<Value = Vec<(Address, Call)>> {
    proptest::collection::vec((arb_user(), arb_call()), 0..max)
}

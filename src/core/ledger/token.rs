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
#![deny(missing_docs)]

//! Deterministic token ledger: transfer, approve, transfer_from, mint, burn.
//!
//! Every mutating call runs in two steps. [`TokenLedger::prepare`] validates the
//! call against current state and resolves it into a [`StateDelta`] holding the
//! absolute post-call value of every touched entry; [`TokenLedger::apply`] writes
//! the delta and appends its event. A rejected call therefore never mutates
//! anything, and a collaborator may persist the delta before applying it.
//!
//! Invariant: `sum(balances) == total_supply` after every call.

use crate::core::ledger::call::{Call, StateDelta, Write};
use crate::core::ledger::event::{EventLog, LedgerEvent, Receipt};
use crate::core::types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Ledger errors. All are deterministic in (state, call).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Account balance is below the required amount.
    #[error("insufficient balance: {account} has {available}, needs {required}")]
    InsufficientBalance {
        /// Debited account.
        account: Address,
        /// Its current balance.
        available: Amount,
        /// Requested amount.
        required: Amount,
    },
    /// Spender's allowance over `owner` is below the required amount.
    #[error("insufficient allowance: {spender} may spend {allowance} of {owner}, needs {required}")]
    InsufficientAllowance {
        /// Owner of the funds.
        owner: Address,
        /// Spender (the caller).
        spender: Address,
        /// Current allowance.
        allowance: Amount,
        /// Requested amount.
        required: Amount,
    },
    /// Caller is not the ledger owner.
    #[error("only owner can do this")]
    NotAuthorized,
    /// The debited party is the zero address.
    #[error("invalid sender {0}")]
    InvalidSender(Address),
    /// The credited party is the zero address.
    #[error("invalid receiver {0}")]
    InvalidReceiver(Address),
    /// Approving from the zero address.
    #[error("invalid approver {0}")]
    InvalidApprover(Address),
    /// Approving the zero address as spender.
    #[error("invalid spender {0}")]
    InvalidSpender(Address),
    /// A credit or supply increase exceeds the amount width.
    #[error("amount overflow")]
    Overflow,
}

/// Immutable token metadata, fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Display decimals; no effect on arithmetic.
    pub decimals: u8,
    /// The only identity allowed to mint.
    pub owner: Address,
}

/// Authoritative balances, allowances and supply of one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenLedger {
    meta: TokenMetadata,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    /// Keyed by (owner, spender).
    allowances: BTreeMap<(Address, Address), Amount>,
    events: EventLog,
}

impl TokenLedger {
    /// Create a ledger crediting `initial_supply` to `meta.owner`.
    ///
    /// A non-zero genesis supply is recorded as `Transfer(ZERO, owner, supply)` so the
    /// event log alone reconstructs every balance.
    pub fn new(meta: TokenMetadata, initial_supply: Amount) -> Result<Self, LedgerError> {
        if meta.owner.is_zero() {
            return Err(LedgerError::InvalidReceiver(meta.owner));
        }
        let owner = meta.owner;
        let mut ledger = Self {
            meta,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: EventLog::new(),
        };
        if initial_supply > 0 {
            ledger.apply(StateDelta {
                writes: vec![
                    Write::Balance {
                        account: owner,
                        value: initial_supply,
                    },
                    Write::TotalSupply(initial_supply),
                ],
                event: LedgerEvent::Transfer {
                    from: Address::ZERO,
                    to: owner,
                    amount: initial_supply,
                },
            });
        }
        Ok(ledger)
    }

    /// Reassemble a ledger from stored parts. Callers should check
    /// [`TokenLedger::is_conserved`] before trusting the result.
    pub fn from_parts(
        meta: TokenMetadata,
        total_supply: Amount,
        balances: BTreeMap<Address, Amount>,
        allowances: BTreeMap<(Address, Address), Amount>,
        events: EventLog,
    ) -> Self {
        Self {
            meta,
            total_supply,
            balances,
            allowances,
            events,
        }
    }

    /// Token metadata.
    pub fn metadata(&self) -> &TokenMetadata {
        &self.meta
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.meta.symbol
    }

    /// Display decimals.
    pub fn decimals(&self) -> u8 {
        self.meta.decimals
    }

    /// Owner identity.
    pub fn owner(&self) -> Address {
        self.meta.owner
    }

    /// Total supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`; zero if never credited.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Allowance of `spender` over `owner`'s funds; zero if never set.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// All balance entries, including zeroes, in address order.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// All allowance entries, keyed by (owner, spender).
    pub fn allowances(&self) -> impl Iterator<Item = (&(Address, Address), &Amount)> {
        self.allowances.iter()
    }

    /// Event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// True when balances sum to the total supply without overflow.
    pub fn is_conserved(&self) -> bool {
        let mut sum: Amount = 0;
        for v in self.balances.values() {
            match sum.checked_add(*v) {
                Some(s) => sum = s,
                None => return false,
            }
        }
        sum == self.total_supply
    }

    /// Validate `call` for `caller` and resolve it into a delta. Never mutates.
    pub fn prepare(&self, caller: Address, call: &Call) -> Result<StateDelta, LedgerError> {
        match *call {
            Call::Transfer { to, amount } => {
                if caller.is_zero() {
                    return Err(LedgerError::InvalidSender(caller));
                }
                if to.is_zero() {
                    return Err(LedgerError::InvalidReceiver(to));
                }
                let writes = self.move_writes(caller, to, amount)?;
                Ok(StateDelta {
                    writes,
                    event: LedgerEvent::Transfer {
                        from: caller,
                        to,
                        amount,
                    },
                })
            }
            Call::Approve { spender, amount } => {
                if caller.is_zero() {
                    return Err(LedgerError::InvalidApprover(caller));
                }
                if spender.is_zero() {
                    return Err(LedgerError::InvalidSpender(spender));
                }
                Ok(StateDelta {
                    writes: vec![Write::Allowance {
                        owner: caller,
                        spender,
                        value: amount,
                    }],
                    event: LedgerEvent::Approval {
                        owner: caller,
                        spender,
                        amount,
                    },
                })
            }
            Call::TransferFrom { from, to, amount } => {
                // The allowance is spent first; party and balance checks follow.
                let allowance = self.allowance(&from, &caller);
                if allowance < amount {
                    return Err(LedgerError::InsufficientAllowance {
                        owner: from,
                        spender: caller,
                        allowance,
                        required: amount,
                    });
                }
                if from.is_zero() {
                    return Err(LedgerError::InvalidSender(from));
                }
                if to.is_zero() {
                    return Err(LedgerError::InvalidReceiver(to));
                }
                let mut writes = self.move_writes(from, to, amount)?;
                writes.push(Write::Allowance {
                    owner: from,
                    spender: caller,
                    value: allowance - amount,
                });
                Ok(StateDelta {
                    writes,
                    event: LedgerEvent::Transfer { from, to, amount },
                })
            }
            Call::Mint { amount, to } => {
                if caller != self.meta.owner {
                    return Err(LedgerError::NotAuthorized);
                }
                let to = to.unwrap_or(caller);
                if to.is_zero() {
                    return Err(LedgerError::InvalidReceiver(to));
                }
                let supply = self
                    .total_supply
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?;
                let balance = self
                    .balance_of(&to)
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?;
                Ok(StateDelta {
                    writes: vec![
                        Write::Balance {
                            account: to,
                            value: balance,
                        },
                        Write::TotalSupply(supply),
                    ],
                    event: LedgerEvent::Transfer {
                        from: Address::ZERO,
                        to,
                        amount,
                    },
                })
            }
            Call::Burn { amount } => {
                if caller.is_zero() {
                    return Err(LedgerError::InvalidSender(caller));
                }
                let balance = self.debit(caller, amount)?;
                // balance <= supply, so this cannot underflow while conserved.
                let supply = self
                    .total_supply
                    .checked_sub(amount)
                    .ok_or(LedgerError::Overflow)?;
                Ok(StateDelta {
                    writes: vec![
                        Write::Balance {
                            account: caller,
                            value: balance,
                        },
                        Write::TotalSupply(supply),
                    ],
                    event: LedgerEvent::Transfer {
                        from: caller,
                        to: Address::ZERO,
                        amount,
                    },
                })
            }
        }
    }

    /// Write a prepared delta and append its event.
    ///
    /// The delta must come from [`TokenLedger::prepare`] on this exact state.
    pub fn apply(&mut self, delta: StateDelta) -> Receipt {
        for w in delta.writes {
            match w {
                Write::Balance { account, value } => {
                    self.balances.insert(account, value);
                }
                Write::Allowance {
                    owner,
                    spender,
                    value,
                } => {
                    self.allowances.insert((owner, spender), value);
                }
                Write::TotalSupply(v) => self.total_supply = v,
            }
        }
        self.events.append(delta.event)
    }

    /// Prepare and apply in one step.
    pub fn execute(&mut self, caller: Address, call: &Call) -> Result<Receipt, LedgerError> {
        let delta = self.prepare(caller, call)?;
        Ok(self.apply(delta))
    }

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.execute(caller, &Call::Transfer { to, amount })
    }

    /// Set `allowance(caller, spender) = amount`, replacing any previous value.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.execute(caller, &Call::Approve { spender, amount })
    }

    /// Move `amount` from `from` to `to`, consuming the caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.execute(caller, &Call::TransferFrom { from, to, amount })
    }

    /// Owner-only: mint `amount` to the caller.
    pub fn mint(&mut self, caller: Address, amount: Amount) -> Result<Receipt, LedgerError> {
        self.execute(caller, &Call::Mint { amount, to: None })
    }

    /// Owner-only: mint `amount` to `to`.
    pub fn mint_to(
        &mut self,
        caller: Address,
        amount: Amount,
        to: Address,
    ) -> Result<Receipt, LedgerError> {
        self.execute(
            caller,
            &Call::Mint {
                amount,
                to: Some(to),
            },
        )
    }

    /// Destroy `amount` of the caller's balance.
    pub fn burn(&mut self, caller: Address, amount: Amount) -> Result<Receipt, LedgerError> {
        self.execute(caller, &Call::Burn { amount })
    }

    fn debit(&self, account: Address, amount: Amount) -> Result<Amount, LedgerError> {
        let available = self.balance_of(&account);
        available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account,
                available,
                required: amount,
            })
    }

    fn move_writes(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<Write>, LedgerError> {
        let from_after = self.debit(from, amount)?;
        if from == to {
            // Net no-op, but the balance check above still applies.
            return Ok(vec![Write::Balance {
                account: from,
                value: self.balance_of(&from),
            }]);
        }
        let to_after = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(vec![
            Write::Balance {
                account: from,
                value: from_after,
            },
            Write::Balance {
                account: to,
                value: to_after,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        let mut a = [0u8; 20];
        a[19] = b;
        Address::from_bytes(a)
    }

    fn ledger(supply: Amount) -> TokenLedger {
        TokenLedger::new(
            TokenMetadata {
                name: "TestToken".into(),
                symbol: "TST".into(),
                decimals: 18,
                owner: addr(1),
            },
            supply,
        )
        .unwrap()
    }

    #[test]
    fn self_transfer_checks_balance_and_emits() {
        let mut l = ledger(10);
        let r = l.transfer(addr(1), addr(1), 4).unwrap();
        assert_eq!(l.balance_of(&addr(1)), 10);
        assert_eq!(
            r.event,
            LedgerEvent::Transfer {
                from: addr(1),
                to: addr(1),
                amount: 4
            }
        );

        let err = l.transfer(addr(1), addr(1), 11).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: addr(1),
                available: 10,
                required: 11
            }
        );
    }

    #[test]
    fn allowance_is_checked_before_balance() {
        let mut l = ledger(10);
        // addr(2) owns nothing and has granted nothing: both legs would fail.
        let err = l.transfer_from(addr(1), addr(2), addr(3), 5).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));

        l.approve(addr(2), addr(1), 5).unwrap();
        let err = l.transfer_from(addr(1), addr(2), addr(3), 5).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: addr(2),
                available: 0,
                required: 5
            }
        );
    }

    #[test]
    fn zero_address_is_rejected_before_amount_checks() {
        let mut l = ledger(10);
        assert_eq!(
            l.transfer(addr(1), Address::ZERO, 1).unwrap_err(),
            LedgerError::InvalidReceiver(Address::ZERO)
        );
        assert_eq!(
            l.transfer(Address::ZERO, addr(1), 0).unwrap_err(),
            LedgerError::InvalidSender(Address::ZERO)
        );
        assert_eq!(
            l.approve(addr(1), Address::ZERO, 1).unwrap_err(),
            LedgerError::InvalidSpender(Address::ZERO)
        );
        assert_eq!(
            l.approve(Address::ZERO, addr(1), 1).unwrap_err(),
            LedgerError::InvalidApprover(Address::ZERO)
        );
        assert_eq!(
            l.mint_to(addr(1), 1, Address::ZERO).unwrap_err(),
            LedgerError::InvalidReceiver(Address::ZERO)
        );
        // genesis event only
        assert_eq!(l.events().len(), 1);
    }

    #[test]
    fn transfer_from_spends_allowance_before_party_checks() {
        let mut l = ledger(10);
        assert_eq!(
            l.transfer_from(addr(2), addr(1), Address::ZERO, 5).unwrap_err(),
            LedgerError::InsufficientAllowance {
                owner: addr(1),
                spender: addr(2),
                allowance: 0,
                required: 5
            }
        );
        assert_eq!(
            l.transfer_from(addr(2), Address::ZERO, addr(3), 5).unwrap_err(),
            LedgerError::InsufficientAllowance {
                owner: Address::ZERO,
                spender: addr(2),
                allowance: 0,
                required: 5
            }
        );

        // with the allowance in place the receiver check decides
        l.approve(addr(1), addr(2), 5).unwrap();
        assert_eq!(
            l.transfer_from(addr(2), addr(1), Address::ZERO, 5).unwrap_err(),
            LedgerError::InvalidReceiver(Address::ZERO)
        );
        // zero amount passes the allowance leg for any owner
        assert_eq!(
            l.transfer_from(addr(2), Address::ZERO, addr(3), 0).unwrap_err(),
            LedgerError::InvalidSender(Address::ZERO)
        );
        assert_eq!(l.allowance(&addr(1), &addr(2)), 5);
    }

    #[test]
    fn mint_overflow_fails_without_mutation() {
        let mut l = ledger(Amount::MAX);
        let before = l.clone();
        assert_eq!(l.mint(addr(1), 1).unwrap_err(), LedgerError::Overflow);
        assert_eq!(l, before);
    }

    #[test]
    fn zero_supply_genesis_has_no_event() {
        let l = ledger(0);
        assert!(l.events().is_empty());
        assert_eq!(l.total_supply(), 0);
        assert!(l.is_conserved());
    }

    #[test]
    fn prepare_does_not_mutate() {
        let l = ledger(10);
        let before = l.clone();
        let delta = l
            .prepare(addr(1), &Call::Transfer { to: addr(2), amount: 3 })
            .unwrap();
        assert_eq!(l, before);
        assert_eq!(delta.writes.len(), 2);
    }
}

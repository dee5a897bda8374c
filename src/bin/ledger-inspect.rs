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

//! Offline inspection of a node's data directory.
//!
//! Usage: `ledger-inspect <data_dir> [address]`
//!
//! Prints metadata, supply, event count and state root; with an address, also the
//! balance and whether its Merkle proof verifies against the root.

use amun_token::core::state::ledger_store::LedgerStore;
use amun_token::core::types::Address;
use anyhow::{bail, Context, Result};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(data_dir) = args.next() else {
        bail!("usage: ledger-inspect <data_dir> [address]");
    };
    let address: Option<Address> = args
        .next()
        .map(|s| s.parse::<Address>().with_context(|| format!("bad address {s:?}")))
        .transpose()?;

    let store = LedgerStore::open(&data_dir).with_context(|| format!("opening {data_dir}"))?;
    let Some(ledger) = store.load()? else {
        bail!("{data_dir} holds no ledger");
    };

    println!("name         {}", ledger.name());
    println!("symbol       {}", ledger.symbol());
    println!("decimals     {}", ledger.decimals());
    println!("owner        {}", ledger.owner());
    println!("total_supply {}", ledger.total_supply());
    println!("events       {}", ledger.events().next_seq());
    println!("state_root   {}", hex::encode(store.state_root()?));

    if let Some(a) = address {
        println!("balance      {}", ledger.balance_of(&a));
        match store.prove_balance(&a)? {
            Some(p) => println!("proof        {}", if p.verify() { "ok" } else { "INVALID" }),
            None => println!("proof        none (never credited)"),
        }
    }
    Ok(())
}

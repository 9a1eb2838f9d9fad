//! Custody of airline funding deposits.
//!
//! Settlement lives on the host ledger; the engine only hands deposits over.

use crate::core::{Amount, Identity};
use std::collections::HashMap;

/// Receives funding deposits once an airline's funding is accepted.
pub trait FundCustody: Send + Sync {
    /// Take custody of `amount` paid by `payer` on behalf of `airline`.
    fn deposit(&mut self, payer: &Identity, airline: &Identity, amount: Amount);

    /// Total amount held.
    fn balance(&self) -> Amount;
}

/// In-memory pooled fund.
#[derive(Clone, Debug, Default)]
pub struct PooledFund {
    total: Amount,
    deposits: HashMap<Identity, Amount>,
}

impl PooledFund {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount deposited on behalf of an airline.
    pub fn deposited_for(&self, airline: &Identity) -> Amount {
        self.deposits.get(airline).copied().unwrap_or(0)
    }
}

impl FundCustody for PooledFund {
    fn deposit(&mut self, _payer: &Identity, airline: &Identity, amount: Amount) {
        self.total = self.total.saturating_add(amount);
        let entry = self.deposits.entry(*airline).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    fn balance(&self) -> Amount {
        self.total
    }
}

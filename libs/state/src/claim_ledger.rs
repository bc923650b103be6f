//! Claim-Token Ledger
//!
//! Fungible books of `(total_supply, balances)`. A [`LedgerKey`] selects the
//! book: `Global` for one supply shared by every pool, `Pool(key)` for an
//! independent book per pair. Which key a call uses is the engine's choice.
//!
//! Invariant per book: `total_supply == sum(balances)`. A balance never
//! exceeds the supply, so an overflow check on the supply covers the holder.

use pool_types::{AccountId, PairKey, PoolError, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Selects a claim-token book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKey {
    Global,
    Pool(PairKey),
}

/// One fungible claim-token book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimBook {
    total_supply: U256,
    balances: HashMap<AccountId, U256>,
}

impl ClaimBook {
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &AccountId) -> U256 {
        self.balances.get(holder).copied().unwrap_or_default()
    }
}

/// All claim-token books, created lazily
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimLedger {
    books: HashMap<LedgerKey, ClaimBook>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self, key: &LedgerKey) -> U256 {
        self.books
            .get(key)
            .map(ClaimBook::total_supply)
            .unwrap_or_default()
    }

    pub fn balance_of(&self, key: &LedgerKey, holder: &AccountId) -> U256 {
        self.books
            .get(key)
            .map(|book| book.balance_of(holder))
            .unwrap_or_default()
    }

    /// Check that minting `amount` would not overflow the supply
    pub fn ensure_mintable(&self, key: &LedgerKey, amount: U256) -> Result<(), PoolError> {
        self.total_supply(key)
            .checked_add(amount)
            .map(|_| ())
            .ok_or(PoolError::ArithmeticOverflow("claim supply"))
    }

    /// Check that `holder` can burn `amount`; zero is never burnable
    pub fn ensure_burnable(
        &self,
        key: &LedgerKey,
        holder: &AccountId,
        amount: U256,
    ) -> Result<(), PoolError> {
        let available = self.balance_of(key, holder);
        if amount.is_zero() || amount > available {
            return Err(PoolError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    pub fn mint(&mut self, key: LedgerKey, to: AccountId, amount: U256) -> Result<(), PoolError> {
        self.ensure_mintable(&key, amount)?;

        let book = self.books.entry(key).or_default();
        book.total_supply += amount;
        let balance = book.balances.entry(to).or_default();
        *balance += amount;
        Ok(())
    }

    pub fn burn(&mut self, key: LedgerKey, from: AccountId, amount: U256) -> Result<(), PoolError> {
        self.ensure_burnable(&key, &from, amount)?;

        let book = self
            .books
            .get_mut(&key)
            .ok_or(PoolError::ArithmeticUnderflow("claim supply"))?;
        let balance = book.balance_of(&from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(PoolError::ArithmeticUnderflow("claim balance"))?;
        book.total_supply = book
            .total_supply
            .checked_sub(amount)
            .ok_or(PoolError::ArithmeticUnderflow("claim supply"))?;

        if remaining.is_zero() {
            book.balances.remove(&from);
        } else {
            book.balances.insert(from, remaining);
        }
        Ok(())
    }
}

//! Wallet — balance and denominations
//!
//! Every mutation is written to the store before it is committed in
//! memory, so a failed save leaves the wallet exactly as it was.

use reel_core::{ReelError, ReelResult};
use reel_state::BalanceStore;

use crate::config::WalletConfig;

pub struct Wallet<S: BalanceStore> {
    balance: u64,
    denominations: Vec<u64>,
    store: S,
}

impl<S: BalanceStore> Wallet<S> {
    /// Load the balance from `store`, falling back to the starting balance
    pub fn open(store: S, config: &WalletConfig) -> ReelResult<Self> {
        let balance = match store.load_balance()? {
            Some(balance) => {
                log::info!("Restored balance {}", balance);
                balance
            }
            None => {
                log::info!("No stored balance, starting at {}", config.starting_balance);
                config.starting_balance
            }
        };

        Ok(Self {
            balance,
            denominations: config.denominations.clone(),
            store,
        })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Allowed bet sizes (a copy; the set is fixed for the session)
    pub fn available_amounts(&self) -> Vec<u64> {
        self.denominations.clone()
    }

    pub fn is_denomination(&self, amount: u64) -> bool {
        self.denominations.contains(&amount)
    }

    /// Remove `amount`; rejected (not clamped) if it exceeds the balance
    ///
    /// Zero is not an amount: it fails with `InvalidDenomination(0)`.
    pub fn debit(&mut self, amount: u64) -> ReelResult<u64> {
        ensure_positive(amount)?;
        let next = self
            .balance
            .checked_sub(amount)
            .ok_or(ReelError::InsufficientFunds {
                requested: amount,
                balance: self.balance,
            })?;
        self.commit(next)
    }

    /// Add `amount`; zero is rejected like in `debit`
    pub fn credit(&mut self, amount: u64) -> ReelResult<u64> {
        ensure_positive(amount)?;
        let next = self.balance.saturating_add(amount);
        self.commit(next)
    }

    /// Charge the cost of one spin: the amount must be a denomination
    pub fn charge_spin(&mut self, amount: u64) -> ReelResult<u64> {
        if !self.is_denomination(amount) {
            return Err(ReelError::InvalidDenomination(amount));
        }
        self.debit(amount)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn commit(&mut self, next: u64) -> ReelResult<u64> {
        self.store.save_balance(next)?;
        log::debug!("Balance {} -> {}", self.balance, next);
        self.balance = next;
        Ok(next)
    }
}

impl<S: BalanceStore> std::fmt::Debug for Wallet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("balance", &self.balance)
            .field("denominations", &self.denominations)
            .finish()
    }
}

fn ensure_positive(amount: u64) -> ReelResult<()> {
    if amount == 0 {
        Err(ReelError::InvalidDenomination(0))
    } else {
        Ok(())
    }
}

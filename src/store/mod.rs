use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::wallet::{LedgerError, Wallet, WalletId};

pub mod in_memory;

/// Accepted deposit as kept in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub wallet_id: WalletId,
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
}

/// Owns wallet state and enforces the balance invariants.
pub trait WalletStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Wallet>;

    /// Validates and commits `amount` as a single step per wallet.
    ///
    /// `on_commit` runs after the balance changed but before the wallet is
    /// released, so whatever it records is visible together with the new
    /// balance. It never runs for a rejected deposit.
    fn try_deposit<F>(
        &self,
        id: &str,
        amount: Decimal,
        on_commit: F,
    ) -> Result<Decimal, LedgerError>
    where
        F: FnOnce(&Wallet);
}

/// Append-only per-wallet transaction log.
pub trait HistoryLedger: Send + Sync {
    fn append(&self, wallet_id: &str, amount: Decimal, timestamp: DateTime<Utc>);

    /// Snapshot of the wallet's entries in insertion order.
    fn entries_for(&self, wallet_id: &str) -> Vec<Transaction>;
}

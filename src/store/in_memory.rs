use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::wallet::{LedgerError, Wallet, WalletId};

use super::{HistoryLedger, Transaction, WalletStore};

/// Wallet registry with one lock per wallet.
///
/// The outer lock is only taken exclusively by [`InMemoryWalletStore::insert`],
/// so at runtime deposits on different wallets never wait for each other.
#[derive(Debug, Default)]
pub struct InMemoryWalletStore {
    wallets: RwLock<HashMap<WalletId, RwLock<Wallet>>>,
}

impl InMemoryWalletStore {
    /// Registers a pre-existing wallet, replacing any wallet with the same id.
    pub fn insert(&self, wallet: Wallet) -> Option<Wallet> {
        self.wallets
            .write()
            .insert(wallet.id().to_owned(), RwLock::new(wallet))
            .map(|previous| previous.into_inner())
    }

    pub fn len(&self) -> usize {
        self.wallets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Wallet> for InMemoryWalletStore {
    fn from_iter<I: IntoIterator<Item = Wallet>>(iter: I) -> Self {
        let store = Self::default();
        for wallet in iter {
            store.insert(wallet);
        }
        store
    }
}

impl WalletStore for InMemoryWalletStore {
    fn get(&self, id: &str) -> Option<Wallet> {
        self.wallets.read().get(id).map(|wallet| wallet.read().clone())
    }

    fn try_deposit<F>(
        &self,
        id: &str,
        amount: Decimal,
        on_commit: F,
    ) -> Result<Decimal, LedgerError>
    where
        F: FnOnce(&Wallet),
    {
        let wallets = self.wallets.read();
        let mut wallet = wallets.get(id).ok_or(LedgerError::WalletNotFound)?.write();
        let evt = wallet.handle_deposit(amount)?;
        wallet.apply(&evt);
        on_commit(&wallet);
        Ok(wallet.balance())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryHistoryLedger {
    entries: DashMap<WalletId, Vec<Transaction>>,
}

impl HistoryLedger for InMemoryHistoryLedger {
    fn append(&self, wallet_id: &str, amount: Decimal, timestamp: DateTime<Utc>) {
        self.entries
            .entry(wallet_id.to_owned())
            .or_default()
            .push(Transaction {
                wallet_id: wallet_id.to_owned(),
                timestamp,
                amount,
            });
    }

    fn entries_for(&self, wallet_id: &str) -> Vec<Transaction> {
        self.entries
            .get(wallet_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }
}

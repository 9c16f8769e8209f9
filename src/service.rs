use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::Zero};
use tracing::{info, warn};

use crate::{
    stats::{MonthlyStats, StatsEngine},
    store::{
        HistoryLedger, WalletStore,
        in_memory::{InMemoryHistoryLedger, InMemoryWalletStore},
    },
    wallet::LedgerError,
};

pub struct LedgerService<W = InMemoryWalletStore, H = InMemoryHistoryLedger> {
    wallets: W,
    history: H,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(InMemoryWalletStore::default(), InMemoryHistoryLedger::default())
    }
}

impl<W, H> LedgerService<W, H>
where
    W: WalletStore,
    H: HistoryLedger,
{
    pub fn new(wallets: W, history: H) -> Self {
        Self { wallets, history }
    }

    pub fn wallets(&self) -> &W {
        &self.wallets
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn check_account(&self, wallet_id: &str) -> Result<(), LedgerError> {
        self.wallets
            .get(wallet_id)
            .map(|_| ())
            .ok_or(LedgerError::WalletNotFound)
    }

    /// Credits `amount` and records it, returning the new balance.
    pub fn deposit(&self, wallet_id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.commit_deposit(wallet_id, amount, Utc::now)
    }

    /// Same as [`Self::deposit`] with a fixed transaction timestamp.
    pub fn deposit_at(
        &self,
        wallet_id: &str,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        self.commit_deposit(wallet_id, amount, || timestamp)
    }

    fn commit_deposit(
        &self,
        wallet_id: &str,
        amount: Decimal,
        clock: impl FnOnce() -> DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        // the history entry is written while the wallet is still locked
        let result = self.wallets.try_deposit(wallet_id, amount, |wallet| {
            self.history.append(wallet.id(), amount, clock())
        });
        match &result {
            Ok(balance) => info!(wallet_id, %amount, %balance, "deposit accepted"),
            Err(err) => warn!(wallet_id, %amount, %err, "deposit rejected"),
        }
        result
    }

    /// Unknown wallets report a zero balance instead of an error.
    pub fn get_balance(&self, wallet_id: &str) -> Decimal {
        self.wallets
            .get(wallet_id)
            .map(|wallet| wallet.balance())
            .unwrap_or_else(Decimal::zero)
    }

    pub fn get_monthly_stats(&self, wallet_id: &str) -> MonthlyStats {
        self.get_monthly_stats_at(wallet_id, Utc::now())
    }

    pub fn get_monthly_stats_at(&self, wallet_id: &str, as_of: DateTime<Utc>) -> MonthlyStats {
        StatsEngine::new(&self.history).monthly_stats(wallet_id, as_of)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use crate::wallet::Wallet;

    use super::*;

    fn service() -> LedgerService {
        let service = LedgerService::default();
        service
            .wallets()
            .insert(Wallet::new("w1", true, dec!(99999)).unwrap());
        service
            .wallets()
            .insert(Wallet::new("w2", false, Decimal::zero()).unwrap());
        service
    }

    #[test]
    fn check_account() {
        let service = service();
        assert!(service.check_account("w1").is_ok());
        assert_eq!(
            service.check_account("ghost").unwrap_err(),
            LedgerError::WalletNotFound
        );
    }

    #[test]
    fn deposit_records_history() {
        let service = service();
        let balance = service.deposit("w2", dec!(5000)).unwrap();
        assert_eq!(balance, dec!(5000));
        assert_eq!(service.get_balance("w2"), dec!(5000));

        let history = service.history().entries_for("w2");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, dec!(5000));
        assert_eq!(history[0].wallet_id, "w2");
    }

    #[test]
    fn unidentified_wallet_fills_up_to_cap() {
        let service = service();
        service.deposit("w2", dec!(5000)).unwrap();
        service.deposit("w2", dec!(5000)).unwrap();
        assert_eq!(service.get_balance("w2"), dec!(10000));

        assert_eq!(
            service.deposit("w2", dec!(1)).unwrap_err(),
            LedgerError::LimitExceeded
        );
        assert_eq!(service.get_balance("w2"), dec!(10000));
        assert_eq!(service.history().entries_for("w2").len(), 2);
    }

    #[test]
    fn failed_deposits_leave_no_trace() {
        let service = service();
        assert_eq!(
            service.deposit("w1", dec!(2)).unwrap_err(),
            LedgerError::LimitExceeded
        );
        assert_eq!(service.get_balance("w1"), dec!(99999));
        assert_eq!(
            service.deposit("w1", Decimal::zero()).unwrap_err(),
            LedgerError::InvalidAmount
        );
        assert_eq!(
            service.deposit("ghost", dec!(1)).unwrap_err(),
            LedgerError::WalletNotFound
        );
        assert!(service.history().entries_for("w1").is_empty());
        assert!(service.history().entries_for("ghost").is_empty());
    }

    #[test]
    fn balance_of_unknown_wallet_is_zero() {
        assert_eq!(service().get_balance("ghost"), Decimal::zero());
    }

    #[test]
    fn monthly_stats_follow_deposits() {
        let service = service();
        let in_month = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap();
        service.deposit_at("w2", dec!(100), before).unwrap();
        service.deposit_at("w2", dec!(250), in_month).unwrap();
        service.deposit_at("w2", dec!(0.5), in_month).unwrap();

        let stats = service.get_monthly_stats_at("w2", in_month);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.amount, dec!(250.5));

        let expected: Decimal = service
            .history()
            .entries_for("w2")
            .iter()
            .filter(|tx| tx.timestamp.format("%Y-%m").to_string() == "2024-05")
            .map(|tx| tx.amount)
            .sum();
        assert_eq!(stats.amount, expected);

        assert_eq!(service.get_monthly_stats("ghost"), MonthlyStats::default());
    }

    #[test]
    fn current_month_stats_include_fresh_deposit() {
        let service = service();
        service.deposit("w2", dec!(42)).unwrap();
        let stats = service.get_monthly_stats("w2");
        assert_eq!(stats.count, 1);
        assert_eq!(stats.amount, dec!(42));
    }

    #[test]
    fn concurrent_deposits_match_history() {
        let service = Arc::new(service());
        let handles: Vec<_> = (0..40)
            .map(|_| {
                let service = Arc::clone(&service);
                thread::spawn(move || service.deposit("w2", dec!(700)).is_ok())
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();

        let balance = service.get_balance("w2");
        assert!(balance <= dec!(10000));
        assert_eq!(balance, dec!(700) * Decimal::from(accepted));
        assert_eq!(accepted, 14);
        assert_eq!(service.history().entries_for("w2").len(), accepted);
    }
}

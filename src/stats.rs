use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::{Decimal, prelude::Zero};
use serde::Serialize;

use crate::store::HistoryLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Default for MonthlyStats {
    fn default() -> Self {
        Self {
            count: 0,
            amount: Decimal::zero(),
        }
    }
}

/// Calendar month in UTC, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    pub fn containing(as_of: DateTime<Utc>) -> Self {
        let date = as_of.date_naive();
        let first_day = date - Duration::days(i64::from(date.day0()));
        Self {
            start: midnight(first_day),
            end: midnight(first_day + Months::new(1)),
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

pub struct StatsEngine<'a, H: ?Sized> {
    history: &'a H,
}

impl<'a, H> StatsEngine<'a, H>
where
    H: HistoryLedger + ?Sized,
{
    pub fn new(history: &'a H) -> Self {
        Self { history }
    }

    pub fn monthly_stats(&self, wallet_id: &str, as_of: DateTime<Utc>) -> MonthlyStats {
        let window = MonthWindow::containing(as_of);
        self.history
            .entries_for(wallet_id)
            .iter()
            .filter(|tx| window.contains(tx.timestamp))
            .fold(MonthlyStats::default(), |stats, tx| MonthlyStats {
                count: stats.count + 1,
                amount: stats.amount + tx.amount,
            })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::store::in_memory::InMemoryHistoryLedger;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn window_covers_whole_month() {
        let window = MonthWindow::containing(at(2024, 2, 15, 13, 30, 0));
        assert_eq!(window.start, at(2024, 2, 1, 0, 0, 0));
        assert_eq!(window.end, at(2024, 3, 1, 0, 0, 0));

        assert!(window.contains(at(2024, 2, 1, 0, 0, 0)));
        assert!(window.contains(at(2024, 2, 29, 23, 59, 59)));
        assert!(!window.contains(at(2024, 1, 31, 23, 59, 59)));
        assert!(!window.contains(at(2024, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn window_rolls_over_year_end() {
        let window = MonthWindow::containing(at(2023, 12, 31, 23, 59, 59));
        assert_eq!(window.start, at(2023, 12, 1, 0, 0, 0));
        assert_eq!(window.end, at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn stats_only_count_current_month() {
        let history = InMemoryHistoryLedger::default();
        history.append("w", dec!(1), at(2024, 1, 31, 23, 59, 59));
        history.append("w", dec!(10), at(2024, 2, 1, 0, 0, 0));
        history.append("w", dec!(20.5), at(2024, 2, 14, 8, 0, 0));
        history.append("w", dec!(30), at(2024, 2, 29, 23, 0, 0));
        history.append("w", dec!(40), at(2024, 3, 1, 0, 0, 0));
        history.append("other", dec!(99), at(2024, 2, 10, 0, 0, 0));

        let stats = StatsEngine::new(&history).monthly_stats("w", at(2024, 2, 1, 9, 0, 0));
        assert_eq!(
            stats,
            MonthlyStats {
                count: 3,
                amount: dec!(60.5),
            }
        );
    }

    #[test]
    fn stats_for_wallet_without_history() {
        let history = InMemoryHistoryLedger::default();
        let stats = StatsEngine::new(&history).monthly_stats("w", Utc::now());
        assert_eq!(stats, MonthlyStats::default());
    }

    #[test]
    fn stats_serialize_amount_as_number() {
        let stats = MonthlyStats {
            count: 2,
            amount: dec!(10000),
        };
        let json: serde_json::Value = serde_json::to_value(stats).unwrap();
        assert_eq!(json, serde_json::json!({"count": 2, "amount": 10000.0}));
    }
}

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::auth_service::AuthService;
use super::clock::Clock;
use super::error::ParkError;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub active_bookings: usize,
    pub total_spent: i64,
    pub hours_parked: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    pub balance: i64,
    pub total_recharged: i64,
    pub total_spent: i64,
}

/// A line in the recent-activity feed, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub description: String,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
    pub relative: String,
}

/// Human-readable distance between `then` and `now`, matching what a
/// phone notification shade would show.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} mins ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = elapsed.num_days();
    if days == 1 {
        return "Yesterday".to_string();
    }
    if days < 7 {
        return format!("{days} days ago");
    }
    then.format("%d %b %Y").to_string()
}

/// Read-only aggregations over the current user's history. Everything is
/// recomputed from the persisted collections on each call; nothing here
/// caches or mutates.
pub struct StatsService {
    store: Arc<Store>,
    auth: Arc<AuthService>,
    clock: Arc<dyn Clock>,
}

impl StatsService {
    pub fn new(store: Arc<Store>, auth: Arc<AuthService>, clock: Arc<dyn Clock>) -> Self {
        Self { store, auth, clock }
    }

    fn user_id(&self) -> Result<String, ParkError> {
        self.auth
            .current_user()
            .map(|u| u.id)
            .ok_or(ParkError::NotLoggedIn)
    }

    pub fn dashboard(&self) -> Result<DashboardStats, ParkError> {
        let user_id = self.user_id()?;
        let now = self.clock.now();
        let bookings = self.store.bookings.for_user(&user_id)?;
        let transactions = self.store.transactions.for_user(&user_id)?;

        Ok(DashboardStats {
            total_bookings: bookings.len(),
            active_bookings: bookings.iter().filter(|b| b.is_active(now)).count(),
            total_spent: spent(&transactions),
            hours_parked: bookings.iter().map(|b| b.duration_hours as u64).sum(),
        })
    }

    pub fn wallet_summary(&self) -> Result<WalletSummary, ParkError> {
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        let transactions = self.store.transactions.for_user(&user.id)?;
        Ok(WalletSummary {
            balance: user.wallet_balance,
            total_recharged: transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Recharge)
                .map(|t| t.amount)
                .sum(),
            total_spent: spent(&transactions),
        })
    }

    /// Full ledger, newest first.
    pub fn transactions(&self) -> Result<Vec<Transaction>, ParkError> {
        let user_id = self.user_id()?;
        let mut transactions = self.store.transactions.for_user(&user_id)?;
        transactions.sort_by_key(|t| std::cmp::Reverse(t.occurred_at()));
        Ok(transactions)
    }

    /// Bookings and recharges merged into one feed, newest first, capped at
    /// `limit` entries.
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>, ParkError> {
        let user_id = self.user_id()?;
        let now = self.clock.now();

        let mut feed: Vec<Activity> = self
            .store
            .bookings
            .for_user(&user_id)?
            .into_iter()
            .map(|b| Activity {
                description: format!("Booked parking slot {} at {}", b.slot_number, b.complex),
                amount: -b.amount,
                occurred_at: b.booked_at,
                relative: relative_time(b.booked_at, now),
            })
            .collect();

        feed.extend(
            self.store
                .transactions
                .for_user(&user_id)?
                .into_iter()
                .filter(|t| t.kind == TransactionKind::Recharge)
                .map(|t| {
                    let at = t.occurred_at();
                    Activity {
                        description: format!("Wallet recharged \u{20b9}{}", t.amount),
                        amount: t.amount,
                        occurred_at: at,
                        relative: relative_time(at, now),
                    }
                }),
        );

        feed.sort_by_key(|a| std::cmp::Reverse(a.occurred_at));
        feed.truncate(limit);
        Ok(feed)
    }
}

fn spent(transactions: &[Transaction]) -> i64 {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Payment && t.amount < 0)
        .map(|t| -t.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{Booking, BookingStatus};
    use crate::services::clock::ManualClock;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};

    fn booking(date: NaiveDate, hour: u32, duration: u32, amount: i64) -> Booking {
        Booking {
            id: format!("SP{:06}", hour),
            slot_number: "A01".to_string(),
            location: "Ground Floor".to_string(),
            complex: "Phoenix MarketCity Mall".to_string(),
            date,
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            duration_hours: duration,
            amount,
            entry_code: "ENTRY_X_1".to_string(),
            exit_code: "EXIT_X_1".to_string(),
            user_name: "Alice".to_string(),
            status: BookingStatus::Active,
            booked_at: date.and_hms_opt(hour, 0, 0).unwrap().and_utc(),
        }
    }

    struct Fixture {
        store: Arc<Store>,
        auth: Arc<AuthService>,
        clock: Arc<ManualClock>,
        stats: StatsService,
        user_id: String,
    }

    fn setup() -> Fixture {
        let store = Arc::new(Store::new_memory());
        let auth = Arc::new(AuthService::new(store.clone()).unwrap());
        let user = auth
            .register("Alice", "alice@test.com", "Pw1!", "1234")
            .unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap(),
        ));
        let stats = StatsService::new(store.clone(), auth.clone(), clock.clone());
        Fixture {
            store,
            auth,
            clock,
            stats,
            user_id: user.id,
        }
    }

    #[test]
    fn test_dashboard_counts_and_sums() {
        let fx = setup();
        let today = fx.clock.now().date_naive();
        // Active: started at 11:00 for 3h, now is 12:00
        fx.store
            .bookings
            .append(&fx.user_id, &booking(today, 11, 3, 150))
            .unwrap();
        // Expired: two days ago
        fx.store
            .bookings
            .append(&fx.user_id, &booking(today - Duration::days(2), 9, 2, 120))
            .unwrap();

        let payment = Transaction {
            kind: TransactionKind::Payment,
            amount: -150,
            ..Transaction::recharge(0, fx.clock.now())
        };
        fx.store.transactions.append(&fx.user_id, &payment).unwrap();
        fx.store
            .transactions
            .append(&fx.user_id, &Transaction::recharge(500, fx.clock.now()))
            .unwrap();

        let stats = fx.stats.dashboard().unwrap();
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.active_bookings, 1);
        assert_eq!(stats.total_spent, 150);
        assert_eq!(stats.hours_parked, 5);
    }

    #[test]
    fn test_dashboard_is_idempotent() {
        let fx = setup();
        let today = fx.clock.now().date_naive();
        fx.store
            .bookings
            .append(&fx.user_id, &booking(today, 11, 3, 150))
            .unwrap();

        let first = fx.stats.dashboard().unwrap();
        let second = fx.stats.dashboard().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wallet_summary_separates_recharges_from_spend() {
        let fx = setup();
        fx.auth.update_wallet_balance(500).unwrap();
        fx.store
            .transactions
            .append(&fx.user_id, &Transaction::recharge(500, fx.clock.now()))
            .unwrap();
        let payment = Transaction {
            kind: TransactionKind::Payment,
            amount: -120,
            ..Transaction::recharge(0, fx.clock.now())
        };
        fx.store.transactions.append(&fx.user_id, &payment).unwrap();
        fx.auth.update_wallet_balance(-120).unwrap();

        let summary = fx.stats.wallet_summary().unwrap();
        assert_eq!(summary.balance, 880);
        assert_eq!(summary.total_recharged, 500);
        assert_eq!(summary.total_spent, 120);
    }

    #[test]
    fn test_transactions_newest_first() {
        let fx = setup();
        let base = fx.clock.now();
        for offset in [3i64, 1, 2] {
            fx.store
                .transactions
                .append(
                    &fx.user_id,
                    &Transaction::recharge(offset * 100, base - Duration::hours(offset)),
                )
                .unwrap();
        }

        let ledger = fx.stats.transactions().unwrap();
        assert_eq!(
            ledger.iter().map(|t| t.amount).collect::<Vec<_>>(),
            vec![100, 200, 300]
        );
    }

    #[test]
    fn test_recent_activity_merges_and_truncates() {
        let fx = setup();
        let today = fx.clock.now().date_naive();
        fx.store
            .bookings
            .append(&fx.user_id, &booking(today, 11, 2, 120))
            .unwrap();
        fx.store
            .transactions
            .append(
                &fx.user_id,
                &Transaction::recharge(500, fx.clock.now() - Duration::minutes(5)),
            )
            .unwrap();
        fx.store
            .bookings
            .append(&fx.user_id, &booking(today - Duration::days(3), 9, 2, 100))
            .unwrap();

        let feed = fx.stats.recent_activity(2).unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed[0].description.starts_with("Booked parking slot"));
        assert_eq!(feed[0].relative, "1 hours ago");
        assert!(feed[1].description.starts_with("Wallet recharged"));
        assert_eq!(feed[1].amount, 500);
    }

    #[test]
    fn test_requires_login() {
        let fx = setup();
        fx.auth.logout().unwrap();
        assert!(matches!(
            fx.stats.dashboard().unwrap_err(),
            ParkError::NotLoggedIn
        ));
    }

    #[test]
    fn test_relative_time_bands() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 mins ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(1), now), "Yesterday");
        assert_eq!(relative_time(now - Duration::days(4), now), "4 days ago");
        assert_eq!(
            relative_time(now - Duration::days(30), now),
            "11 May 2025"
        );
    }
}

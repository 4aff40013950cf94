use chrono::{NaiveTime, TimeZone, Utc};
use std::sync::Arc;

use parkpulse::config::PaymentConfig;
use parkpulse::domain::transaction::PaymentMethod;
use parkpulse::services::{
    AuthService, BookingRequest, BookingService, Clock, ManualClock, PaymentFlow,
};
use parkpulse::store::Store;
use parkpulse::store::kv::FileKv;

fn open_store(dir: &std::path::Path) -> Arc<Store> {
    Arc::new(Store::new(Arc::new(FileKv::open(dir).unwrap())))
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
    ))
}

#[tokio::test]
async fn state_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();

    let booking_id = {
        let store = open_store(dir.path());
        let auth = Arc::new(AuthService::new(store.clone()).unwrap());
        auth.register("Alice", "alice@test.com", "Secret1!", "1234")
            .unwrap();
        let bookings = BookingService::new(store.clone(), auth.clone(), clock.clone());

        let date = clock.now().date_naive();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let slot = bookings
            .available_slots("phoenix", date, time)
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        let pending = bookings
            .prepare(&BookingRequest {
                complex_id: Some("phoenix".to_string()),
                slot: Some(slot),
                date,
                time,
                duration_hours: 2,
            })
            .unwrap();

        let mut flow = PaymentFlow::for_booking(
            auth.clone(),
            store.clone(),
            clock.clone(),
            PaymentConfig::default(),
            pending.clone(),
        );
        flow.confirm(PaymentMethod::Wallet).unwrap();
        flow.submit_pin("1234").unwrap();
        flow.process().await.unwrap();
        bookings.confirm(&pending).unwrap().id
    };

    // Fresh handles over the same directory, as after an app restart
    let store = open_store(dir.path());
    let auth = Arc::new(AuthService::new(store.clone()).unwrap());

    let user = auth.current_user().expect("session should be restored");
    assert_eq!(user.email, "alice@test.com");
    assert!(user.wallet_balance < 500);

    let bookings = BookingService::new(store.clone(), auth.clone(), clock.clone());
    let stored = bookings.bookings().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, booking_id);

    let ledger = store.transactions.for_user(&user.id).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, -stored[0].amount);
}

#[test]
fn logout_clears_session_but_keeps_history() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(dir.path());
        let auth = AuthService::new(store).unwrap();
        auth.register("Bob", "bob@test.com", "Secret1!", "4321")
            .unwrap();
        auth.logout().unwrap();
    }

    let store = open_store(dir.path());
    let auth = AuthService::new(store.clone()).unwrap();
    assert!(auth.current_user().is_none());

    // Registration survives; logging back in works
    let user = auth.login("bob@test.com", "Secret1!").unwrap();
    assert_eq!(user.name, "Bob");
    assert_eq!(store.users.registered().unwrap().len(), 1);
}

#[test]
fn users_are_isolated_per_account() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let auth = AuthService::new(store.clone()).unwrap();

    let alice = auth
        .register("Alice", "alice@test.com", "Secret1!", "1234")
        .unwrap();
    auth.logout().unwrap();
    let bob = auth
        .register("Bob", "bob@test.com", "Secret1!", "4321")
        .unwrap();

    store
        .transactions
        .append(
            &bob.id,
            &parkpulse::domain::transaction::Transaction::recharge(100, Utc::now()),
        )
        .unwrap();

    assert!(store.transactions.for_user(&alice.id).unwrap().is_empty());
    assert_eq!(store.transactions.for_user(&bob.id).unwrap().len(), 1);
}

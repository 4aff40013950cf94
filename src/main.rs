use anyhow::Result;
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use parkpulse::config::PaymentConfig;
use parkpulse::domain::transaction::PaymentMethod;
use parkpulse::services::{
    AuthService, BookingRequest, BookingService, Clock, PaymentFlow, StatsService, SystemClock,
};
use parkpulse::store::Store;
use parkpulse::store::kv::FileKv;

/// Walks one booking end to end against the on-disk store: demo login,
/// slot selection, payment, confirmation, dashboard.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let kv = Arc::new(FileKv::open("parkpulse_data")?);
    let store = Arc::new(Store::new(kv));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config = PaymentConfig::load().unwrap_or_default();

    let auth = Arc::new(AuthService::new(store.clone())?);
    let bookings = BookingService::new(store.clone(), auth.clone(), clock.clone());
    let stats = StatsService::new(store.clone(), auth.clone(), clock.clone());

    let user = match auth.current_user() {
        Some(user) => user,
        None => auth.login("user@test.com", "password123")?,
    };
    info!(name = %user.name, balance = user.wallet_balance, "signed in");

    let date = clock.now().date_naive();
    let time = NaiveTime::from_hms_opt(9, 0, 0).ok_or_else(|| anyhow::anyhow!("bad time"))?;
    let slot = bookings
        .available_slots("phoenix", date, time)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no free slots at phoenix for this window"))?;
    info!(slot = %slot.number, price = slot.price, location = %slot.location, "picked a slot");

    let pending = bookings.prepare(&BookingRequest {
        complex_id: Some("phoenix".to_string()),
        slot: Some(slot),
        date,
        time,
        duration_hours: 2,
    })?;
    info!(amount = pending.amount, "booking priced, starting payment");

    let mut flow = PaymentFlow::for_booking(
        auth.clone(),
        store.clone(),
        clock.clone(),
        config,
        pending.clone(),
    );
    if flow.wallet_available() {
        flow.confirm(PaymentMethod::Wallet)?;
    } else {
        flow.confirm(PaymentMethod::Upi)?;
    }
    flow.submit_pin("1234")?;
    if let Some(request) = flow.upi_request() {
        info!(url = %request.url, "scan to pay, waiting for the gateway");
        flow.await_detection().await?;
    }
    let receipt = flow.process().await?;
    info!(
        transaction = %receipt.transaction.id,
        balance = receipt.new_balance,
        "payment complete"
    );

    let booking = bookings.confirm(&pending)?;
    info!(
        booking = %booking.id,
        entry = %booking.entry_code,
        exit = %booking.exit_code,
        "booking confirmed"
    );

    let dashboard = stats.dashboard()?;
    info!(
        total = dashboard.total_bookings,
        active = dashboard.active_bookings,
        spent = dashboard.total_spent,
        hours = dashboard.hours_parked,
        "dashboard"
    );

    Ok(())
}

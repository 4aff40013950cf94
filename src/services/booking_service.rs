use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::info;

use super::auth_service::AuthService;
use super::clock::Clock;
use super::error::ParkError;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::nearby::{NEARBY_LOCATIONS, NearbyLocation};
use crate::domain::slot::{self, COMPLEXES, Complex, ParkingSlot};
use crate::store::Store;

/// What the user has picked so far. Both a complex and a slot are required
/// before a booking can proceed to payment.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub complex_id: Option<String>,
    pub slot: Option<ParkingSlot>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_hours: u32,
}

/// A priced candidate awaiting payment authorization. Nothing is persisted
/// until the payment flow succeeds and `confirm` is called.
#[derive(Debug, Clone)]
pub struct PendingBooking {
    pub slot: ParkingSlot,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_hours: u32,
    pub amount: i64,
}

pub struct BookingService {
    store: Arc<Store>,
    auth: Arc<AuthService>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(store: Arc<Store>, auth: Arc<AuthService>, clock: Arc<dyn Clock>) -> Self {
        Self { store, auth, clock }
    }

    pub fn complexes(&self) -> &'static [Complex] {
        &COMPLEXES
    }

    pub fn slots_for(
        &self,
        complex_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<ParkingSlot>, ParkError> {
        let complex = Complex::find(complex_id).ok_or(ParkError::MissingSelection)?;
        Ok(slot::generate_slots(complex, date, time))
    }

    pub fn available_slots(
        &self,
        complex_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<ParkingSlot>, ParkError> {
        Ok(self
            .slots_for(complex_id, date, time)?
            .into_iter()
            .filter(|s| s.available)
            .collect())
    }

    /// Validates the selection and prices it. The slot is re-checked against
    /// the catalog for the requested window in case the caller held onto a
    /// stale one.
    pub fn prepare(&self, request: &BookingRequest) -> Result<PendingBooking, ParkError> {
        let complex_id = request
            .complex_id
            .as_deref()
            .ok_or(ParkError::MissingSelection)?;
        let slot = request.slot.clone().ok_or(ParkError::MissingSelection)?;
        if request.duration_hours == 0 {
            return Err(ParkError::InvalidDuration);
        }

        let catalog = self.slots_for(complex_id, request.date, request.time)?;
        match catalog.iter().find(|s| s.id == slot.id) {
            Some(listed) if listed.available => {}
            _ => {
                return Err(ParkError::SlotUnavailable {
                    number: slot.number.clone(),
                });
            }
        }

        Ok(PendingBooking {
            amount: slot.price * request.duration_hours as i64,
            slot,
            date: request.date,
            time: request.time,
            duration_hours: request.duration_hours,
        })
    }

    /// Persists the booking after a successful payment: synthesizes the id
    /// and gate codes and appends to the user's booking history.
    pub fn confirm(&self, pending: &PendingBooking) -> Result<Booking, ParkError> {
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        let now = self.clock.now();
        let id = Booking::synthesize_id(now);
        let booking = Booking {
            entry_code: Booking::entry_code(&id, now),
            exit_code: Booking::exit_code(&id, now),
            id,
            slot_number: pending.slot.number.clone(),
            location: pending.slot.location.clone(),
            complex: pending.slot.complex.clone(),
            date: pending.date,
            time: pending.time,
            duration_hours: pending.duration_hours,
            amount: pending.amount,
            user_name: user.name.clone(),
            status: BookingStatus::Active,
            booked_at: now,
        };
        self.store.bookings.append(&user.id, &booking)?;
        info!(booking_id = %booking.id, slot = %booking.slot_number, amount = booking.amount, "booking confirmed");
        Ok(booking)
    }

    pub fn bookings(&self) -> Result<Vec<Booking>, ParkError> {
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        Ok(self.store.bookings.for_user(&user.id)?)
    }

    /// Bookings whose end time is still in the future.
    pub fn active_bookings(&self) -> Result<Vec<Booking>, ParkError> {
        let now = self.clock.now();
        Ok(self
            .bookings()?
            .into_iter()
            .filter(|b| b.is_active(now))
            .collect())
    }

    /// Adds `hours` to an active booking, charging the stored average hourly
    /// rate for the extension.
    pub fn extend(&self, booking_id: &str, hours: u32) -> Result<Booking, ParkError> {
        if hours == 0 {
            return Err(ParkError::InvalidDuration);
        }
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        let mut bookings = self.store.bookings.for_user(&user.id)?;
        let now = self.clock.now();

        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| ParkError::BookingNotFound {
                id: booking_id.to_string(),
            })?;
        if !booking.is_active(now) {
            return Err(ParkError::BookingExpired {
                id: booking_id.to_string(),
            });
        }

        booking.extend(hours);
        let updated = booking.clone();
        self.store.bookings.save_for_user(&user.id, &bookings)?;
        info!(booking_id, hours, amount = updated.amount, "booking extended");
        Ok(updated)
    }

    pub fn nearby_locations(&self) -> &'static [NearbyLocation] {
        &NEARBY_LOCATIONS
    }
}

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

/// A confirmed parking reservation. Historical record: extended in place,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub slot_number: String,
    pub location: String,
    pub complex: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_hours: u32,
    pub amount: i64,
    pub entry_code: String,
    pub exit_code: String,
    pub user_name: String,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Booking ids carry the last six digits of the creation timestamp.
    pub fn synthesize_id(now: DateTime<Utc>) -> String {
        format!("SP{:06}", now.timestamp_millis().rem_euclid(1_000_000))
    }

    pub fn entry_code(id: &str, now: DateTime<Utc>) -> String {
        format!("ENTRY_{id}_{}", now.timestamp_millis())
    }

    pub fn exit_code(id: &str, now: DateTime<Utc>) -> String {
        format!("EXIT_{id}_{}", now.timestamp_millis())
    }

    /// Booking windows are interpreted in UTC for the demo.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc() + Duration::hours(self.duration_hours as i64)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status != BookingStatus::Completed && self.end_time() > now
    }

    /// Average hourly rate already paid; the basis for extension pricing.
    pub fn hourly_rate(&self) -> f64 {
        self.amount as f64 / self.duration_hours as f64
    }

    /// Extends the reservation, charging the stored average rate per extra
    /// hour rounded to the nearest rupee.
    pub fn extend(&mut self, hours: u32) {
        let extra = (self.hourly_rate() * hours as f64).round() as i64;
        self.duration_hours += hours;
        self.amount += extra;
    }
}

use anyhow::Result;
use std::sync::Arc;

use super::kv::KvStore;
use crate::domain::booking::Booking;

#[derive(Clone)]
pub struct BookingStore {
    kv: Arc<dyn KvStore>,
}

impl BookingStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key_for(user_id: &str) -> String {
        format!("parkpulse_bookings_{user_id}")
    }

    pub fn for_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        match self.kv.get(&Self::key_for(user_id))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_for_user(&self, user_id: &str, bookings: &[Booking]) -> Result<()> {
        self.kv
            .put(&Self::key_for(user_id), &serde_json::to_string(bookings)?)
    }

    pub fn append(&self, user_id: &str, booking: &Booking) -> Result<()> {
        let mut bookings = self.for_user(user_id)?;
        bookings.push(booking.clone());
        self.save_for_user(user_id, &bookings)
    }
}

pub mod booking_store;
pub mod kv;
pub mod transaction_store;
pub mod user_store;

use std::sync::Arc;

use kv::KvStore;

/// Persistence aggregate handed to every service. The backing `KvStore` is
/// injectable: in-memory for tests, file-backed for the demo binary.
#[derive(Clone)]
pub struct Store {
    pub kv: Arc<dyn KvStore>,
    pub users: user_store::UserStore,
    pub bookings: booking_store::BookingStore,
    pub transactions: transaction_store::TransactionStore,
}

impl Store {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            users: user_store::UserStore::new(kv.clone()),
            bookings: booking_store::BookingStore::new(kv.clone()),
            transactions: transaction_store::TransactionStore::new(kv.clone()),
            kv,
        }
    }

    pub fn new_memory() -> Self {
        Self::new(Arc::new(kv::MemoryKv::new()))
    }
}

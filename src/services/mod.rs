pub mod auth_service;
pub mod booking_service;
pub mod clock;
pub mod error;
pub mod payment_flow;
pub mod stats_service;

pub use auth_service::AuthService;
pub use booking_service::{BookingRequest, BookingService, PendingBooking};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ParkError;
pub use payment_flow::{PaymentFlow, PaymentPurpose, PaymentReceipt, PaymentStep, UpiRequest};
pub use stats_service::{Activity, DashboardStats, StatsService, WalletSummary};

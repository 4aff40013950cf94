pub mod payment;

pub use payment::PaymentConfig;

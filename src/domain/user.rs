use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wallet balance every new account starts with, in whole rupees.
pub const STARTING_BALANCE: i64 = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A registered account. The password and PIN are stored in plaintext --
/// this is a demo with no security guarantees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub wallet_balance: i64,
    pub pin: String,
    pub password: String,
}

impl User {
    pub fn new(name: String, email: String, password: String, pin: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            role: Role::User,
            wallet_balance: STARTING_BALANCE,
            pin,
            password,
        }
    }

    /// A PIN is exactly four ASCII digits, no normalization.
    pub fn is_valid_pin(pin: &str) -> bool {
        pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
    }
}

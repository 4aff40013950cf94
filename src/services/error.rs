use thiserror::Error;

/// Every failure in the booking and payment services is a recoverable value;
/// nothing here is fatal to the application.
#[derive(Debug, Error)]
pub enum ParkError {
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,

    #[error("email already registered: {email}")]
    EmailExists { email: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("incorrect PIN")]
    PinMismatch,

    #[error("insufficient wallet balance: need {required}, have {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("no location or slot selected")]
    MissingSelection,

    #[error("slot {number} is not available for this window")]
    SlotUnavailable { number: String },

    #[error("booking not found: {id}")]
    BookingNotFound { id: String },

    #[error("booking {id} has already ended")]
    BookingExpired { id: String },

    #[error("duration must be at least one hour")]
    InvalidDuration,

    #[error("recharge amount must be positive")]
    InvalidAmount,

    #[error("reference number must be at least 10 alphanumeric characters")]
    InvalidReference,

    #[error("payment request expired")]
    UpiExpired,

    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("payment flow is in '{actual}', expected '{expected}'")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ParkError {
    /// Text safe to surface directly in a toast or form message.
    pub fn user_message(&self) -> String {
        match self {
            ParkError::InvalidPin => "PIN must be exactly 4 digits.".to_string(),
            ParkError::EmailExists { .. } => {
                "This email is already registered. Please sign in instead.".to_string()
            }
            ParkError::InvalidCredentials => "Invalid email or password.".to_string(),
            ParkError::PinMismatch => "Incorrect PIN. Please try again.".to_string(),
            ParkError::InsufficientBalance { required, available } => format!(
                "Insufficient wallet balance: this costs ₹{required} but you have ₹{available}."
            ),
            ParkError::MissingSelection => {
                "Please select a location and a parking slot to continue.".to_string()
            }
            ParkError::SlotUnavailable { number } => {
                format!("Slot {number} is no longer available. Please pick another.")
            }
            ParkError::BookingNotFound { .. } => {
                "The requested booking could not be found.".to_string()
            }
            ParkError::BookingExpired { .. } => {
                "This booking has already ended and cannot be extended.".to_string()
            }
            ParkError::InvalidDuration => "Duration must be at least one hour.".to_string(),
            ParkError::InvalidAmount => "Please choose a valid recharge amount.".to_string(),
            ParkError::InvalidReference => {
                "The reference number must be at least 10 characters.".to_string()
            }
            ParkError::UpiExpired => {
                "The payment request expired. Please start the payment again.".to_string()
            }
            ParkError::NotLoggedIn => "Please sign in to continue.".to_string(),
            ParkError::InvalidState { .. } | ParkError::Storage(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_friendly() {
        let err = ParkError::InsufficientBalance {
            required: 120,
            available: 50,
        };
        assert!(err.user_message().contains("₹120"));
        assert!(err.user_message().contains("₹50"));

        let storage = ParkError::Storage(anyhow::anyhow!("disk on fire"));
        assert!(!storage.user_message().contains("disk"));
    }
}

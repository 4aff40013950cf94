use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How long a UPI collect request stays scannable before it auto-cancels.
pub const UPI_TIMEOUT: Duration = Duration::from_secs(120);
/// Simulated gateway callback fires between 8 and 12 seconds after the QR
/// code is shown.
pub const DETECTION_MIN: Duration = Duration::from_secs(8);
pub const DETECTION_JITTER_MS: u64 = 4000;
/// Artificial "verifying payment" delay before anything is committed.
pub const PROCESSING_DELAY: Duration = Duration::from_millis(1500);
/// Minimum length of a UTR reference a user transcribes to verify a payment.
pub const MIN_REFERENCE_LEN: usize = 10;
/// Preset wallet recharge denominations.
pub const RECHARGE_AMOUNTS: [i64; 6] = [100, 250, 500, 1000, 2000, 5000];

/// Admin UPI credentials. Every simulated payment is addressed to this
/// payee; edit the config file after deployment to use a real UPI ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfig {
    /// UPI ID where payments are received (e.g. "name@bank")
    pub upi_id: String,

    /// Display name shown on the payment screen
    pub merchant_name: String,

    /// Transaction note prefix; the transaction id is appended
    pub transaction_note: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            upi_id: "admin@paytm".to_string(),
            merchant_name: "ParkPulse Parking".to_string(),
            transaction_note: "Parking Slot Booking".to_string(),
        }
    }
}

impl PaymentConfig {
    /// Load configuration from file, writing the defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = Self::default();
            default_config.save()?;
            Ok(default_config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment not set"))?;
        Ok(PathBuf::from(home).join(".parkpulse").join("payment.toml"))
    }

    /// Deep-link string a UPI app understands; also the QR code payload.
    /// Format: `upi://pay?pa=<id>&pn=<name>&am=<amount>&cu=INR&tn=<note>`
    pub fn payment_url(&self, amount: i64, transaction_id: &str) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={:.2}&cu=INR&tn={}",
            encode(&self.upi_id),
            encode(&self.merchant_name),
            amount as f64,
            encode(&format!("{} {}", self.transaction_note, transaction_id)),
        )
    }
}

fn encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_url_format() {
        let config = PaymentConfig::default();
        let url = config.payment_url(120, "WR1717232400123");
        assert_eq!(
            url,
            "upi://pay?pa=admin%40paytm&pn=ParkPulse%20Parking&am=120.00&cu=INR\
             &tn=Parking%20Slot%20Booking%20WR1717232400123"
        );
    }

    #[test]
    fn test_amount_has_two_decimal_places() {
        let config = PaymentConfig::default();
        let url = config.payment_url(500, "WR1");
        assert!(url.contains("&am=500.00&cu=INR"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = PaymentConfig {
            upi_id: "merchant@ybl".to_string(),
            merchant_name: "Test Lot".to_string(),
            transaction_note: "Parking".to_string(),
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: PaymentConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}

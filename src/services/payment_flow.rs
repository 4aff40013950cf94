use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::auth_service::AuthService;
use super::booking_service::PendingBooking;
use super::clock::Clock;
use super::error::ParkError;
use crate::config::PaymentConfig;
use crate::config::payment::{
    DETECTION_JITTER_MS, DETECTION_MIN, MIN_REFERENCE_LEN, PROCESSING_DELAY, UPI_TIMEOUT,
};
use crate::domain::transaction::{
    PaymentMethod, Transaction, TransactionKind, TransactionStatus,
};
use crate::store::Store;

/// What the flow is collecting money for.
#[derive(Debug, Clone)]
pub enum PaymentPurpose {
    SlotBooking(PendingBooking),
    WalletRecharge { amount: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStep {
    Summary,
    Pin { attempts: u32 },
    Upi,
    Processing,
    Success,
    Cancelled,
}

impl PaymentStep {
    fn name(self) -> &'static str {
        match self {
            PaymentStep::Summary => "summary",
            PaymentStep::Pin { .. } => "pin",
            PaymentStep::Upi => "upi",
            PaymentStep::Processing => "processing",
            PaymentStep::Success => "success",
            PaymentStep::Cancelled => "cancelled",
        }
    }
}

/// Simulated UPI collect request; the URL doubles as the QR code payload.
#[derive(Debug, Clone)]
pub struct UpiRequest {
    pub transaction_id: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a committed payment.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub transaction: Transaction,
    pub new_balance: i64,
}

/// Short-lived payment state machine:
/// summary -> pin -> (upi) -> processing -> success, with cancellation
/// allowed from every non-terminal step. Wallet payments skip the UPI step.
/// All side effects happen in `process`, after the artificial delay, so a
/// cancelled flow leaves nothing behind.
pub struct PaymentFlow {
    auth: Arc<AuthService>,
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
    config: PaymentConfig,
    purpose: PaymentPurpose,
    amount: i64,
    method: PaymentMethod,
    require_reference: bool,
    step: PaymentStep,
    upi: Option<UpiRequest>,
}

impl std::fmt::Debug for PaymentFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentFlow").finish_non_exhaustive()
    }
}

impl PaymentFlow {
    pub fn for_booking(
        auth: Arc<AuthService>,
        store: Arc<Store>,
        clock: Arc<dyn Clock>,
        config: PaymentConfig,
        pending: PendingBooking,
    ) -> Self {
        let amount = pending.amount;
        Self {
            auth,
            store,
            clock,
            config,
            purpose: PaymentPurpose::SlotBooking(pending),
            amount,
            method: PaymentMethod::Upi,
            require_reference: false,
            step: PaymentStep::Summary,
            upi: None,
        }
    }

    /// Recharges are always paid over UPI and require a transcribed UTR
    /// reference before the wallet is credited.
    pub fn for_recharge(
        auth: Arc<AuthService>,
        store: Arc<Store>,
        clock: Arc<dyn Clock>,
        config: PaymentConfig,
        amount: i64,
    ) -> Result<Self, ParkError> {
        if amount <= 0 {
            return Err(ParkError::InvalidAmount);
        }
        Ok(Self {
            auth,
            store,
            clock,
            config,
            purpose: PaymentPurpose::WalletRecharge { amount },
            amount,
            method: PaymentMethod::Upi,
            require_reference: true,
            step: PaymentStep::Summary,
            upi: None,
        })
    }

    pub fn step(&self) -> PaymentStep {
        self.step
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn upi_request(&self) -> Option<&UpiRequest> {
        self.upi.as_ref()
    }

    /// Whether the wallet option can be offered at the summary step.
    pub fn wallet_available(&self) -> bool {
        self.auth
            .current_user()
            .is_some_and(|u| u.wallet_balance >= self.amount)
    }

    /// Summary -> Pin. Choosing the wallet without the funds to cover the
    /// amount is rejected up front; the UPI path stays selectable.
    pub fn confirm(&mut self, method: PaymentMethod) -> Result<(), ParkError> {
        if self.step != PaymentStep::Summary {
            return Err(self.invalid_state("summary"));
        }
        let method = if matches!(self.purpose, PaymentPurpose::WalletRecharge { .. }) {
            PaymentMethod::Upi
        } else {
            method
        };
        if method == PaymentMethod::Wallet {
            let available = self
                .auth
                .current_user()
                .ok_or(ParkError::NotLoggedIn)?
                .wallet_balance;
            if available < self.amount {
                return Err(ParkError::InsufficientBalance {
                    required: self.amount,
                    available,
                });
            }
        }
        self.method = method;
        self.step = PaymentStep::Pin { attempts: 0 };
        debug!(amount = self.amount, method = ?self.method, "payment confirmed, awaiting PIN");
        Ok(())
    }

    /// A mismatch keeps the flow in the PIN step; retry limits are the PIN
    /// entry surface's concern, not ours.
    pub fn submit_pin(&mut self, candidate: &str) -> Result<(), ParkError> {
        let attempts = match self.step {
            PaymentStep::Pin { attempts } => attempts,
            _ => return Err(self.invalid_state("pin")),
        };
        if !self.auth.verify_pin(candidate) {
            self.step = PaymentStep::Pin {
                attempts: attempts + 1,
            };
            warn!(attempts = attempts + 1, "PIN mismatch");
            return Err(ParkError::PinMismatch);
        }

        match self.method {
            PaymentMethod::Wallet => {
                self.step = PaymentStep::Processing;
            }
            PaymentMethod::Upi => {
                let now = self.clock.now();
                let transaction_id = format!("WR{}", now.timestamp_millis());
                let url = self.config.payment_url(self.amount, &transaction_id);
                self.upi = Some(UpiRequest {
                    transaction_id,
                    url,
                    expires_at: now + ChronoDuration::seconds(UPI_TIMEOUT.as_secs() as i64),
                });
                self.step = PaymentStep::Upi;
            }
        }
        Ok(())
    }

    pub fn upi_expired(&self) -> bool {
        self.upi
            .as_ref()
            .is_some_and(|u| self.clock.now() >= u.expires_at)
    }

    /// Simulated gateway callback: a real integration would be told by the
    /// payment provider; here detection fires 8-12 seconds after the QR code
    /// is shown.
    pub async fn await_detection(&mut self) -> Result<(), ParkError> {
        if self.step != PaymentStep::Upi {
            return Err(self.invalid_state("upi"));
        }
        if self.require_reference {
            return Err(self.invalid_state("reference entry"));
        }
        let jitter = rand::thread_rng().gen_range(0..=DETECTION_JITTER_MS);
        self.clock
            .sleep(DETECTION_MIN + Duration::from_millis(jitter))
            .await;
        if self.upi_expired() {
            self.step = PaymentStep::Cancelled;
            return Err(ParkError::UpiExpired);
        }
        self.step = PaymentStep::Processing;
        Ok(())
    }

    /// Manual alternative to auto-detection: the user transcribes the UTR
    /// from their payment app. Format check only; there is nothing real to
    /// verify against.
    pub fn verify_reference(&mut self, reference: &str) -> Result<(), ParkError> {
        if self.step != PaymentStep::Upi {
            return Err(self.invalid_state("upi"));
        }
        if self.upi_expired() {
            self.step = PaymentStep::Cancelled;
            return Err(ParkError::UpiExpired);
        }
        let pattern = Regex::new(&format!("^[A-Za-z0-9]{{{MIN_REFERENCE_LEN},}}$")).unwrap();
        if !pattern.is_match(reference.trim()) {
            return Err(ParkError::InvalidReference);
        }
        debug!(reference, "UPI reference accepted");
        self.step = PaymentStep::Processing;
        Ok(())
    }

    /// Runs the artificial verification delay, then commits: balance
    /// mutation and the ledger entry happen only after the delay completes,
    /// so a flow cancelled mid-processing records nothing.
    pub async fn process(&mut self) -> Result<PaymentReceipt, ParkError> {
        if self.step != PaymentStep::Processing {
            return Err(self.invalid_state("processing"));
        }
        self.clock.sleep(PROCESSING_DELAY).await;

        let purpose = self.purpose.clone();
        let receipt = match purpose {
            PaymentPurpose::SlotBooking(pending) => self.commit_booking_payment(&pending)?,
            PaymentPurpose::WalletRecharge { amount } => self.commit_recharge(amount)?,
        };
        self.step = PaymentStep::Success;
        info!(
            amount = self.amount,
            method = ?self.method,
            balance = receipt.new_balance,
            "payment committed"
        );
        Ok(receipt)
    }

    fn commit_booking_payment(
        &mut self,
        pending: &PendingBooking,
    ) -> Result<PaymentReceipt, ParkError> {
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        let new_balance = match self.method {
            PaymentMethod::Wallet => {
                // Balance may have changed since the summary step
                if user.wallet_balance < self.amount {
                    return Err(ParkError::InsufficientBalance {
                        required: self.amount,
                        available: user.wallet_balance,
                    });
                }
                self.auth.update_wallet_balance(-self.amount)?
            }
            PaymentMethod::Upi => user.wallet_balance,
        };

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Payment,
            amount: -self.amount,
            date: pending.date,
            time: pending.time,
            status: TransactionStatus::Completed,
            description: format!(
                "Parking Slot {} - {}",
                pending.slot.number, pending.slot.location
            ),
            slot_number: Some(pending.slot.number.clone()),
            location: Some(pending.slot.location.clone()),
            complex: Some(pending.slot.complex.clone()),
            duration_hours: Some(pending.duration_hours),
            method: self.method,
        };
        self.store.transactions.append(&user.id, &transaction)?;
        Ok(PaymentReceipt {
            transaction,
            new_balance,
        })
    }

    fn commit_recharge(&mut self, amount: i64) -> Result<PaymentReceipt, ParkError> {
        let new_balance = self.auth.update_wallet_balance(amount)?;
        let user = self.auth.current_user().ok_or(ParkError::NotLoggedIn)?;
        let transaction = Transaction::recharge(amount, self.clock.now());
        self.store.transactions.append(&user.id, &transaction)?;
        Ok(PaymentReceipt {
            transaction,
            new_balance,
        })
    }

    /// Aborts the flow. Discards in-memory state only; anything already
    /// committed by `process` stays committed.
    pub fn cancel(&mut self) -> Result<(), ParkError> {
        if self.step == PaymentStep::Success {
            return Err(self.invalid_state("a non-terminal step"));
        }
        self.step = PaymentStep::Cancelled;
        self.upi = None;
        info!("payment flow cancelled");
        Ok(())
    }

    fn invalid_state(&self, expected: &'static str) -> ParkError {
        ParkError::InvalidState {
            expected,
            actual: self.step.name(),
        }
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Payment,
    Recharge,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Wallet,
    Upi,
}

/// One ledger entry. Payments carry a negative amount, recharges a positive
/// one. Append-only, owned by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: TransactionStatus,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<u32>,
    pub method: PaymentMethod,
}

impl Transaction {
    pub fn recharge(amount: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Recharge,
            amount,
            date: now.date_naive(),
            time: now.time(),
            status: TransactionStatus::Completed,
            description: "Wallet Recharge via UPI".to_string(),
            slot_number: None,
            location: None,
            complex: None,
            duration_hours: None,
            method: PaymentMethod::Upi,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }
}

use anyhow::Result;
use std::sync::Arc;

use super::kv::KvStore;
use crate::domain::transaction::Transaction;

/// Append-only per-user transaction ledger.
#[derive(Clone)]
pub struct TransactionStore {
    kv: Arc<dyn KvStore>,
}

impl TransactionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key_for(user_id: &str) -> String {
        format!("parkpulse_transactions_{user_id}")
    }

    pub fn for_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        match self.kv.get(&Self::key_for(user_id))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn append(&self, user_id: &str, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.for_user(user_id)?;
        transactions.push(transaction.clone());
        self.kv.put(
            &Self::key_for(user_id),
            &serde_json::to_string(&transactions)?,
        )
    }
}

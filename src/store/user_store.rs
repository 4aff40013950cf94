use anyhow::Result;
use std::sync::Arc;

use super::kv::KvStore;
use crate::domain::user::User;

/// All registered accounts, global key.
pub const USERS_KEY: &str = "parkpulse_users";
/// The current session record, global key.
pub const SESSION_KEY: &str = "parkpulse_user";

#[derive(Clone)]
pub struct UserStore {
    kv: Arc<dyn KvStore>,
}

impl UserStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn registered(&self) -> Result<Vec<User>> {
        match self.kv.get(USERS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_registered(&self, users: &[User]) -> Result<()> {
        self.kv.put(USERS_KEY, &serde_json::to_string(users)?)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.registered()?.into_iter().find(|u| u.email == email))
    }

    pub fn append(&self, user: &User) -> Result<()> {
        let mut users = self.registered()?;
        users.push(user.clone());
        self.save_registered(&users)
    }

    /// Writes the user back into the collection keyed by id, appending if the
    /// id is not present yet.
    pub fn upsert(&self, user: &User) -> Result<()> {
        let mut users = self.registered()?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.save_registered(&users)
    }

    pub fn session(&self) -> Result<Option<User>> {
        match self.kv.get(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_session(&self, user: &User) -> Result<()> {
        self.kv.put(SESSION_KEY, &serde_json::to_string(user)?)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.kv.remove(SESSION_KEY)
    }
}

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ParkError;
use crate::domain::user::{Role, User};
use crate::store::Store;

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
    role: Role,
    balance: i64,
}

/// Fixed accounts checked before "not found" so the demo works without
/// registration. Materialized into the users collection on first login.
const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "user@test.com",
        password: "password123",
        id: "demo-user",
        name: "Demo User",
        role: Role::User,
        balance: 500,
    },
    DemoAccount {
        email: "admin@parkease.com",
        password: "admin123",
        id: "demo-admin",
        name: "Admin User",
        role: Role::Admin,
        balance: 1000,
    },
];

impl DemoAccount {
    fn materialize(&self) -> User {
        User {
            id: self.id.to_string(),
            name: self.name.to_string(),
            email: self.email.to_string(),
            role: self.role,
            wallet_balance: self.balance,
            pin: "1234".to_string(),
            password: self.password.to_string(),
        }
    }
}

/// Single source of truth for the logged-in user and their wallet. Wallet
/// balance must never be mutated anywhere but `update_wallet_balance`.
pub struct AuthService {
    store: Arc<Store>,
    current: RwLock<Option<User>>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Restores any persisted session on construction.
    pub fn new(store: Arc<Store>) -> Result<Self, ParkError> {
        let current = store.users.session()?;
        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        pin: &str,
    ) -> Result<User, ParkError> {
        if !User::is_valid_pin(pin) {
            warn!(email, "registration rejected: malformed PIN");
            return Err(ParkError::InvalidPin);
        }
        if self.store.users.find_by_email(email)?.is_some() {
            warn!(email, "registration rejected: email exists");
            return Err(ParkError::EmailExists {
                email: email.to_string(),
            });
        }

        let user = User::new(
            name.to_string(),
            email.to_string(),
            password.to_string(),
            pin.to_string(),
        );
        self.store.users.append(&user)?;
        self.store.users.set_session(&user)?;
        *self.current.write() = Some(user.clone());
        info!(user_id = %user.id, email, "registered new account");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, ParkError> {
        if let Some(stored) = self.store.users.find_by_email(email)? {
            if stored.password != password {
                warn!(email, "login rejected: password mismatch");
                return Err(ParkError::InvalidCredentials);
            }
            self.store.users.set_session(&stored)?;
            *self.current.write() = Some(stored.clone());
            info!(user_id = %stored.id, email, "logged in");
            return Ok(stored);
        }

        if let Some(demo) = DEMO_ACCOUNTS
            .iter()
            .find(|d| d.email == email && d.password == password)
        {
            let user = demo.materialize();
            self.store.users.append(&user)?;
            self.store.users.set_session(&user)?;
            *self.current.write() = Some(user.clone());
            info!(user_id = %user.id, email, "demo account materialized");
            return Ok(user);
        }

        warn!(email, "login rejected: unknown email");
        Err(ParkError::InvalidCredentials)
    }

    /// Clears the session only; the registered-users collection is untouched.
    pub fn logout(&self) -> Result<(), ParkError> {
        self.store.users.clear_session()?;
        *self.current.write() = None;
        info!("logged out");
        Ok(())
    }

    /// Adds `delta` (either sign) to the balance and writes the user back to
    /// both the session record and the users collection. No lower bound is
    /// enforced here; callers check sufficiency before spending.
    pub fn update_wallet_balance(&self, delta: i64) -> Result<i64, ParkError> {
        let mut guard = self.current.write();
        let user = guard.as_mut().ok_or(ParkError::NotLoggedIn)?;
        user.wallet_balance += delta;
        self.store.users.set_session(user)?;
        self.store.users.upsert(user)?;
        info!(user_id = %user.id, delta, balance = user.wallet_balance, "wallet balance updated");
        Ok(user.wallet_balance)
    }

    /// Exact string comparison against the stored PIN; no side effects.
    pub fn verify_pin(&self, candidate: &str) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|u| u.pin == candidate)
    }
}

//! User records, credentials and the current session.
//!
//! All state goes through the injected [`Storage`] handle under the `users`,
//! `passwords` and `currentUser` keys. Until `users`/`passwords` are first
//! written the store exposes the demo accounts (unless seeding is disabled),
//! and the first registration persists them alongside the new account.

use crate::auth::{hash_password, verify_password, RegisterRequest};
use crate::error::AppError;
use crate::models::user::{demo_users, DEMO_PASSWORD};
use crate::models::User;
use crate::storage::{
    read_json, write_json, Storage, CURRENT_USER_KEY, PASSWORDS_KEY, USERS_KEY,
};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use validator::Validate;

#[derive(Clone)]
pub struct IdentityStore {
    storage: Arc<dyn Storage>,
    bcrypt_cost: u32,
    seed_demo_users: bool,
    write_lock: Arc<Mutex<()>>,
}

impl IdentityStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_demo_users: true,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_demo_users(mut self, enabled: bool) -> Self {
        self.seed_demo_users = enabled;
        self
    }

    fn users(&self) -> Result<Vec<User>, AppError> {
        match read_json(self.storage.as_ref(), USERS_KEY)? {
            Some(users) => Ok(users),
            None if self.seed_demo_users => Ok(demo_users()),
            None => Ok(Vec::new()),
        }
    }

    fn passwords(&self) -> Result<BTreeMap<String, String>, AppError> {
        match read_json(self.storage.as_ref(), PASSWORDS_KEY)? {
            Some(passwords) => Ok(passwords),
            None if self.seed_demo_users => Ok(demo_users()
                .into_iter()
                .map(|user| (user.username, DEMO_PASSWORD.to_string()))
                .collect()),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Every known user, e.g. to populate an assignee picker.
    pub fn all_users(&self) -> Result<Vec<User>, AppError> {
        self.users()
    }

    pub fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users()?.into_iter().find(|user| user.id == id))
    }

    /// Returns the user when `password` matches the stored credential.
    ///
    /// There is no lockout or rate limiting.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let user = match self.users()?.into_iter().find(|u| u.username == username) {
            Some(user) => user,
            None => {
                warn!("login rejected: unknown username '{}'", username);
                return Ok(None);
            }
        };
        let passwords = self.passwords()?;
        match passwords.get(username) {
            Some(stored) if verify_password(password, stored)? => {
                info!("user '{}' authenticated", username);
                Ok(Some(user))
            }
            _ => {
                warn!("login rejected: bad password for '{}'", username);
                Ok(None)
            }
        }
    }

    /// Creates a user and its credential.
    ///
    /// Fails with `DuplicateUsername` or `DuplicateEmail` (checked in that order)
    /// without touching existing records. Both checks run before field
    /// validation, so a taken username is reported even when other fields are bad.
    pub fn register_user(&self, request: &RegisterRequest) -> Result<User, AppError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Storage("identity lock poisoned".into()))?;

        let mut users = self.users()?;
        if users.iter().any(|u| u.username == request.username) {
            return Err(AppError::DuplicateUsername("Username already exists".into()));
        }
        if users.iter().any(|u| u.email == request.email) {
            return Err(AppError::DuplicateEmail("Email already exists".into()));
        }
        request.validate()?;

        let user = User::new(
            next_user_id(&users),
            request.username.clone(),
            request.email.clone(),
            request.name.clone(),
        );
        let mut passwords = self.passwords()?;
        passwords.insert(
            user.username.clone(),
            hash_password(&request.password, self.bcrypt_cost)?,
        );

        users.push(user.clone());
        write_json(self.storage.as_ref(), USERS_KEY, &users)?;
        write_json(self.storage.as_ref(), PASSWORDS_KEY, &passwords)?;

        info!("registered user '{}' with id {}", user.username, user.id);
        Ok(user)
    }

    pub fn current_user(&self) -> Result<Option<User>, AppError> {
        read_json(self.storage.as_ref(), CURRENT_USER_KEY)
    }

    pub fn set_current_user(&self, user: &User) -> Result<(), AppError> {
        debug!("session opened for '{}'", user.username);
        write_json(self.storage.as_ref(), CURRENT_USER_KEY, user)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        debug!("session cleared");
        self.storage.remove(CURRENT_USER_KEY)
    }

    pub fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.current_user()?.is_some())
    }
}

/// Millisecond timestamp, bumped past any id already taken.
fn next_user_id(users: &[User]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while users.iter().any(|u| u.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

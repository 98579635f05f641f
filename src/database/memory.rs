//! In-memory stand-in for the Mongo-backed store, used by tests. Mirrors the
//! conditional update semantics of `MongoUserStore` so the reset flow can be
//! exercised without a running database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::users::UserStore;
use crate::errors::Result;
use crate::models::user::User;

pub struct MemoryUserStore {
    users: Mutex<HashMap<ObjectId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        MemoryUserStore {
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, mut user: User) -> ObjectId {
        let id = user.id.unwrap_or_else(ObjectId::new);
        user.id = Some(id);
        self.users.lock().unwrap().insert(id, user);
        id
    }

    pub fn get(&self, id: &ObjectId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

fn without_reset_state(user: &User) -> User {
    let mut user = user.clone();
    user.password_reset_code = None;
    user.password_reset_expiry = None;
    user.password_reset_attempts = None;
    user
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_by_github(&self, github: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|user| user.github == github)
            .map(without_reset_state))
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|user| user.user_name == user_name)
            .map(without_reset_state))
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.insert(user.clone());
        Ok(())
    }

    async fn find_with_reset_state(
        &self,
        github: &str,
        user_name: &str,
    ) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|user| user.github == github && user.user_name == user_name)
            .cloned())
    }

    async fn store_reset_challenge(
        &self,
        user_id: &ObjectId,
        code_hash: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(user_id) {
            user.password_reset_code = Some(code_hash.to_string());
            user.password_reset_expiry =
                Some(BsonDateTime::from_millis(expires_at.timestamp_millis()));
            user.password_reset_attempts = Some(0);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn record_failed_reset_attempt(
        &self,
        user_id: &ObjectId,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(user_id) else {
            return Ok(None);
        };
        if user.password_reset_code.is_none() {
            return Ok(None);
        }

        let attempts = user.password_reset_attempts.unwrap_or(0) + 1;
        user.password_reset_attempts = Some(attempts);
        user.updated_at = now;
        Ok(Some(attempts))
    }

    async fn purge_reset_challenge(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(user_id) {
            user.password_reset_code = None;
            user.password_reset_expiry = None;
            user.password_reset_attempts = None;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn replace_password_and_purge(
        &self,
        user_id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(user_id) else {
            return Ok(false);
        };
        if user.password_reset_code.is_none() {
            return Ok(false);
        }

        user.password = password_hash.to_string();
        user.password_reset_code = None;
        user.password_reset_expiry = None;
        user.password_reset_attempts = None;
        user.updated_at = now;
        Ok(true)
    }
}

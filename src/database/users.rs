use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use crate::errors::Result;
use crate::models::user::User;

const USERS_COLLECTION: &str = "users";

/// Projection for reads that must not see reset material.
fn profile_projection() -> Document {
    doc! {
        "passwordResetCode": 0,
        "passwordResetExpiry": 0,
        "passwordResetAttempts": 0,
    }
}

/// Persistence seam for the `users` collection.
///
/// Every mutation of the reset challenge is a single conditional update
/// against the record, so concurrent requests against the same account
/// cannot both observe the pre-update state and both win.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    /// Lookup by handle, reset fields excluded.
    async fn find_by_github(&self, github: &str) -> Result<Option<User>>;

    /// Lookup by display name, reset fields excluded.
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>>;

    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Dual-identifier lookup with the reset fields included.
    async fn find_with_reset_state(&self, github: &str, user_name: &str)
        -> Result<Option<User>>;

    /// Overwrite the account's reset challenge outright: new code hash, new
    /// expiry, attempts back to zero. Any prior challenge is discarded.
    /// `now` stamps `updatedAt`, so record timestamps agree with the clock
    /// the caller used for the expiry math.
    async fn store_reset_challenge(
        &self,
        user_id: &ObjectId,
        code_hash: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Atomically increment the attempt counter, conditional on a challenge
    /// still existing. Returns the post-increment count, or `None` when the
    /// challenge was purged in the meantime.
    async fn record_failed_reset_attempt(
        &self,
        user_id: &ObjectId,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>>;

    /// Remove all three reset fields.
    async fn purge_reset_challenge(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<()>;

    /// Replace the credential hash and clear the reset challenge in one
    /// update, conditional on the challenge still existing. Returns whether
    /// the condition matched; a lost race or replayed request returns false.
    async fn replace_password_and_purge(
        &self,
        user_id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool>;
}

pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        MongoUserStore { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_by_github(&self, github: &str) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(doc! { "github": github })
            .projection(profile_projection())
            .await?;
        Ok(user)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(doc! { "userName": user_name })
            .projection(profile_projection())
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_with_reset_state(
        &self,
        github: &str,
        user_name: &str,
    ) -> Result<Option<User>> {
        let user = self
            .users()
            .find_one(doc! { "github": github, "userName": user_name })
            .await?;
        Ok(user)
    }

    async fn store_reset_challenge(
        &self,
        user_id: &ObjectId,
        code_hash: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let update = doc! {
            "$set": {
                "passwordResetCode": code_hash,
                "passwordResetExpiry": BsonDateTime::from_millis(expires_at.timestamp_millis()),
                "passwordResetAttempts": 0,
                "updatedAt": BsonDateTime::from_millis(now.timestamp_millis()),
            }
        };

        self.users().update_one(doc! { "_id": *user_id }, update).await?;
        Ok(())
    }

    async fn record_failed_reset_attempt(
        &self,
        user_id: &ObjectId,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>> {
        let filter = doc! {
            "_id": *user_id,
            "passwordResetCode": { "$exists": true },
        };
        let update = doc! {
            "$inc": { "passwordResetAttempts": 1 },
            "$set": { "updatedAt": BsonDateTime::from_millis(now.timestamp_millis()) },
        };

        let updated = self
            .users()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated.and_then(|user| user.password_reset_attempts))
    }

    async fn purge_reset_challenge(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<()> {
        let update = doc! {
            "$unset": {
                "passwordResetCode": "",
                "passwordResetExpiry": "",
                "passwordResetAttempts": "",
            },
            "$set": { "updatedAt": BsonDateTime::from_millis(now.timestamp_millis()) },
        };

        self.users().update_one(doc! { "_id": *user_id }, update).await?;
        Ok(())
    }

    async fn replace_password_and_purge(
        &self,
        user_id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let filter = doc! {
            "_id": *user_id,
            "passwordResetCode": { "$exists": true },
        };
        let update = doc! {
            "$set": {
                "password": password_hash,
                "updatedAt": BsonDateTime::from_millis(now.timestamp_millis()),
            },
            "$unset": {
                "passwordResetCode": "",
                "passwordResetExpiry": "",
                "passwordResetAttempts": "",
            },
        };

        let result = self.users().update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }
}

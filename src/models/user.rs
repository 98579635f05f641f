use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, serde_helpers::chrono_datetime_as_bson_datetime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "userName")]
    pub user_name: String,

    pub github: String,

    /// bcrypt hash of the live credential.
    pub password: String,

    #[serde(default)]
    pub image: String,

    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt", with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    // Active reset challenge, present only between a forgot-password request
    // and its completion/expiry/lock-out. Default read projections exclude
    // these three fields; only the reset paths ask for them.
    #[serde(
        rename = "passwordResetCode",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub password_reset_code: Option<String>,

    #[serde(
        rename = "passwordResetExpiry",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub password_reset_expiry: Option<bson::DateTime>,

    #[serde(
        rename = "passwordResetAttempts",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub password_reset_attempts: Option<i32>,
}

impl User {
    pub fn new(user_name: String, github: String, password_hash: String) -> Self {
        let now = Utc::now();
        User {
            id: Some(ObjectId::new()),
            user_name,
            github,
            password: password_hash,
            image: String::new(),
            created_at: now,
            updated_at: now,
            password_reset_code: None,
            password_reset_expiry: None,
            password_reset_attempts: None,
        }
    }
}

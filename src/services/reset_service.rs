use std::sync::Arc;

use chrono::Duration;
use rand::Rng;

use crate::database::users::UserStore;
use crate::errors::{AppError, Result};
use crate::services::clock::Clock;
use crate::services::validation::{
    password_too_short, required_trimmed, reset_attempts_exhausted, reset_code_expired,
    MAX_RESET_ATTEMPTS, RESET_CODE_TTL_MINUTES,
};

/// bcrypt cost for the stored reset-code hash, same as registration.
pub const RESET_CODE_COST: u32 = 10;

/// bcrypt cost for the replacement credential, stronger than registration.
pub const NEW_PASSWORD_COST: u32 = 12;

/// Source of one-time reset codes.
pub trait CodeGenerator: Send + Sync {
    /// A uniformly random 6-digit decimal code, 100000-999999 inclusive.
    fn generate(&self) -> String;
}

pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000..=999_999).to_string()
    }
}

/// The credential-recovery core: issues one-time codes and redeems them for
/// a replacement credential. The two operations share no state beyond the
/// reset fields persisted on the user record.
#[derive(Clone)]
pub struct ResetService {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
}

impl ResetService {
    pub fn new(
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn CodeGenerator>,
    ) -> Self {
        ResetService { store, clock, codes }
    }

    /// Mint a fresh challenge for the account matching both identifiers.
    ///
    /// Returns the plaintext code when an account matched; the caller owns
    /// handing it to a delivery channel and must answer with the same
    /// acknowledgment whether or not this is `Some` - an unknown identifier
    /// pair is not an error.
    pub async fn initiate(&self, github: &str, user_name: &str) -> Result<Option<String>> {
        let github = required_trimmed(github).ok_or_else(missing_identifiers)?;
        let user_name = required_trimmed(user_name).ok_or_else(missing_identifiers)?;

        let Some(user) = self.store.find_with_reset_state(github, user_name).await? else {
            return Ok(None);
        };
        let Some(user_id) = user.id else {
            return Ok(None);
        };

        let code = self.codes.generate();
        let code_hash = bcrypt::hash(&code, RESET_CODE_COST)?;
        let now = self.clock.now();
        let expires_at = now + Duration::minutes(RESET_CODE_TTL_MINUTES);

        // Overwrites any prior challenge outright, attempts included.
        self.store
            .store_reset_challenge(&user_id, &code_hash, expires_at, now)
            .await?;

        Ok(Some(code))
    }

    /// Redeem a challenge: verify the code and atomically replace the
    /// stored credential. Expired or attempt-exhausted challenges are purged
    /// here, on access - there is no background sweeper.
    pub async fn finalize(
        &self,
        github: &str,
        user_name: &str,
        reset_code: &str,
        new_password: &str,
    ) -> Result<()> {
        let github = required_trimmed(github).ok_or_else(missing_fields)?;
        let user_name = required_trimmed(user_name).ok_or_else(missing_fields)?;
        let reset_code = required_trimmed(reset_code).ok_or_else(missing_fields)?;
        if new_password.trim().is_empty() {
            return Err(missing_fields());
        }
        if password_too_short(new_password) {
            return Err(AppError::WeakPassword);
        }

        // "No such account" and "no active challenge" collapse into one
        // answer so this path leaks nothing about account existence.
        let Some(user) = self.store.find_with_reset_state(github, user_name).await? else {
            return Err(AppError::InvalidResetRequest);
        };
        let Some(user_id) = user.id else {
            return Err(AppError::InvalidResetRequest);
        };
        let (Some(code_hash), Some(expires_at)) =
            (user.password_reset_code.as_deref(), user.password_reset_expiry)
        else {
            return Err(AppError::InvalidResetRequest);
        };

        let now = self.clock.now();
        if reset_code_expired(now, expires_at.to_chrono()) {
            self.store.purge_reset_challenge(&user_id, now).await?;
            return Err(AppError::ResetCodeExpired);
        }

        let attempts = user.password_reset_attempts.unwrap_or(0);
        if reset_attempts_exhausted(attempts) {
            self.store.purge_reset_challenge(&user_id, now).await?;
            return Err(AppError::TooManyResetAttempts);
        }

        if !bcrypt::verify(reset_code, code_hash)? {
            // Conditional increment: the store requires the challenge to
            // still exist, so racing submissions cannot both write the same
            // counter value.
            let attempts_after = match self
                .store
                .record_failed_reset_attempt(&user_id, now)
                .await?
            {
                Some(value) => value,
                None => return Err(AppError::InvalidResetRequest),
            };
            let remaining = (MAX_RESET_ATTEMPTS - attempts_after).max(0);
            return Err(AppError::InvalidResetCode { remaining });
        }

        let password_hash = bcrypt::hash(new_password, NEW_PASSWORD_COST)?;
        if !self
            .store
            .replace_password_and_purge(&user_id, &password_hash, now)
            .await?
        {
            // The challenge vanished between the verify and the update -
            // a lost race or a replayed request, same answer either way.
            return Err(AppError::InvalidResetRequest);
        }

        Ok(())
    }
}

fn missing_identifiers() -> AppError {
    AppError::ValidationError("Both GitHub username and display name are required".to_string())
}

fn missing_fields() -> AppError {
    AppError::ValidationError("All fields are required".to_string())
}

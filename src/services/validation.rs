//! Pure policy helpers shared by the reset initiator and finalizer. The
//! expiry window, attempt ceiling and credential length policy live here and
//! nowhere else.

use chrono::{DateTime, Utc};

/// A challenge is purged once this many wrong codes have been submitted.
pub const MAX_RESET_ATTEMPTS: i32 = 5;

/// A reset code is usable for this long after issue.
pub const RESET_CODE_TTL_MINUTES: i64 = 15;

/// Minimum length for any credential, at registration and at reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trims the value, treating whitespace-only input as absent.
pub fn required_trimmed(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// A challenge is dead strictly after its expiry instant.
pub fn reset_code_expired(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> bool {
    now > expires_at
}

pub fn reset_attempts_exhausted(attempts: i32) -> bool {
    attempts >= MAX_RESET_ATTEMPTS
}

pub fn password_too_short(password: &str) -> bool {
    password.chars().count() < MIN_PASSWORD_LENGTH
}

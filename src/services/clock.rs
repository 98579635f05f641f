use chrono::{DateTime, Utc};

/// Overridable wall-clock, so the expiry rules can be tested without
/// sleeping through a fifteen minute window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

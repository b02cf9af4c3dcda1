use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Rank given to freshly registered accounts.
pub const DEFAULT_RANK: &str = "normal";

/// Snapshot of a user's economy state.
///
/// Accounts are keyed by a stable identifier supplied by the bot transport
/// (a phone number, a platform user id, ...). They are created on first
/// interaction and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Not clamped at zero by the store; callers check before spending.
    pub currency: i64,
    pub level: i64,
    pub experience: i64,
    /// Raw rank identifier. Unknown values are tolerated and resolved by
    /// the permission resolver.
    pub rank: String,
    pub created_at: DateTime<Utc>,
    pub last_work: Option<DateTime<Utc>>,
    pub last_crime: Option<DateTime<Utc>>,
}

impl Account {
    /// Account with registration defaults.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            currency: 0,
            level: 1,
            experience: 0,
            rank: DEFAULT_RANK.to_string(),
            created_at,
            last_work: None,
            last_crime: None,
        }
    }

    /// Time left before an action stamped at `last` may run again.
    ///
    /// Returns `None` when the action is available. The cooldown length is
    /// the caller's policy.
    pub fn cooldown_remaining(
        last: Option<DateTime<Utc>>,
        cooldown: Duration,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        let ready_at = last? + cooldown;
        if now < ready_at {
            Some(ready_at - now)
        } else {
            None
        }
    }

    pub fn work_cooldown_remaining(&self, cooldown: Duration, now: DateTime<Utc>) -> Option<Duration> {
        Self::cooldown_remaining(self.last_work, cooldown, now)
    }

    pub fn crime_cooldown_remaining(
        &self,
        cooldown: Duration,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        Self::cooldown_remaining(self.last_crime, cooldown, now)
    }
}

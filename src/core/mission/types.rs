// src/core/mission/types.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed challenge: photograph the target within the expiry window
/// that starts at `start_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
}

impl Mission {
    pub fn new(user_id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            start_time,
        }
    }

    /// Whole minutes since start, truncated toward zero.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_minutes()
    }

    pub fn expires_at(&self, window: Duration) -> DateTime<Utc> {
        self.start_time + window
    }

    pub fn is_expired(&self, now: DateTime<Utc>, expiry_minutes: i64) -> bool {
        self.elapsed_minutes(now) > expiry_minutes
    }
}

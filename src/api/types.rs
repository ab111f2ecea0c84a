// src/api/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::mission::Mission,
    utils::error::{AppError, Result},
};

/// `user_id` / `mission_id` as sent in the query string, a urlencoded form
/// or multipart text fields.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RequestParams {
    pub user_id: Option<String>,
    pub mission_id: Option<String>,
}

impl RequestParams {
    /// Body values win; the query string fills in whatever the body left out.
    pub fn or(self, fallback: RequestParams) -> Self {
        Self {
            user_id: self.user_id.or(fallback.user_id),
            mission_id: self.mission_id.or(fallback.mission_id),
        }
    }

    pub fn user_id(&self) -> Result<String> {
        required("user_id", self.user_id.as_deref())
    }

    pub fn mission_id(&self) -> Result<String> {
        required("mission_id", self.mission_id.as_deref())
    }
}

fn required(name: &str, value: Option<&str>) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::MalformedPayload(format!("missing field `{}`", name)));
    }
    Ok(value.to_string())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMissionResponse {
    pub mission_id: String,
    pub start_time: DateTime<Utc>,
    pub expires_in: i64,
}

impl CreateMissionResponse {
    pub fn new(mission: &Mission, expires_in: i64) -> Self {
        Self {
            mission_id: mission.id.clone(),
            start_time: mission.start_time,
            expires_in,
        }
    }
}

/// Fields of a `/verify_exif` multipart submission.
#[derive(Debug, Default)]
pub struct PhotoSubmission {
    pub user_id: String,
    pub mission_id: String,
    pub file: Vec<u8>,
}

// src/core/services/verification.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::{
    core::{
        exif::GpsExtractor,
        geo::{haversine_distance, Coordinates},
        mission::{Mission, MissionRegistry},
    },
    utils::config::Config,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationReason {
    ValidLocationAndTime,
    InvalidLocationOrExpired,
    NoGpsInfo,
    MissionNotFound,
    ExifError(String),
}

impl VerificationReason {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidLocationAndTime => "verified",
            Self::InvalidLocationOrExpired => "threshold",
            Self::NoGpsInfo => "no_gps",
            Self::MissionNotFound => "mission_not_found",
            Self::ExifError(_) => "exif_error",
        }
    }
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidLocationAndTime => f.write_str("Valid location and time"),
            Self::InvalidLocationOrExpired => f.write_str("Invalid location or expired mission"),
            Self::NoGpsInfo => f.write_str("No GPS info found"),
            Self::MissionNotFound => f.write_str("Mission not found"),
            Self::ExifError(message) => write!(f, "Error reading EXIF: {}", message),
        }
    }
}

impl Serialize for VerificationReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub reason: VerificationReason,
}

impl VerificationResult {
    pub fn rejected(reason: VerificationReason) -> Self {
        Self { verified: false, reason }
    }
}

/// Where the photo must be taken and how long a mission stays open.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationPolicy {
    pub target: Coordinates,
    pub max_distance_meters: f64,
    pub expiry_minutes: i64,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            target: Coordinates::new(37.632, 127.056),
            max_distance_meters: 1000.0,
            expiry_minutes: 10,
        }
    }
}

impl From<&Config> for VerificationPolicy {
    fn from(config: &Config) -> Self {
        Self {
            target: Coordinates::new(
                config.verification.target_latitude,
                config.verification.target_longitude,
            ),
            max_distance_meters: config.verification.max_distance_meters,
            expiry_minutes: config.mission.expiry_minutes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerificationService {
    policy: VerificationPolicy,
}

impl VerificationService {
    pub fn new(policy: VerificationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    pub fn distance_to_target(&self, coords: &Coordinates) -> f64 {
        haversine_distance(coords, &self.policy.target)
    }

    /// Decides a submission for an existing mission. Pure in its inputs.
    pub fn verify(
        &self,
        mission: &Mission,
        coords: Option<Coordinates>,
        now: DateTime<Utc>,
    ) -> VerificationResult {
        let Some(coords) = coords else {
            return VerificationResult::rejected(VerificationReason::NoGpsInfo);
        };

        let distance = self.distance_to_target(&coords);
        let elapsed_minutes = mission.elapsed_minutes(now);

        let verified = distance <= self.policy.max_distance_meters
            && elapsed_minutes <= self.policy.expiry_minutes;

        info!(
            mission_id = %mission.id,
            distance_m = distance,
            elapsed_minutes,
            verified,
            "Evaluated mission submission"
        );

        if verified {
            VerificationResult {
                verified: true,
                reason: VerificationReason::ValidLocationAndTime,
            }
        } else {
            VerificationResult::rejected(VerificationReason::InvalidLocationOrExpired)
        }
    }

    /// Full submission pipeline: mission lookup, GPS extraction, decision.
    /// Every failure is folded into a negative result.
    pub fn verify_photo(
        &self,
        registry: &MissionRegistry,
        extractor: &dyn GpsExtractor,
        mission_id: &str,
        image: &[u8],
        now: DateTime<Utc>,
    ) -> VerificationResult {
        let Some(mission) = registry.get(mission_id) else {
            warn!(mission_id, "Verification requested for unknown mission");
            return VerificationResult::rejected(VerificationReason::MissionNotFound);
        };

        match extractor.extract(image) {
            Ok(coords) => self.verify(&mission, coords, now),
            Err(e) => {
                warn!(mission_id, error = %e, "Failed to read EXIF");
                VerificationResult::rejected(VerificationReason::ExifError(e.to_string()))
            }
        }
    }
}

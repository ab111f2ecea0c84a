// src/utils/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::core::services::verification::VerificationReason;

#[derive(Debug, Default)]
pub struct Metrics {
    missions_created: AtomicU64,
    verifications_total: AtomicU64,
    verified_total: AtomicU64,
    rejected_threshold: AtomicU64,
    rejected_no_gps: AtomicU64,
    rejected_mission_not_found: AtomicU64,
    rejected_exif_error: AtomicU64,
    processing_time_micros: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub missions_created: u64,
    pub verifications_total: u64,
    pub verified_total: u64,
    pub rejected_threshold: u64,
    pub rejected_no_gps: u64,
    pub rejected_mission_not_found: u64,
    pub rejected_exif_error: u64,
    pub avg_verification_micros: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mission_created(&self) {
        self.missions_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verification(&self, reason: &VerificationReason, duration: Duration) {
        self.verifications_total.fetch_add(1, Ordering::Relaxed);
        self.processing_time_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        let counter = match reason {
            VerificationReason::ValidLocationAndTime => &self.verified_total,
            VerificationReason::InvalidLocationOrExpired => &self.rejected_threshold,
            VerificationReason::NoGpsInfo => &self.rejected_no_gps,
            VerificationReason::MissionNotFound => &self.rejected_mission_not_found,
            VerificationReason::ExifError(_) => &self.rejected_exif_error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let verifications_total = self.verifications_total.load(Ordering::Relaxed);
        let processing_time = self.processing_time_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            missions_created: self.missions_created.load(Ordering::Relaxed),
            verifications_total,
            verified_total: self.verified_total.load(Ordering::Relaxed),
            rejected_threshold: self.rejected_threshold.load(Ordering::Relaxed),
            rejected_no_gps: self.rejected_no_gps.load(Ordering::Relaxed),
            rejected_mission_not_found: self.rejected_mission_not_found.load(Ordering::Relaxed),
            rejected_exif_error: self.rejected_exif_error.load(Ordering::Relaxed),
            avg_verification_micros: processing_time.checked_div(verifications_total).unwrap_or(0),
        }
    }
}

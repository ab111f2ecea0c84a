// src/core/services/health.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    core::mission::MissionRegistry,
    utils::metrics::{Metrics, MetricsSnapshot},
};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: i64,
    pub missions: usize,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

pub struct HealthService {
    started_at: DateTime<Utc>,
    registry: Arc<MissionRegistry>,
    metrics: Arc<Metrics>,
}

impl HealthService {
    pub fn new(registry: Arc<MissionRegistry>, metrics: Arc<Metrics>) -> Self {
        Self {
            started_at: Utc::now(),
            registry,
            metrics,
        }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: (Utc::now() - self.started_at).num_seconds(),
            missions: self.registry.len(),
            metrics: self.metrics.snapshot(),
        }
    }
}

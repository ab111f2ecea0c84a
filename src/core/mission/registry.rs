// src/core/mission/registry.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use super::types::Mission;

/// In-memory mission store shared by every request handler.
///
/// Missions live for the lifetime of the process. Expired entries are never
/// reclaimed; expiry is only evaluated when a mission is verified.
#[derive(Debug, Default)]
pub struct MissionRegistry {
    missions: RwLock<HashMap<String, Mission>>,
}

impl MissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_mission(&self, user_id: &str) -> Mission {
        self.create_mission_at(user_id, Utc::now())
    }

    pub fn create_mission_at(&self, user_id: &str, start_time: DateTime<Utc>) -> Mission {
        let mission = Mission::new(user_id, start_time);

        self.missions
            .write()
            .insert(mission.id.clone(), mission.clone());

        info!(mission_id = %mission.id, user_id, "Created mission");
        mission
    }

    pub fn get(&self, mission_id: &str) -> Option<Mission> {
        let mission = self.missions.read().get(mission_id).cloned();
        if mission.is_none() {
            debug!(mission_id, "Mission lookup missed");
        }
        mission
    }

    pub fn len(&self) -> usize {
        self.missions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.read().is_empty()
    }
}

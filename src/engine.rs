//! # Map Engine
//!
//! Stateful floor-plan management. Parsing a gym's SVG map is the most
//! expensive computation in the crate and its output is immutable, so the
//! engine parses once per gym and serves cached plans (and hit-tests
//! against them) afterwards.
//!
//! The engine is a process-wide singleton behind a mutex; the mobile UI
//! layer interacts through short calls that trigger computation but never
//! transfer the parsed structures themselves — renderers pull a JSON
//! snapshot instead.

use std::sync::{Arc, Mutex};

use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cache::PlanCache;
use crate::error::{CruxMapError, Result};
use crate::map::{FloorPlan, PathPoint};

/// Engine counters for debugging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Gyms with a cached parsed plan
    pub cached_plans: usize,
    /// Sectors across all cached plans
    pub total_sectors: usize,
}

/// The stateful map engine.
pub struct MapEngine {
    plans: PlanCache,
}

impl MapEngine {
    /// Create an engine with the default plan cache capacity.
    pub fn new() -> Self {
        Self {
            plans: PlanCache::default(),
        }
    }

    /// Parse a gym's floor-plan SVG and cache the result, replacing any
    /// previously cached plan for that gym.
    pub fn load_floor_plan(&mut self, gym_id: &str, svg_text: &str) -> Arc<FloorPlan> {
        let plan = Arc::new(FloorPlan::from_svg(svg_text));
        info!(
            "[Map] loaded floor plan for gym {}: {} sectors",
            gym_id,
            plan.sector_count()
        );
        self.plans.insert(gym_id.to_string(), plan.clone());
        plan
    }

    /// Fetch a gym's cached plan.
    pub fn floor_plan(&mut self, gym_id: &str) -> Option<Arc<FloorPlan>> {
        self.plans.get(gym_id)
    }

    /// Resolve a tap position to the id of the sector it lands in.
    ///
    /// Fails when no plan is loaded for this gym; returns `Ok(None)` when
    /// the tap hits no interactive sector.
    pub fn sector_at(&mut self, gym_id: &str, point: PathPoint) -> Result<Option<String>> {
        let plan = self
            .plans
            .get(gym_id)
            .ok_or_else(|| CruxMapError::PlanNotLoaded {
                gym_id: gym_id.to_string(),
            })?;
        Ok(plan.sector_at(point).map(|sector| sector.id.clone()))
    }

    /// JSON snapshot of a gym's sectors for the rendering layer.
    pub fn floor_plan_json(&mut self, gym_id: &str) -> Result<String> {
        let plan = self
            .plans
            .get(gym_id)
            .ok_or_else(|| CruxMapError::PlanNotLoaded {
                gym_id: gym_id.to_string(),
            })?;
        serde_json::to_string(plan.sectors()).map_err(|e| CruxMapError::Serialization {
            message: e.to_string(),
        })
    }

    /// Drop a gym's cached plan (call after the gym owner edits the map).
    pub fn invalidate(&mut self, gym_id: &str) {
        self.plans.invalidate(gym_id);
    }

    /// Drop all cached plans.
    pub fn clear(&mut self) {
        self.plans.clear();
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            cached_plans: self.plans.len(),
            total_sectors: self
                .plans
                .plans()
                .map(|(_, plan)| plan.sector_count())
                .sum(),
        }
    }
}

impl Default for MapEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Global engine singleton.
pub static MAP_ENGINE: Lazy<Mutex<MapEngine>> = Lazy::new(|| Mutex::new(MapEngine::new()));

/// Run a closure against the global engine.
pub fn with_map_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut MapEngine) -> R,
{
    let mut engine = MAP_ENGINE.lock().unwrap();
    f(&mut engine)
}

//! Campaign orbit scene
//!
//! Coordinates the layout pipeline and the camera:
//!
//! ```text
//! EntitySnapshot list (from portfolio owner)
//!        │
//!        ▼
//! ring/band grouping ──► slot assignment ──► resolve_position
//!        │                                        │
//!        │                                        ├──► positions() (renderer)
//!        │                                        └──► SpatialIndex (picking)
//!        ▼
//! selection events ──► framing calculator ──► TransitionController
//!                                                  │
//!                                                  └──► pose()/zoom() each frame
//! ```
//!
//! The scene is poll-driven: callers push snapshots and selection events,
//! call `tick(dt)` once per frame, and read positions and the camera pose
//! back. No callbacks, no background work.

pub mod framing;
pub mod slots;
pub mod spatial;
pub mod transition;

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use tracing::{debug, warn};

use orbit_types::{
    resolve_position, CameraPose, EntitySnapshot, GroupingMode, LifecycleStage, Viewport,
};

use crate::config::{global_config, OrbitSettings};
use framing::{compute_framing, FramingError, FramingRequest};
use spatial::{SpatialBody, SpatialIndex};
use transition::{TransitionController, TransitionEvent};

pub use framing::project_to_screen;
pub use transition::{TransitionKind, TransitionState};

/// The orbit view's layout + camera core.
#[derive(Debug, Clone)]
pub struct OrbitScene {
    settings: OrbitSettings,
    /// Current snapshot, lexicographically ordered by id.
    entities: Vec<EntitySnapshot>,
    grouping: GroupingMode,
    /// Resolved world position per entity id. Recomputed eagerly on any
    /// layout-relevant change, stable between changes.
    positions: HashMap<String, Vec3>,
    /// Assigned angle per entity id (kept for diagnostics and tests).
    angles: HashMap<String, f32>,
    index: SpatialIndex,
    viewport: Viewport,
    controller: TransitionController,
}

impl Default for OrbitScene {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitScene {
    /// Scene with globally configured settings.
    pub fn new() -> Self {
        Self::with_settings(global_config().clone())
    }

    pub fn with_settings(settings: OrbitSettings) -> Self {
        let controller =
            TransitionController::new(settings.home.pose(), settings.transitions.clone());
        Self {
            settings,
            entities: Vec::new(),
            grouping: GroupingMode::default(),
            positions: HashMap::new(),
            angles: HashMap::new(),
            index: SpatialIndex::new(),
            viewport: Viewport::default(),
            controller,
        }
    }

    // =========================================================================
    // LAYOUT INPUTS
    // =========================================================================

    /// Replace the entity snapshot and re-layout. The portfolio owner calls
    /// this on every layout-relevant change (stage re-assignment included);
    /// recomputation is cheap enough to redo wholesale.
    pub fn set_entities(&mut self, mut entities: Vec<EntitySnapshot>) {
        entities.sort_by(|a, b| a.id.cmp(&b.id));
        entities.dedup_by(|a, b| {
            if a.id == b.id {
                warn!(id = %a.id, "duplicate entity id in snapshot, keeping first");
                true
            } else {
                false
            }
        });
        self.entities = entities;
        self.relayout();
    }

    /// Switch between lifecycle rings and progress bands.
    pub fn set_grouping(&mut self, grouping: GroupingMode) {
        if self.grouping != grouping {
            self.grouping = grouping;
            self.relayout();
        }
    }

    /// Report the host viewport. Fails fast on non-positive dimensions or an
    /// out-of-range field of view - a caller bug, not a runtime condition.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), FramingError> {
        let aspect = viewport.aspect();
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(FramingError::InvalidAspect(aspect));
        }
        if !(viewport.fov_y > 0.0 && viewport.fov_y < std::f32::consts::PI) {
            return Err(FramingError::InvalidFov(viewport.fov_y));
        }
        self.viewport = viewport;
        Ok(())
    }

    fn relayout(&mut self) {
        self.positions.clear();
        self.angles.clear();

        match self.grouping {
            GroupingMode::LifecycleRings => {
                // BTreeMap keeps ring iteration order deterministic; members
                // are already lexicographic from the sorted snapshot.
                let mut rings: BTreeMap<LifecycleStage, Vec<String>> = BTreeMap::new();
                for e in &self.entities {
                    rings.entry(e.lifecycle).or_default().push(e.id.clone());
                }
                for (stage, members) in &rings {
                    let assigned =
                        slots::assign_ring(stage.as_str(), members, &self.settings.layout);
                    self.resolve_group(stage.ring_radius(), &assigned);
                }
            }
            GroupingMode::ProgressBands => {
                let mut bands: BTreeMap<usize, Vec<String>> = BTreeMap::new();
                for e in &self.entities {
                    bands
                        .entry(slots::band_index(e.percent_complete))
                        .or_default()
                        .push(e.id.clone());
                }
                for (band, members) in &bands {
                    let assigned = slots::assign_band(*band, members, &self.settings.layout);
                    self.resolve_group(self.band_radius(*band), &assigned);
                }
            }
        }

        let bodies: Vec<SpatialBody> = self
            .entities
            .iter()
            .filter_map(|e| {
                let pos = self.positions.get(&e.id)?;
                Some(SpatialBody::new(
                    e.id.clone(),
                    *pos,
                    self.settings.bodies.radius_for_emphasis(e.emphasis),
                ))
            })
            .collect();
        self.index.rebuild(bodies);

        debug!(
            entities = self.entities.len(),
            grouping = ?self.grouping,
            "orbit layout recomputed"
        );
    }

    fn resolve_group(&mut self, radius: f32, assigned: &HashMap<String, f32>) {
        for (id, angle) in assigned {
            // Tilt stays a per-entity funnel property in both groupings.
            let Some(entity) = self.entities.iter().find(|e| &e.id == id) else {
                continue;
            };
            self.positions
                .insert(id.clone(), resolve_position(radius, entity.funnel.tilt(), *angle));
            self.angles.insert(id.clone(), *angle);
        }
    }

    /// Outermost band at the least-complete bucket, evenly stepped inward.
    fn band_radius(&self, band: usize) -> f32 {
        let outer = self.settings.layout.band_outer_radius;
        let inner = self.settings.layout.band_inner_radius;
        let t = band as f32 / (slots::PROGRESS_BANDS - 1) as f32;
        outer + (inner - outer) * t
    }

    // =========================================================================
    // SELECTION & CAMERA
    // =========================================================================

    /// Focus the camera on an entity. Unknown ids are tolerated no-ops
    /// (`Ok(false)`); invalid framing configuration is a fail-fast error.
    pub fn select(&mut self, id: &str) -> Result<bool, FramingError> {
        let Some(target) = self.positions.get(id).copied() else {
            warn!(id, "selection ignored, no such entity in layout");
            return Ok(false);
        };
        let emphasis = self
            .entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.emphasis)
            .unwrap_or_default();

        let request = FramingRequest {
            target,
            target_radius: self.settings.bodies.radius_for_emphasis(emphasis),
            viewport: self.viewport,
            screen_x: self.settings.framing.screen_x,
            screen_y: self.settings.framing.screen_y,
            apparent_size: self.settings.framing.apparent_size,
        };
        let pose = compute_framing(self.controller.pose(), &request)?;
        Ok(self.controller.request_focus(id, pose))
    }

    /// Deselect: fly back to the pose saved before the first focus.
    pub fn deselect(&mut self) -> bool {
        self.controller.request_return()
    }

    /// Fly to the fixed home pose; outranks any transition in flight.
    pub fn reset(&mut self) -> bool {
        self.controller.request_reset()
    }

    /// Advance animations by a frame delta. Returns a completion event on
    /// the frame a transition finishes.
    pub fn tick(&mut self, dt: f32) -> Option<TransitionEvent> {
        self.controller.tick(dt)
    }

    // =========================================================================
    // OUTPUTS (polled by renderer and UI)
    // =========================================================================

    pub fn pose(&self) -> &CameraPose {
        self.controller.pose()
    }

    pub fn zoom(&self) -> f32 {
        self.controller.zoom()
    }

    pub fn in_transition(&self) -> bool {
        self.controller.in_transition()
    }

    /// True while post-reset reconciliation should stand down.
    pub fn skip_reconcile(&self) -> bool {
        self.controller.skip_reconcile()
    }

    pub fn transition_state(&self) -> &TransitionState {
        self.controller.state()
    }

    /// Resolved world positions, id → position.
    pub fn positions(&self) -> &HashMap<String, Vec3> {
        &self.positions
    }

    pub fn position_of(&self, id: &str) -> Option<Vec3> {
        self.positions.get(id).copied()
    }

    /// Assigned ring angle, radians in [0, 2π).
    pub fn angle_of(&self, id: &str) -> Option<f32> {
        self.angles.get(id).copied()
    }

    /// Rendered body radius for an entity's emphasis value.
    pub fn body_radius(&self, id: &str) -> Option<f32> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| self.settings.bodies.radius_for_emphasis(e.emphasis))
    }

    /// Closest body to a world point within `max_distance` of its surface.
    /// Hosts use this to turn pointer rays into selection events.
    pub fn pick(&self, point: Vec3, max_distance: f32) -> Option<&str> {
        self.index.pick(point, max_distance).map(|b| b.id.as_str())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

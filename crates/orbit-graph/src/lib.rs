//! Campaign Orbit Engine
//!
//! Deterministic orbital layout and camera control for the campaign orbit
//! view. This crate contains ONLY the layout/camera core - no rendering, no
//! UI chrome, no data model. Consumers feed entity snapshots and selection
//! events in, call [`OrbitScene::tick`] once per frame, and read world
//! positions and the camera pose back.
//!
//! Shared contract types (snapshot, stages, pose, the position formula)
//! live in `orbit-types`, re-exported here for convenience.

pub mod config;
pub mod orbit;

pub use config::{global_config, OrbitSettings};
pub use orbit::framing::{compute_framing, project_to_screen, FramingError, FramingRequest};
pub use orbit::spatial::{SpatialBody, SpatialIndex};
pub use orbit::transition::{
    TransitionController, TransitionEvent, TransitionKind, TransitionState,
};
pub use orbit::OrbitScene;

// Re-export the boundary contracts so hosts can depend on one crate.
pub use orbit_types::{
    resolve_position, CameraPose, EntitySnapshot, FunnelStage, GroupingMode, LifecycleStage,
    Viewport,
};

//! Shared Contract Types for the Campaign Orbit View
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the
//! boundary between the layout/camera engine and its consumers (renderer,
//! portfolio owner, UI shell).
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐             ┌──────────────────┐
//! │  Portfolio owner │  snapshot   │  orbit-graph     │
//! │  (data model)    │ ──────────► │  (engine)        │
//! └──────────────────┘             └────────┬─────────┘
//!                                           │ positions + pose
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │  Renderer        │
//!                                  └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Data contracts only - no engine state, no behavior beyond table
//!    lookups and the orbital position formula
//! 2. String IDs for JSON compatibility
//! 3. Derive-heavy: Serialize, Deserialize, Clone, Debug for all types
//! 4. The orbital position formula lives here, once ([`resolve_position`]) -
//!    every consumer that needs a body's position calls the same function

pub mod camera;
pub mod entity;
pub mod position;
pub mod stages;

pub use camera::{CameraPose, Viewport};
pub use entity::{EntitySnapshot, GroupingMode};
pub use position::resolve_position;
pub use stages::{FunnelStage, LifecycleStage};

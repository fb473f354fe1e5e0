//! Stage mapping tables
//!
//! Two fixed product taxonomies drive the geometry of the orbit view:
//! lifecycle stage selects the ring radius, funnel stage selects the tilt of
//! the orbital plane. Both tables are code, not configuration - changing a
//! value is a breaking change that forces a full re-layout.

use serde::{Deserialize, Serialize};

// ============================================================================
// LIFECYCLE STAGE (ring radius)
// ============================================================================

/// A campaign's position in its operational lifecycle.
///
/// Radii are strictly decreasing from `Concept` to `Closing`: earlier stages
/// orbit further out, campaigns spiral inward toward the sun as they wind
/// down. The renderer and ring-based filtering both rely on this ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    /// Ideation - outermost ring
    Concept,
    /// Budgeted and scheduled, not yet live
    Planning,
    /// Live and spending
    #[default]
    Active,
    /// Live, under active tuning
    Optimizing,
    /// Winding down - innermost ring
    Closing,
}

impl LifecycleStage {
    /// Ring radius in world units for this stage.
    pub fn ring_radius(&self) -> f32 {
        match self {
            LifecycleStage::Concept => 44.0,
            LifecycleStage::Planning => 36.0,
            LifecycleStage::Active => 29.0,
            LifecycleStage::Optimizing => 23.0,
            LifecycleStage::Closing => 18.0,
        }
    }

    /// All stages in outer-to-inner order.
    pub fn all() -> &'static [LifecycleStage] {
        &[
            LifecycleStage::Concept,
            LifecycleStage::Planning,
            LifecycleStage::Active,
            LifecycleStage::Optimizing,
            LifecycleStage::Closing,
        ]
    }

    /// Stable key for hashing and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Concept => "concept",
            LifecycleStage::Planning => "planning",
            LifecycleStage::Active => "active",
            LifecycleStage::Optimizing => "optimizing",
            LifecycleStage::Closing => "closing",
        }
    }
}

// ============================================================================
// FUNNEL STAGE (orbital-plane tilt)
// ============================================================================

/// A campaign's marketing-funnel position.
///
/// Tilt is monotonically increasing across the four stages, spanning the
/// full 0°..=90° range: awareness campaigns orbit in the flat reference
/// plane, retention campaigns in a fully upright plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    #[default]
    Awareness,
    Consideration,
    Conversion,
    Retention,
}

impl FunnelStage {
    /// Orbital-plane tilt in degrees.
    pub fn tilt_degrees(&self) -> f32 {
        match self {
            FunnelStage::Awareness => 0.0,
            FunnelStage::Consideration => 30.0,
            FunnelStage::Conversion => 60.0,
            FunnelStage::Retention => 90.0,
        }
    }

    /// Orbital-plane tilt in radians (what the position resolver consumes).
    pub fn tilt(&self) -> f32 {
        self.tilt_degrees().to_radians()
    }

    /// All stages in funnel order.
    pub fn all() -> &'static [FunnelStage] {
        &[
            FunnelStage::Awareness,
            FunnelStage::Consideration,
            FunnelStage::Conversion,
            FunnelStage::Retention,
        ]
    }

    /// Stable key for hashing and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Awareness => "awareness",
            FunnelStage::Consideration => "consideration",
            FunnelStage::Conversion => "conversion",
            FunnelStage::Retention => "retention",
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

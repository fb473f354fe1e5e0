//! Campaign entity snapshot
//!
//! The portfolio owner pushes a full snapshot on every layout-relevant
//! change (stage re-assignment, campaign added/removed). Positions are
//! computed engine-side; the snapshot carries no geometry.

use serde::{Deserialize, Serialize};

use crate::stages::{FunnelStage, LifecycleStage};

/// One orbiting campaign body, as supplied by the portfolio owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Stable unique identifier. Ring order is lexicographic over this id,
    /// never insertion order, so layouts reproduce across reloads.
    pub id: String,

    /// Lifecycle stage - selects the ring radius
    pub lifecycle: LifecycleStage,

    /// Funnel stage - selects the orbital-plane tilt
    pub funnel: FunnelStage,

    /// Emphasis scalar (e.g. spend). Rendered size only, never position.
    #[serde(default)]
    pub emphasis: f32,

    /// Completion fraction in [0, 1]. Drives the progress-band grouping.
    #[serde(default)]
    pub percent_complete: f32,

    /// Whether an alert is attached. Visual only; affects no position.
    #[serde(default)]
    pub alert: bool,
}

impl EntitySnapshot {
    pub fn new(id: impl Into<String>, lifecycle: LifecycleStage, funnel: FunnelStage) -> Self {
        Self {
            id: id.into(),
            lifecycle,
            funnel,
            emphasis: 0.0,
            percent_complete: 0.0,
            alert: false,
        }
    }

    pub fn with_emphasis(mut self, emphasis: f32) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn with_progress(mut self, percent_complete: f32) -> Self {
        self.percent_complete = percent_complete;
        self
    }

    pub fn with_alert(mut self) -> Self {
        self.alert = true;
        self
    }
}

/// How bodies are grouped into rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One ring per lifecycle stage (the default view)
    #[default]
    LifecycleRings,
    /// Five rings bucketed by percent-complete
    ProgressBands,
}

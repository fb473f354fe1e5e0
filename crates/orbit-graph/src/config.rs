//! Engine tuning settings
//!
//! All empirically-tuned constants live here rather than inline: the
//! forbidden-arc width and candidate count of the slot search, the body size
//! mapping, framing defaults, transition durations, and the home pose.
//!
//! Settings load once from `config/orbit_settings.yaml` (or the path in
//! `ORBIT_SETTINGS_PATH`) via [`global_config`]; when the file is absent the
//! compiled-in defaults apply. Every section and field is individually
//! optional in the YAML.

use std::sync::OnceLock;

use glam::Vec3;
use orbit_types::CameraPose;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default settings file path, relative to the working directory.
pub const SETTINGS_PATH: &str = "config/orbit_settings.yaml";

// ============================================================================
// SETTINGS SECTIONS
// ============================================================================

/// Root settings document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub layout: LayoutSettings,
    pub bodies: BodySettings,
    pub framing: FramingSettings,
    pub transitions: TransitionSettings,
    pub home: HomeSettings,
}

/// Angular slot assignment tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Width of the arc around the 0°/180° axes that no slot may enter,
    /// in degrees.
    pub forbidden_arc_deg: f32,

    /// How many candidate base offsets the per-ring search scores. Bounded
    /// and best-effort; raising it trades layout time for axis clearance.
    pub offset_candidates: u32,

    /// Per-entity jitter as a fraction of the slot step.
    pub jitter_frac: f32,

    /// Entities that bypass assignment and receive a fixed angle. Used to
    /// pin always-visible alert cases at maximal separation.
    pub slot_overrides: Vec<SlotOverride>,

    /// Ring radius of the outermost progress band.
    pub band_outer_radius: f32,

    /// Ring radius of the innermost progress band.
    pub band_inner_radius: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            forbidden_arc_deg: 5.0,
            offset_candidates: 8,
            jitter_frac: 0.15,
            slot_overrides: Vec::new(),
            band_outer_radius: 44.0,
            band_inner_radius: 18.0,
        }
    }
}

/// A hard-coded angle for one named entity.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotOverride {
    pub id: String,
    pub degrees: f32,
}

/// Emphasis → rendered body radius mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    pub radius_min: f32,
    pub radius_max: f32,
    /// Emphasis value that maps to `radius_max`; everything above clamps.
    pub emphasis_ceiling: f32,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            radius_min: 0.8,
            radius_max: 2.6,
            emphasis_ceiling: 100_000.0,
        }
    }
}

impl BodySettings {
    /// Rendered body radius for an emphasis value (e.g. spend).
    pub fn radius_for_emphasis(&self, emphasis: f32) -> f32 {
        let t = if self.emphasis_ceiling > 0.0 {
            (emphasis / self.emphasis_ceiling).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.radius_min + (self.radius_max - self.radius_min) * t
    }
}

/// Where on screen, and how large, a focused body should appear.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FramingSettings {
    /// Normalized horizontal screen position, 0 = left edge.
    pub screen_x: f32,
    /// Normalized vertical screen position, 0 = top edge.
    pub screen_y: f32,
    /// Desired apparent size as a fraction of the view.
    pub apparent_size: f32,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            screen_x: 0.25,
            screen_y: 0.50,
            apparent_size: 0.20,
        }
    }
}

/// Transition durations and the post-reset grace window, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    pub focus_secs: f32,
    pub return_secs: f32,
    pub reset_secs: f32,
    /// After a reset completes, per-frame zoom/pose reconciliation is told
    /// to stand down for this long.
    pub reset_grace_secs: f32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            focus_secs: 0.8,
            return_secs: 0.7,
            reset_secs: 1.0,
            reset_grace_secs: 0.35,
        }
    }
}

/// Fixed home pose the reset command flies to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeSettings {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for HomeSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 55.0, 110.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

impl HomeSettings {
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(Vec3::from(self.position), Vec3::from(self.look_at))
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl OrbitSettings {
    /// Parse settings from a YAML document. Missing sections and fields fall
    /// back to their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    fn load() -> Self {
        let path =
            std::env::var("ORBIT_SETTINGS_PATH").unwrap_or_else(|_| SETTINGS_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_yaml(&contents) {
                Ok(settings) => {
                    debug!(%path, "loaded orbit settings");
                    settings
                }
                Err(err) => {
                    warn!(%path, %err, "orbit settings file failed to parse, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(%path, "no orbit settings file, using defaults");
                Self::default()
            }
        }
    }
}

/// Global settings, loaded on first access.
pub fn global_config() -> &'static OrbitSettings {
    static CONFIG: OnceLock<OrbitSettings> = OnceLock::new();
    CONFIG.get_or_init(OrbitSettings::load)
}

// ============================================================================
// TESTS
// ============================================================================

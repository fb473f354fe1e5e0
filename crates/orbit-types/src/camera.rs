//! Camera contract types
//!
//! The pose is owned by the engine's transition controller and read each
//! frame by the renderer. The viewport travels the other way: the host
//! reports its dimensions and field of view on resize.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera position plus look-at target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Unnormalized view axis, position toward look-at.
    pub fn view_axis(&self) -> Vec3 {
        self.look_at - self.position
    }
}

/// Host viewport: dimensions in pixels, vertical field of view in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub fov_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, fov_y: f32) -> Self {
        Self {
            width,
            height,
            fov_y,
        }
    }

    /// Convenience constructor taking the field of view in degrees.
    pub fn with_fov_degrees(width: f32, height: f32, fov_y_degrees: f32) -> Self {
        Self::new(width, height, fov_y_degrees.to_radians())
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_fov_degrees(1280.0, 720.0, 60.0)
    }
}

//! Camera framing calculator
//!
//! Given a body's world position and rendered radius, computes where the
//! camera must stand so the body appears at a prescribed normalized screen
//! position and apparent size - without re-aiming the camera at the body.
//! The existing view direction is preserved and the camera itself is
//! displaced, which keeps the user's rotational context across focus
//! changes.
//!
//! Everything is plain pinhole geometry:
//!
//! ```text
//! distance    = target_radius / (apparent_size · tan(fov/2))
//! view_height = 2 · tan(fov/2) · distance
//! view_width  = view_height · aspect
//! ```

use glam::Vec3;
use orbit_types::{CameraPose, Viewport};
use thiserror::Error;
use tracing::warn;

/// Invalid numeric inputs are caller bugs: fail fast, never clamp silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FramingError {
    #[error("viewport aspect must be positive and finite (got {0})")]
    InvalidAspect(f32),

    #[error("vertical field of view must be in (0, pi) radians (got {0})")]
    InvalidFov(f32),

    #[error("apparent size fraction must be positive (got {0})")]
    InvalidApparentSize(f32),

    #[error("target radius must be positive (got {0})")]
    InvalidTargetRadius(f32),

    #[error("computed camera distance must be positive and finite (got {0})")]
    InvalidDistance(f32),

    #[error("camera view axis is degenerate (position coincides with look-at)")]
    DegenerateViewAxis,
}

/// Inputs for one framing computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingRequest {
    /// World position of the body to frame.
    pub target: Vec3,
    /// Rendered radius of the body, world units.
    pub target_radius: f32,
    pub viewport: Viewport,
    /// Desired normalized screen position, (0,0) = top-left.
    pub screen_x: f32,
    pub screen_y: f32,
    /// Desired apparent size as a fraction of the view.
    pub apparent_size: f32,
}

/// Orthonormal view basis from a pose. `None` when position and look-at
/// coincide.
fn view_basis(pose: &CameraPose) -> Option<(Vec3, Vec3, Vec3)> {
    let axis = pose.view_axis();
    if axis.length_squared() < 1e-12 {
        return None;
    }
    let view = axis.normalize();

    // Near the vertical the world-up cross degenerates; fall back to X so
    // the basis stays orthonormal instead of exploding.
    let right = view.cross(Vec3::Y);
    let right = if right.length_squared() < 1e-8 {
        Vec3::X
    } else {
        right.normalize()
    };
    let up = right.cross(view).normalize();
    Some((view, right, up))
}

/// Compute the camera pose that frames `req.target` at the requested screen
/// position and apparent size, preserving the current view direction.
pub fn compute_framing(
    current: &CameraPose,
    req: &FramingRequest,
) -> Result<CameraPose, FramingError> {
    let aspect = req.viewport.aspect();
    if !aspect.is_finite() || aspect <= 0.0 {
        return Err(FramingError::InvalidAspect(aspect));
    }
    let fov = req.viewport.fov_y;
    if !(fov > 0.0 && fov < std::f32::consts::PI) {
        return Err(FramingError::InvalidFov(fov));
    }
    if req.apparent_size <= 0.0 {
        return Err(FramingError::InvalidApparentSize(req.apparent_size));
    }
    if req.target_radius <= 0.0 {
        return Err(FramingError::InvalidTargetRadius(req.target_radius));
    }

    let (view, right, up) = view_basis(current).ok_or(FramingError::DegenerateViewAxis)?;

    let half_tan = (fov * 0.5).tan();
    let distance = req.target_radius / (req.apparent_size * half_tan);
    if !distance.is_finite() || distance <= 0.0 {
        return Err(FramingError::InvalidDistance(distance));
    }

    let view_height = 2.0 * half_tan * distance;
    let view_width = view_height * aspect;

    // Displace the camera opposite the desired on-screen shift; the body
    // stays put and the orientation is untouched.
    let shift_x = (req.screen_x - 0.5) * view_width;
    let shift_y = (req.screen_y - 0.5) * view_height;

    let position = req.target - view * distance - right * shift_x + up * shift_y;
    let look_at = position + view * distance;
    let pose = CameraPose::new(position, look_at);

    // Self-check: re-project the body through the computed pose. A small
    // deviation is float noise; a large one is a formula regression.
    if let Some((nx, ny)) = project_to_screen(&pose, &req.viewport, req.target) {
        let deviation = (nx - req.screen_x).abs().max((ny - req.screen_y).abs());
        if deviation > 0.05 {
            warn!(
                nx,
                ny,
                wanted_x = req.screen_x,
                wanted_y = req.screen_y,
                "framing re-projection drifted"
            );
        }
        debug_assert!(
            deviation < 0.10,
            "framing re-projection off by {deviation}: ({nx}, {ny}) vs ({}, {})",
            req.screen_x,
            req.screen_y
        );
    }

    Ok(pose)
}

/// Standard perspective projection of a world point to normalized screen
/// coordinates, (0,0) = top-left. `None` when the point is at or behind the
/// camera plane, or the pose is degenerate.
pub fn project_to_screen(
    pose: &CameraPose,
    viewport: &Viewport,
    point: Vec3,
) -> Option<(f32, f32)> {
    let (view, right, up) = view_basis(pose)?;

    let rel = point - pose.position;
    let depth = rel.dot(view);
    if depth <= 0.0 {
        return None;
    }

    let half_h = depth * (viewport.fov_y * 0.5).tan();
    let half_w = half_h * viewport.aspect();

    let nx = 0.5 + rel.dot(right) / (2.0 * half_w);
    let ny = 0.5 - rel.dot(up) / (2.0 * half_h);
    Some((nx, ny))
}

// ============================================================================
// TESTS
// ============================================================================

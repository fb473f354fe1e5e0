//! Orbital position resolver
//!
//! The one place the angle/radius/tilt → 3D formula exists. The renderer,
//! the camera framing calculator, and re-centering after a grouping change
//! all call this same function; a second copy drifting out of sync is the
//! bug class this module exists to prevent.

use glam::Vec3;

/// Resolve a body's world position from its ring radius, orbital-plane tilt
/// (radians), and assigned angle (radians).
///
/// The angle sweeps the flat reference plane; the plane is then tilted about
/// the X axis, folding the in-plane `z` component up into `-y`:
///
/// ```text
/// x      = cos(angle) · radius
/// z_base = sin(angle) · radius
/// y      = -z_base · sin(tilt)
/// z      =  z_base · cos(tilt)
/// ```
pub fn resolve_position(radius: f32, tilt: f32, angle: f32) -> Vec3 {
    let x = angle.cos() * radius;
    let z_base = angle.sin() * radius;
    let y = -z_base * tilt.sin();
    let z = z_base * tilt.cos();
    Vec3::new(x, y, z)
}

//! Camera transition controller
//!
//! A single-writer state machine over the camera pose. All animation is
//! driven by an explicit `tick(dt)` from the render loop - values are polled
//! each frame, no callbacks - so the controller is synchronously testable
//! without a real frame source.
//!
//! At most one transition is in flight at a time. The lock is the state
//! field itself plus the target identity it carries: a request to fly to the
//! body already being flown to is a no-op, a request for a different body
//! cancels losslessly by re-basing the interpolation from the current
//! mid-animation pose, and a reset outranks everything.

use orbit_types::CameraPose;
use tracing::{debug, trace};

use crate::config::TransitionSettings;

// ============================================================================
// STATES & EVENTS
// ============================================================================

/// Which animation, if any, currently owns the camera.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// Camera at rest; the renderer's own controls may move it.
    #[default]
    Idle,
    /// Flying toward a selected body.
    ToTarget(String),
    /// Flying back to the pose saved before the first focus.
    ToPrevious,
    /// Flying to the fixed home pose.
    ToReset,
}

/// What kind of transition just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Focus,
    Return,
    Reset,
}

/// Emitted from `tick` exactly once per completed transition. Consumers use
/// it to clear selection-dependent UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Completed(TransitionKind),
}

/// One in-flight interpolation. Start values are re-based on cancellation,
/// so a cancelled flight never causes a visual jump.
#[derive(Debug, Clone)]
struct Flight {
    from: CameraPose,
    from_zoom: f32,
    to: CameraPose,
    to_zoom: f32,
    elapsed: f32,
    duration: f32,
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Owns the camera pose and the zoom scalar. The renderer reads both every
/// frame; nothing else writes them while a transition is active.
#[derive(Debug, Clone)]
pub struct TransitionController {
    pose: CameraPose,
    zoom: f32,
    state: TransitionState,
    flight: Option<Flight>,
    /// Pose + zoom captured before the first focus, restored on return.
    snapshot: Option<(CameraPose, f32)>,
    /// Seconds left in the post-reset reconciliation grace window.
    grace: f32,
    home: CameraPose,
    cfg: TransitionSettings,
}

impl TransitionController {
    pub fn new(home: CameraPose, cfg: TransitionSettings) -> Self {
        Self {
            pose: home,
            zoom: 0.0,
            state: TransitionState::Idle,
            flight: None,
            snapshot: None,
            grace: 0.0,
            home,
            cfg,
        }
    }

    // =========================================================================
    // CURRENT VALUES (polled each frame)
    // =========================================================================

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// True while any transition is in flight.
    pub fn in_transition(&self) -> bool {
        self.state != TransitionState::Idle
    }

    /// True during the short window after a reset completes, while per-frame
    /// zoom/pose reconciliation must hold off corrective adjustments.
    pub fn skip_reconcile(&self) -> bool {
        self.grace > 0.0
    }

    /// Whether a pre-focus pose is waiting to be restored.
    pub fn snapshot_pending(&self) -> bool {
        self.snapshot.is_some()
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    /// Fly to a newly selected body. Returns whether a transition started.
    pub fn request_focus(&mut self, target_id: &str, target: CameraPose) -> bool {
        match &self.state {
            // A reset in flight outranks selection.
            TransitionState::ToReset => {
                trace!(target_id, "focus request ignored, reset in flight");
                false
            }
            // Same target already in flight: idempotent, keep the running
            // interpolation and its start time.
            TransitionState::ToTarget(current) if current == target_id => {
                trace!(target_id, "focus request ignored, already flying there");
                false
            }
            _ => {
                // Keep the true overview pose: only snapshot when nothing is
                // pending, so target-to-target hops don't overwrite it with
                // an intermediate focused pose.
                if self.snapshot.is_none() {
                    self.snapshot = Some((self.pose, self.zoom));
                }
                debug!(target_id, "camera transition: focus");
                self.begin(target, self.zoom, self.cfg.focus_secs);
                self.state = TransitionState::ToTarget(target_id.to_string());
                true
            }
        }
    }

    /// Fly back to the pose saved before focusing. Returns whether a
    /// transition started; a missing snapshot is a no-op.
    pub fn request_return(&mut self) -> bool {
        match self.state {
            TransitionState::Idle | TransitionState::ToTarget(_) => {
                let Some((pose, zoom)) = self.snapshot else {
                    trace!("return request ignored, no snapshot pending");
                    return false;
                };
                debug!("camera transition: return to saved pose");
                self.begin(pose, zoom, self.cfg.return_secs);
                self.state = TransitionState::ToPrevious;
                true
            }
            _ => false,
        }
    }

    /// Fly to the fixed home pose and zero zoom. Wins over anything already
    /// in flight and drops any pending snapshot.
    pub fn request_reset(&mut self) -> bool {
        debug!("camera transition: reset to home");
        self.snapshot = None;
        self.begin(self.home, 0.0, self.cfg.reset_secs);
        self.state = TransitionState::ToReset;
        true
    }

    fn begin(&mut self, to: CameraPose, to_zoom: f32, duration: f32) {
        // Re-base from the current (possibly mid-animation) pose: cancelling
        // an in-flight transition must not jump.
        self.flight = Some(Flight {
            from: self.pose,
            from_zoom: self.zoom,
            to,
            to_zoom,
            elapsed: 0.0,
            duration,
        });
        self.grace = 0.0;
    }

    // =========================================================================
    // FRAME ADVANCE
    // =========================================================================

    /// Advance by a wall-clock delta (seconds). Returns a completion event
    /// on the frame a transition finishes.
    pub fn tick(&mut self, dt: f32) -> Option<TransitionEvent> {
        let dt = dt.max(0.0);

        let Some(flight) = self.flight.as_mut() else {
            self.grace = (self.grace - dt).max(0.0);
            return None;
        };

        flight.elapsed += dt;
        if flight.elapsed >= flight.duration {
            // Finalize exactly - no interpolation residue.
            self.pose = flight.to;
            self.zoom = flight.to_zoom;
            self.flight = None;

            let kind = match self.state {
                TransitionState::ToTarget(_) => TransitionKind::Focus,
                TransitionState::ToPrevious => {
                    self.snapshot = None;
                    TransitionKind::Return
                }
                TransitionState::ToReset => {
                    self.grace = self.cfg.reset_grace_secs;
                    TransitionKind::Reset
                }
                // A flight without a state would be a controller bug; treat
                // it as a focus completion rather than panicking mid-frame.
                TransitionState::Idle => TransitionKind::Focus,
            };
            self.state = TransitionState::Idle;
            debug!(?kind, "camera transition complete");
            return Some(TransitionEvent::Completed(kind));
        }

        let t = ease_in_out_cubic(flight.elapsed / flight.duration);
        self.pose.position = flight.from.position.lerp(flight.to.position, t);
        self.pose.look_at = flight.from.look_at.lerp(flight.to.look_at, t);
        self.zoom = flight.from_zoom + (flight.to_zoom - flight.from_zoom) * t;
        None
    }
}

/// Ease-in-out cubic over normalized time.
fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    fn pose(px: f32, py: f32, pz: f32) -> CameraPose {
        CameraPose::new(Vec3::new(px, py, pz), Vec3::ZERO)
    }

    fn controller() -> TransitionController {
        TransitionController::new(pose(0.0, 50.0, 100.0), TransitionSettings::default())
    }

    /// Run ticks until idle, returning the last event.
    fn run_to_completion(c: &mut TransitionController) -> Option<TransitionEvent> {
        let mut last = None;
        for _ in 0..600 {
            if let Some(ev) = c.tick(1.0 / 60.0) {
                last = Some(ev);
            }
            if !c.in_transition() {
                break;
            }
        }
        last
    }

    #[test]
    fn test_focus_completes_exactly_on_target() {
        let mut c = controller();
        let target = pose(10.0, 2.0, -4.0);
        assert!(c.request_focus("cmp-a", target));
        assert!(c.in_transition());

        let ev = run_to_completion(&mut c);
        assert_eq!(ev, Some(TransitionEvent::Completed(TransitionKind::Focus)));
        assert_eq!(*c.pose(), target, "completion must snap exactly");
        assert_eq!(*c.state(), TransitionState::Idle);
    }

    #[test]
    fn test_same_target_request_is_idempotent() {
        let mut c = controller();
        c.request_focus("cmp-a", pose(10.0, 0.0, 0.0));
        c.tick(0.2);
        let elapsed_before = c.flight.as_ref().unwrap().elapsed;
        let pose_before = *c.pose();

        assert!(!c.request_focus("cmp-a", pose(10.0, 0.0, 0.0)));
        assert_eq!(c.flight.as_ref().unwrap().elapsed, elapsed_before, "no new start time");
        assert_eq!(*c.pose(), pose_before);
        assert_eq!(*c.state(), TransitionState::ToTarget("cmp-a".into()));
    }

    #[test]
    fn test_retarget_mid_flight_ends_at_new_target() {
        let mut c = controller();
        let a = pose(10.0, 0.0, 0.0);
        let b = pose(-8.0, 3.0, 6.0);

        c.request_focus("cmp-a", a);
        c.tick(0.3);
        let mid = *c.pose();
        assert!(c.request_focus("cmp-b", b), "different target restarts");

        // Re-based, not jumped: the new flight starts where the old one was.
        assert_eq!(c.flight.as_ref().unwrap().from, mid);

        let ev = run_to_completion(&mut c);
        assert_eq!(ev, Some(TransitionEvent::Completed(TransitionKind::Focus)));
        assert_eq!(*c.pose(), b, "must end at B exactly, not a blend");
    }

    #[test]
    fn test_snapshot_survives_target_hops_and_restores() {
        let mut c = controller();
        let overview = *c.pose();

        c.request_focus("cmp-a", pose(10.0, 0.0, 0.0));
        c.tick(0.3);
        c.request_focus("cmp-b", pose(-8.0, 3.0, 6.0));
        run_to_completion(&mut c);
        assert!(c.snapshot_pending(), "hop must not clear or overwrite the snapshot");

        assert!(c.request_return());
        let ev = run_to_completion(&mut c);
        assert_eq!(ev, Some(TransitionEvent::Completed(TransitionKind::Return)));
        assert_eq!(*c.pose(), overview, "return restores the pre-focus pose");
        assert!(!c.snapshot_pending(), "snapshot cleared on completion");
    }

    #[test]
    fn test_return_without_snapshot_is_noop() {
        let mut c = controller();
        assert!(!c.request_return());
        assert_eq!(*c.state(), TransitionState::Idle);
    }

    #[test]
    fn test_return_honored_mid_focus() {
        let mut c = controller();
        let overview = *c.pose();
        c.request_focus("cmp-a", pose(10.0, 0.0, 0.0));
        c.tick(0.2);

        assert!(c.request_return(), "deselect while flying in returns");
        run_to_completion(&mut c);
        assert_eq!(*c.pose(), overview);
    }

    #[test]
    fn test_reset_wins_mid_flight() {
        let mut c = controller();
        let home = c.home;
        c.request_focus("cmp-a", pose(10.0, 0.0, 0.0));
        c.tick(0.2);

        assert!(c.request_reset());
        assert_eq!(*c.state(), TransitionState::ToReset);
        assert!(!c.snapshot_pending(), "reset drops the pending snapshot");

        let ev = run_to_completion(&mut c);
        assert_eq!(ev, Some(TransitionEvent::Completed(TransitionKind::Reset)));
        assert_eq!(*c.pose(), home);
        assert_eq!(c.zoom(), 0.0);
        assert_eq!(*c.state(), TransitionState::Idle);
    }

    #[test]
    fn test_focus_ignored_while_resetting() {
        let mut c = controller();
        c.request_reset();
        c.tick(0.1);
        assert!(!c.request_focus("cmp-a", pose(10.0, 0.0, 0.0)));
        assert_eq!(*c.state(), TransitionState::ToReset);
    }

    #[test]
    fn test_reset_grace_window() {
        let mut c = controller();
        c.request_reset();
        run_to_completion(&mut c);
        assert!(c.skip_reconcile(), "grace window opens on reset completion");

        // Grace only counts down while idle, and expires.
        let grace = TransitionSettings::default().reset_grace_secs;
        let mut remaining = grace;
        while remaining > 0.0 {
            c.tick(1.0 / 60.0);
            remaining -= 1.0 / 60.0;
        }
        c.tick(1.0 / 60.0);
        assert!(!c.skip_reconcile());
    }

    #[test]
    fn test_zoom_restored_by_return() {
        let mut c = controller();
        c.zoom = 1.5; // renderer had zoomed before the first focus
        c.request_focus("cmp-a", pose(10.0, 0.0, 0.0));
        run_to_completion(&mut c);
        assert_eq!(c.zoom(), 1.5, "focus leaves zoom untouched");

        c.request_return();
        run_to_completion(&mut c);
        assert_eq!(c.zoom(), 1.5);
    }

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        // Slow start: well below linear at the first quarter.
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }
}

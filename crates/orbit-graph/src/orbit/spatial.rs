//! Spatial index for selection hit testing
//!
//! R-tree (via `rstar`) over resolved body positions, so hosts translating
//! pointer rays into selection events get O(log n) lookups instead of a
//! linear scan over the portfolio. Rebuilt on every re-layout; positions are
//! stable between layouts so there is no per-frame maintenance.

use glam::Vec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Spatial index entry for one orbiting body.
#[derive(Debug, Clone)]
pub struct SpatialBody {
    pub id: String,
    /// Axis-aligned bounding box around the rendered sphere
    bounds: AABB<[f32; 3]>,
    pub center: [f32; 3],
    /// Rendered body radius
    pub radius: f32,
}

impl SpatialBody {
    pub fn new(id: impl Into<String>, center: Vec3, radius: f32) -> Self {
        let center = center.to_array();
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius, center[2] - radius],
            [center[0] + radius, center[1] + radius, center[2] + radius],
        );
        Self {
            id: id.into(),
            bounds,
            center,
            radius,
        }
    }
}

impl RTreeObject for SpatialBody {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialBody {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        // Squared distance to the sphere surface, zero inside it
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        let dz = point[2] - self.center[2];
        let dist_to_center = (dx * dx + dy * dy + dz * dz).sqrt();
        let dist_to_surface = (dist_to_center - self.radius).max(0.0);
        dist_to_surface * dist_to_surface
    }

    fn contains_point(&self, point: &[f32; 3]) -> bool {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        let dz = point[2] - self.center[2];
        dx * dx + dy * dy + dz * dz <= self.radius * self.radius
    }
}

/// Pick index over the current layout.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialBody>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the bodies of a fresh layout.
    pub fn rebuild(&mut self, bodies: Vec<SpatialBody>) {
        self.tree = RTree::bulk_load(bodies);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Closest body to a world point, if its surface lies within
    /// `max_distance`.
    pub fn pick(&self, point: Vec3, max_distance: f32) -> Option<&SpatialBody> {
        let p = point.to_array();
        self.tree
            .nearest_neighbor(&p)
            .filter(|body| body.distance_2(&p) <= max_distance * max_distance)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> SpatialIndex {
        let mut idx = SpatialIndex::new();
        idx.rebuild(vec![
            SpatialBody::new("cmp-a", Vec3::new(30.0, 0.0, 0.0), 2.0),
            SpatialBody::new("cmp-b", Vec3::new(-30.0, 0.0, 0.0), 1.0),
            SpatialBody::new("cmp-c", Vec3::new(0.0, 0.0, 25.0), 1.5),
        ]);
        idx
    }

    #[test]
    fn test_pick_nearest_within_threshold() {
        let idx = index();
        let hit = idx.pick(Vec3::new(29.0, 0.5, 0.0), 1.0).unwrap();
        assert_eq!(hit.id, "cmp-a");
    }

    #[test]
    fn test_pick_inside_body_is_distance_zero() {
        let idx = index();
        let hit = idx.pick(Vec3::new(-30.2, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(hit.id, "cmp-b");
    }

    #[test]
    fn test_pick_misses_outside_threshold() {
        let idx = index();
        assert!(idx.pick(Vec3::new(0.0, 60.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut idx = index();
        assert_eq!(idx.len(), 3);
        idx.rebuild(vec![SpatialBody::new("cmp-z", Vec3::ZERO, 1.0)]);
        assert_eq!(idx.len(), 1);
        assert!(idx.pick(Vec3::ZERO, 0.5).is_some());
        idx.clear();
        assert!(idx.is_empty());
    }
}

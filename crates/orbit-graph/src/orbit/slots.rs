//! Angular slot assignment
//!
//! Places the members of one ring at evenly spaced angles while keeping
//! every slot clear of the 0°/180° axes, where tilted orbital planes cross
//! the flat reference plane and bodies from different rings visually pile
//! up.
//!
//! All placement inputs are hashes of stable strings - no PRNG, no clock -
//! so the same ring membership reproduces bit-identical angles across runs
//! and platforms. The axis-avoidance search scores a bounded set of
//! candidate base offsets and keeps the best; it is an optimization pass,
//! not a guarantee, and any slot still inside a forbidden arc afterwards is
//! nudged to the nearest boundary.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use tracing::{debug, trace};

use crate::config::LayoutSettings;

/// Golden angle in radians. Successive progress bands offset their base
/// angle by multiples of this so bands never align radially.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Number of percent-complete buckets in the band grouping.
pub const PROGRESS_BANDS: usize = 5;

/// Minimum separation treated as "the same final angle".
const ANGLE_COLLISION_EPS: f32 = 1e-5;

/// Separation applied when the uniqueness backstop has to split two slots.
const ANGLE_SEPARATION_STEP: f32 = 8e-4;

// ============================================================================
// DETERMINISTIC HASHING
// ============================================================================

/// FNV-1a over UTF-8 bytes.
///
/// Spelled out rather than taken from `std::hash` so the constant offsets it
/// produces are stable across Rust versions and platforms.
fn fnv1a(key: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in key.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Hash a key to a value in [0, 1).
pub fn hash_unit(key: &str) -> f64 {
    // Top 53 bits so the fraction is exactly representable in an f64.
    (fnv1a(key) >> 11) as f64 / (1u64 << 53) as f64
}

// ============================================================================
// ANGLE HELPERS
// ============================================================================

/// Normalize an angle into [0, 2π).
fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can return TAU itself when the input is a tiny negative.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Shortest angular distance between two angles.
fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (normalize_angle(a) - normalize_angle(b)).abs();
    d.min(TAU - d)
}

/// Distance from an angle to the nearer of the 0° and 180° axes.
fn axis_distance(angle: f32) -> f32 {
    angular_distance(angle, 0.0).min(angular_distance(angle, PI))
}

/// Push an angle inside a forbidden arc out to the nearest boundary.
fn nudge_clear_of_axes(angle: f32, forbidden: f32) -> f32 {
    let a = normalize_angle(angle);
    let axis = if angular_distance(a, 0.0) <= angular_distance(a, PI) {
        0.0
    } else {
        PI
    };

    // Signed offset from the axis in (-π, π]; its sign picks the exit side.
    let mut delta = a - axis;
    if delta > PI {
        delta -= TAU;
    } else if delta <= -PI {
        delta += TAU;
    }

    let cleared = if delta >= 0.0 {
        axis + forbidden + ANGLE_COLLISION_EPS
    } else {
        axis - forbidden - ANGLE_COLLISION_EPS
    };
    normalize_angle(cleared)
}

// ============================================================================
// SLOT ASSIGNMENT
// ============================================================================

/// Assign angles to the members of a lifecycle ring.
///
/// `ids` must already be in the ring's canonical (lexicographic) order; the
/// slot lattice is anchored to that order.
pub fn assign_ring(ring_key: &str, ids: &[String], cfg: &LayoutSettings) -> HashMap<String, f32> {
    assign_inner(hash_unit(ring_key), ring_key, ids, cfg)
}

/// Assign angles to the members of a progress band.
///
/// Bands derive their base offset from a golden-angle multiple of the band
/// index instead of a membership hash, so adjacent bands never line up
/// radially even when they hold similar entity counts.
pub fn assign_band(band: usize, ids: &[String], cfg: &LayoutSettings) -> HashMap<String, f32> {
    let seed = ((band as f64) * (GOLDEN_ANGLE as f64) / (TAU as f64)).fract();
    assign_inner(seed, &format!("band-{band}"), ids, cfg)
}

/// Bucket a completion fraction into a band index.
pub fn band_index(percent_complete: f32) -> usize {
    let p = percent_complete.clamp(0.0, 1.0);
    ((p * PROGRESS_BANDS as f32) as usize).min(PROGRESS_BANDS - 1)
}

fn assign_inner(
    seed: f64,
    group_key: &str,
    ids: &[String],
    cfg: &LayoutSettings,
) -> HashMap<String, f32> {
    if ids.is_empty() {
        return HashMap::new();
    }

    let forbidden = cfg.forbidden_arc_deg.to_radians();
    let mut assigned = HashMap::with_capacity(ids.len());

    // Overrides bypass spacing, jitter, and the search entirely. Overrides
    // naming entities outside this group are simply not ours to place.
    let mut lattice_ids: Vec<&String> = Vec::with_capacity(ids.len());
    for id in ids {
        match cfg.slot_overrides.iter().find(|o| &o.id == id) {
            Some(o) => {
                assigned.insert(id.clone(), normalize_angle(o.degrees.to_radians()));
            }
            None => lattice_ids.push(id),
        }
    }

    if lattice_ids.is_empty() {
        return assigned;
    }

    let n = lattice_ids.len();
    let step = TAU / n as f32;

    // Per-entity jitter, fixed before the search so candidates are scored
    // against the angles the ring will actually use.
    let jitters: Vec<f32> = lattice_ids
        .iter()
        .map(|id| ((hash_unit(id) - 0.5) as f32) * cfg.jitter_frac * step)
        .collect();

    // Score a bounded set of deterministic base offsets; keep the one whose
    // worst slot sits furthest from the axes.
    let candidates = cfg.offset_candidates.max(1);
    let mut best_base = 0.0_f32;
    let mut best_score = f32::MIN;
    for k in 0..candidates {
        let fraction = (seed + k as f64 / candidates as f64).fract();
        let base = fraction as f32 * step;
        let score = (0..n)
            .map(|i| axis_distance(base + i as f32 * step + jitters[i]))
            .fold(f32::MAX, f32::min);
        if score > best_score {
            best_score = score;
            best_base = base;
        }
    }
    trace!(
        group = group_key,
        members = n,
        score_deg = best_score.to_degrees(),
        "slot base offset chosen"
    );

    // Best effort is not a guarantee: clear any residual violators slot by
    // slot, then make sure no two slots collapsed onto the same angle.
    let mut used: Vec<f32> = assigned.values().copied().collect();
    let mut nudged = 0usize;
    for (i, id) in lattice_ids.iter().enumerate() {
        let raw = normalize_angle(best_base + i as f32 * step + jitters[i]);
        let mut angle = if axis_distance(raw) < forbidden {
            nudged += 1;
            nudge_clear_of_axes(raw, forbidden)
        } else {
            raw
        };

        // Uniqueness backstop. Walking away from the nearest axis means the
        // separation step can never re-enter the arc a nudge just left.
        let mut guard = 0;
        while guard < 64
            && used
                .iter()
                .any(|u| angular_distance(*u, angle) < ANGLE_COLLISION_EPS)
        {
            let axis = if angular_distance(angle, 0.0) <= angular_distance(angle, PI) {
                0.0
            } else {
                PI
            };
            let mut delta = angle - axis;
            if delta > PI {
                delta -= TAU;
            } else if delta <= -PI {
                delta += TAU;
            }
            let dir = if delta >= 0.0 { 1.0 } else { -1.0 };
            angle = normalize_angle(angle + dir * ANGLE_SEPARATION_STEP);
            guard += 1;
        }

        used.push(angle);
        assigned.insert((*id).clone(), angle);
    }

    if nudged > 0 {
        debug!(group = group_key, nudged, "slots nudged clear of axis arcs");
    }
    assigned
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn default_cfg() -> LayoutSettings {
        LayoutSettings::default()
    }

    #[test]
    fn test_hash_unit_is_stable_and_bounded() {
        // Anchors the documented FNV-1a constants: if either changes, every
        // saved layout in the field changes with it.
        let h = hash_unit("cmp-q3-search");
        assert_eq!(h, hash_unit("cmp-q3-search"));
        assert!((0.0..1.0).contains(&h));
        assert_ne!(hash_unit("a"), hash_unit("b"));
    }

    #[test]
    fn test_empty_ring_is_a_no_op() {
        let out = assign_ring("active", &[], &default_cfg());
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_entity_is_axis_avoided() {
        let cfg = default_cfg();
        let out = assign_ring("closing", &ids(&["cmp-solo"]), &cfg);
        assert_eq!(out.len(), 1);
        let angle = out["cmp-solo"];
        assert!((0.0..TAU).contains(&angle));
        assert!(axis_distance(angle) >= cfg.forbidden_arc_deg.to_radians());
    }

    #[test]
    fn test_angles_distinct_and_clear_of_axes() {
        let cfg = default_cfg();
        for n in [2usize, 3, 7, 12, 24] {
            let members: Vec<String> = (0..n).map(|i| format!("cmp-{i:03}")).collect();
            let out = assign_ring("active", &members, &cfg);
            assert_eq!(out.len(), n);

            let angles: Vec<f32> = members.iter().map(|id| out[id]).collect();
            for (i, a) in angles.iter().enumerate() {
                assert!((0.0..TAU).contains(a));
                assert!(
                    axis_distance(*a) >= cfg.forbidden_arc_deg.to_radians() - 1e-6,
                    "ring of {n}: slot {i} at {:.2}° sits in a forbidden arc",
                    a.to_degrees()
                );
                for b in &angles[i + 1..] {
                    assert!(
                        angular_distance(*a, *b) > ANGLE_COLLISION_EPS,
                        "ring of {n}: duplicate final angle"
                    );
                }
            }
        }
    }

    #[test]
    fn test_crowded_ring_still_clears_axes() {
        // 72 members means a 5° step - the search alone cannot keep every
        // slot clear, so this exercises the per-slot nudge path.
        let cfg = default_cfg();
        let members: Vec<String> = (0..72).map(|i| format!("cmp-{i:03}")).collect();
        let out = assign_ring("active", &members, &cfg);
        assert_eq!(out.len(), 72);
        for (id, angle) in &out {
            assert!(
                axis_distance(*angle) >= cfg.forbidden_arc_deg.to_radians() - 1e-6,
                "{id} at {:.3}° inside a forbidden arc",
                angle.to_degrees()
            );
        }
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let cfg = default_cfg();
        let members: Vec<String> = (0..9).map(|i| format!("cmp-{i}")).collect();
        let first = assign_ring("planning", &members, &cfg);
        let second = assign_ring("planning", &members, &cfg);
        for id in &members {
            assert_eq!(first[id].to_bits(), second[id].to_bits(), "{id} moved between runs");
        }
    }

    #[test]
    fn test_different_rings_differ() {
        let cfg = default_cfg();
        let members = ids(&["cmp-a", "cmp-b", "cmp-c"]);
        let active = assign_ring("active", &members, &cfg);
        let closing = assign_ring("closing", &members, &cfg);
        assert!(
            members.iter().any(|id| active[id] != closing[id]),
            "ring key must contribute to the base offset"
        );
    }

    #[test]
    fn test_override_takes_precedence_and_is_exempt() {
        let mut cfg = default_cfg();
        // Pin an entity directly onto the 0° axis - an override is exempt
        // from the collision search, so it must stay there.
        cfg.slot_overrides.push(crate::config::SlotOverride {
            id: "cmp-incident".into(),
            degrees: 0.0,
        });

        let members = ids(&["cmp-a", "cmp-b", "cmp-incident"]);
        let out = assign_ring("active", &members, &cfg);
        assert_eq!(out["cmp-incident"], 0.0);

        // The other two are spaced over the non-overridden count: near-opposite,
        // give or take jitter and axis nudges.
        let spacing = angular_distance(out["cmp-a"], out["cmp-b"]);
        assert!(spacing > PI * 0.7, "expected ~π separation, got {spacing}");
    }

    #[test]
    fn test_override_for_absent_entity_is_ignored() {
        let mut cfg = default_cfg();
        cfg.slot_overrides.push(crate::config::SlotOverride {
            id: "cmp-retired".into(),
            degrees: 45.0,
        });
        let out = assign_ring("active", &ids(&["cmp-a"]), &cfg);
        assert!(!out.contains_key("cmp-retired"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_band_index_buckets() {
        assert_eq!(band_index(0.0), 0);
        assert_eq!(band_index(0.19), 0);
        assert_eq!(band_index(0.2), 1);
        assert_eq!(band_index(0.55), 2);
        assert_eq!(band_index(1.0), PROGRESS_BANDS - 1);
        assert_eq!(band_index(7.0), PROGRESS_BANDS - 1);
        assert_eq!(band_index(-1.0), 0);
    }

    #[test]
    fn test_bands_do_not_align() {
        let cfg = default_cfg();
        let members = ids(&["cmp-a", "cmp-b", "cmp-c", "cmp-d"]);
        let mut firsts = Vec::new();
        for band in 0..PROGRESS_BANDS {
            let out = assign_band(band, &members, &cfg);
            firsts.push(out["cmp-a"]);
        }
        for i in 0..firsts.len() {
            for j in i + 1..firsts.len() {
                assert!(
                    angular_distance(firsts[i], firsts[j]) > 1e-3,
                    "bands {i} and {j} share a base angle"
                );
            }
        }
    }

    #[test]
    fn test_nudge_moves_to_nearest_boundary() {
        let forbidden = 5.0_f32.to_radians();
        let just_past_zero = 1.0_f32.to_radians();
        let nudged = nudge_clear_of_axes(just_past_zero, forbidden);
        assert!(axis_distance(nudged) >= forbidden);
        assert!(nudged < 10.0_f32.to_radians(), "nudge must exit on the near side");

        let before_pi = PI - 0.5_f32.to_radians();
        let nudged = nudge_clear_of_axes(before_pi, forbidden);
        assert!(axis_distance(nudged) >= forbidden);
        assert!(nudged < PI, "approach side preserved");
    }
}

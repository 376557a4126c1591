//! Ring layout engine.
//!
//! Nodes are placed on circles sized so that `count` nodes of a given diameter
//! fit around the circumference without overlapping. Expanding a node pushes it
//! radially away from the root and rings its newly revealed neighbours around
//! the new position, leaving every other node where it was.

use std::f64::consts::TAU;

// ============================================================================
// Constants
// ============================================================================

/// Node diameter in graph units.
pub const NODE_DIAMETER: f64 = 55.0;

/// Node border width, added to the diameter when spacing nodes.
pub const NODE_BORDER: f64 = 2.0;

/// Footprint of a node including its border.
pub const EFFECTIVE_DIAMETER: f64 = NODE_DIAMETER + NODE_BORDER;

/// Gap kept between neighbouring nodes on a ring.
pub const NODE_GAP: f64 = 12.0;

/// Extra distance from the root gained per bump level on each expansion.
pub const EDGE_GROWTH_PER_BUMP: f64 = 800.0;

/// Minimum radius of the initial ring around the root.
pub const ROOT_RING_MIN_RADIUS: f64 = 320.0;

/// Minimum radius of the ring placed around an expanded anchor.
pub const EXPANSION_RING_MIN_RADIUS: f64 = 20.0;

// ============================================================================
// Geometry
// ============================================================================

/// A position on the graph plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin, where the root sits after a full reload.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Sizing parameters for a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    /// Smallest radius the ring may have.
    pub min_radius: f64,
    /// Footprint of each node.
    pub node_diameter: f64,
    /// Spacing between neighbouring nodes.
    pub gap: f64,
    /// Maximum random offset applied on each axis (0 disables jitter).
    pub jitter: f64,
}

impl Default for RingSpec {
    fn default() -> Self {
        Self {
            min_radius: 240.0,
            node_diameter: EFFECTIVE_DIAMETER,
            gap: NODE_GAP,
            jitter: 0.0,
        }
    }
}

impl RingSpec {
    /// Default spacing with the given minimum radius.
    #[must_use]
    pub fn with_min_radius(min_radius: f64) -> Self {
        Self {
            min_radius,
            ..Self::default()
        }
    }
}

/// Positions produced by [`place_ring`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingPlacement {
    /// Placed ids in input order.
    pub positions: Vec<(String, Point)>,
    /// Radius of the ring.
    pub radius: f64,
}

// ============================================================================
// Layout Operations
// ============================================================================

/// Radius needed so `count` nodes fit around the circumference.
///
/// Never smaller than `min_radius`; rings of zero or one node use `min_radius`.
#[must_use]
pub fn required_radius(count: usize, node_diameter: f64, gap: f64, min_radius: f64) -> f64 {
    if count <= 1 {
        return min_radius;
    }
    let needed = count as f64 * (node_diameter + gap) / TAU;
    needed.max(min_radius)
}

/// Distributes `ids` evenly by angle around `center`, in array order.
#[must_use]
pub fn place_ring(center: Point, ids: &[String], spec: RingSpec) -> RingPlacement {
    let n = ids.len().max(1);
    let radius = required_radius(n, spec.node_diameter, spec.gap, spec.min_radius);

    let positions = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = TAU * i as f64 / n as f64;
            let (jx, jy) = if spec.jitter > 0.0 {
                (
                    (fastrand::f64() - 0.5) * spec.jitter,
                    (fastrand::f64() - 0.5) * spec.jitter,
                )
            } else {
                (0.0, 0.0)
            };
            let point = Point::new(
                center.x + radius * angle.cos() + jx,
                center.y + radius * angle.sin() + jy,
            );
            (id.clone(), point)
        })
        .collect();

    RingPlacement { positions, radius }
}

/// New anchor position after an expansion at `bump_level`.
///
/// Extends the root-to-anchor vector by `bump_level * growth_per_bump`. An
/// anchor sitting exactly on the root is pushed along the positive x axis.
#[must_use]
pub fn expand_push(root: Point, anchor: Point, bump_level: u32, growth_per_bump: f64) -> Point {
    let distance = root.distance(anchor);
    let (ux, uy) = if distance > f64::EPSILON {
        ((anchor.x - root.x) / distance, (anchor.y - root.y) / distance)
    } else {
        (1.0, 0.0)
    };
    let new_distance = distance + f64::from(bump_level) * growth_per_bump;
    Point::new(root.x + ux * new_distance, root.y + uy * new_distance)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-6;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("0x{i:04}")).collect()
    }

    #[test]
    fn test_required_radius_bounded_and_monotonic() {
        let mut previous = 0.0;
        for n in 0..500 {
            let r = required_radius(n, EFFECTIVE_DIAMETER, NODE_GAP, ROOT_RING_MIN_RADIUS);
            assert!(r >= ROOT_RING_MIN_RADIUS, "radius {r} below min for n={n}");
            assert!(r >= previous, "radius decreased at n={n}");
            previous = r;
        }
    }

    #[test]
    fn test_required_radius_formula() {
        let r = required_radius(100, 57.0, 12.0, 20.0);
        assert!((r - 100.0 * 69.0 / TAU).abs() < TOLERANCE);
        assert_eq!(required_radius(1, 57.0, 12.0, 20.0), 20.0);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    #[case(64)]
    fn test_place_ring_equal_radius_distinct_positions(#[case] n: usize) {
        let center = Point::new(10.0, -5.0);
        let placement = place_ring(center, &ids(n), RingSpec::with_min_radius(100.0));
        assert_eq!(placement.positions.len(), n);

        for (_, p) in &placement.positions {
            assert!((p.distance(center) - placement.radius).abs() < TOLERANCE);
        }
        for (i, (_, a)) in placement.positions.iter().enumerate() {
            for (_, b) in placement.positions.iter().skip(i + 1) {
                assert!(a.distance(*b) > TOLERANCE, "overlapping positions");
            }
        }
    }

    #[test]
    fn test_place_ring_deterministic_order() {
        let placement = place_ring(Point::ORIGIN, &ids(4), RingSpec::with_min_radius(100.0));
        let first = placement.positions[0].1;
        let second = placement.positions[1].1;
        assert!((first.x - 100.0).abs() < TOLERANCE && first.y.abs() < TOLERANCE);
        assert!(second.x.abs() < TOLERANCE && (second.y - 100.0).abs() < TOLERANCE);
        assert_eq!(
            placement,
            place_ring(Point::ORIGIN, &ids(4), RingSpec::with_min_radius(100.0))
        );
    }

    #[test]
    fn test_place_ring_jitter_bounded() {
        let spec = RingSpec {
            jitter: 10.0,
            ..RingSpec::with_min_radius(100.0)
        };
        let placement = place_ring(Point::ORIGIN, &ids(8), spec);
        for (_, p) in &placement.positions {
            assert!((p.distance(Point::ORIGIN) - 100.0).abs() <= 10.0);
        }
    }

    #[test]
    fn test_expand_push_strictly_increases_distance() {
        let root = Point::new(5.0, 5.0);
        let mut anchor = Point::new(300.0, -120.0);
        let mut previous = root.distance(anchor);
        for bump in 1..=5 {
            anchor = expand_push(root, anchor, bump, EDGE_GROWTH_PER_BUMP);
            let distance = root.distance(anchor);
            assert!(distance > previous, "bump {bump} did not move outward");
            previous = distance;
        }
    }

    #[test]
    fn test_expand_push_keeps_direction() {
        let pushed = expand_push(Point::ORIGIN, Point::new(3.0, 4.0), 1, 5.0);
        assert!((pushed.x - 6.0).abs() < TOLERANCE);
        assert!((pushed.y - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_expand_push_from_root_position() {
        let pushed = expand_push(Point::ORIGIN, Point::ORIGIN, 2, 10.0);
        assert_eq!(pushed, Point::new(20.0, 0.0));
    }
}

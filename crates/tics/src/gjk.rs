//! GJK simplex search over the Minkowski difference of two meshes.
//!
//! Builds a tetrahedron of Minkowski-difference support points that
//! encloses the origin. Each support point remembers the contributing
//! point on shape A so EPA can reconstruct world-space contacts.

use glam::Vec3;

use crate::collider::MeshCollider;
use crate::transform::Transform;

/// Tolerance for every sign test in the simplex search; matches the
/// narrow phase's geometric epsilon and avoids oscillation on coplanar
/// configurations.
pub(crate) const TOLERANCE: f32 = 0.001;

/// Iteration cap shared by the triangle and tetrahedron phases.
const MAX_ITERATIONS: usize = 100;

/// A Minkowski-difference vertex tagged with its contributing point
/// on shape A.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SupportPoint {
    /// Point of the Minkowski difference `A - B`.
    pub diff: Vec3,
    /// The world-space support point on A that produced it.
    pub on_a: Vec3,
}

/// Outcome of the simplex search.
#[derive(Clone, Copy, Debug)]
pub(crate) enum GjkResult {
    /// A tetrahedron enclosing the origin; ready for EPA.
    Intersection([SupportPoint; 4]),
    /// A separating direction was found.
    Separated,
    /// The iteration cap was hit on degenerate geometry.
    IterationLimit,
}

/// Support point of the Minkowski difference `A - B` along `direction`.
pub(crate) fn minkowski_support(
    a: &MeshCollider,
    ta: &Transform,
    b: &MeshCollider,
    tb: &Transform,
    direction: Vec3,
) -> SupportPoint {
    let on_a = a.support(ta, direction);
    let on_b = b.support(tb, -direction);
    SupportPoint {
        diff: on_a - on_b,
        on_a,
    }
}

/// Decide whether two convex meshes intersect.
pub(crate) fn intersect(
    a: &MeshCollider,
    ta: &Transform,
    b: &MeshCollider,
    tb: &Transform,
) -> GjkResult {
    let support = |direction: Vec3| minkowski_support(a, ta, b, tb, direction);

    // Deterministic seed: from A's center toward B's.
    let mut direction = (tb.position() - ta.position()).normalize_or(Vec3::X);
    let s0 = support(direction);

    direction = -s0.diff;
    let s1 = support(direction);
    if s1.diff.dot(direction) < TOLERANCE {
        return GjkResult::Separated;
    }

    // Perpendicular to the segment, toward the origin.
    let ab = s0.diff - s1.diff;
    let ao = -s1.diff;
    direction = ab.cross(ao).cross(ab);
    if direction.length_squared() <= f32::EPSILON {
        // Origin sits on the segment's line.
        direction = any_perpendicular(ab);
    }

    let mut iterations = 0;

    // Triangle phase: walk Voronoi regions until the origin projects
    // into a triangle's interior.
    let mut vertex_b = s1;
    let mut vertex_c = s0;
    let mut triangle;
    loop {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            return GjkResult::IterationLimit;
        }

        let vertex_a = support(direction);
        if vertex_a.diff.dot(direction) < TOLERANCE {
            return GjkResult::Separated;
        }

        let ab = vertex_b.diff - vertex_a.diff;
        let ac = vertex_c.diff - vertex_a.diff;
        let ao = -vertex_a.diff;
        let abc = ab.cross(ac);

        if ab.cross(abc).dot(ao) > TOLERANCE {
            // Origin beyond edge AB: drop C.
            direction = ab.cross(ao).cross(ab);
            vertex_c = vertex_b;
            vertex_b = vertex_a;
        } else if abc.cross(ac).dot(ao) > TOLERANCE {
            // Origin beyond edge AC: drop B.
            direction = ac.cross(ao).cross(ac);
            vertex_b = vertex_a;
        } else {
            // Interior: pick the face normal on the origin's side,
            // flipping the winding if needed.
            if abc.dot(ao) >= 0.0 {
                triangle = [vertex_a, vertex_b, vertex_c];
                direction = abc;
            } else {
                triangle = [vertex_a, vertex_c, vertex_b];
                direction = -abc;
            }
            break;
        }
    }

    // Tetrahedron phase: drive toward a fourth point that encloses the
    // origin, re-basing onto whichever face still sees it.
    loop {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            return GjkResult::IterationLimit;
        }

        let apex = support(direction);
        if apex.diff.dot(direction) < TOLERANCE {
            return GjkResult::Separated;
        }

        let mut outside = None;
        for (i, j, k) in [(0, 1, 2), (1, 2, 0), (2, 0, 1)] {
            let u = triangle[i].diff - apex.diff;
            let v = triangle[j].diff - apex.diff;
            let mut normal = u.cross(v);
            if normal.length_squared() <= f32::EPSILON {
                continue;
            }
            // Orient away from the vertex not on this face.
            if normal.dot(triangle[k].diff - apex.diff) > 0.0 {
                normal = -normal;
            }
            if normal.dot(-apex.diff) > TOLERANCE {
                outside = Some(([apex, triangle[i], triangle[j]], normal));
                break;
            }
        }

        match outside {
            Some((face, normal)) => {
                triangle = face;
                direction = normal;
            }
            None => {
                return GjkResult::Intersection([triangle[0], triangle[1], triangle[2], apex]);
            }
        }
    }
}

/// Any vector perpendicular to `v`.
fn any_perpendicular(v: Vec3) -> Vec3 {
    if v.length_squared() <= f32::EPSILON {
        return Vec3::X;
    }
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vec3::X
    } else if v.y.abs() <= v.z.abs() {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let perp = v.cross(axis);
    if perp.length_squared() <= f32::EPSILON {
        Vec3::X
    } else {
        perp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(half: f32) -> MeshCollider {
        MeshCollider::cuboid(Vec3::splat(half))
    }

    fn at(position: Vec3) -> Transform {
        Transform::from_position(position)
    }

    #[test]
    fn overlapping_cubes_intersect() {
        let mesh = cube(1.0);
        let result = intersect(&mesh, &at(Vec3::ZERO), &mesh, &at(Vec3::new(1.5, 0.0, 0.0)));
        assert!(matches!(result, GjkResult::Intersection(_)));
    }

    #[test]
    fn separated_cubes_do_not_intersect() {
        let mesh = cube(1.0);
        let result = intersect(&mesh, &at(Vec3::ZERO), &mesh, &at(Vec3::new(2.5, 0.0, 0.0)));
        assert!(matches!(result, GjkResult::Separated));
    }

    #[test]
    fn enclosing_tetrahedron_contains_the_origin() {
        let mesh = cube(1.0);
        let GjkResult::Intersection(simplex) =
            intersect(&mesh, &at(Vec3::ZERO), &mesh, &at(Vec3::new(0.5, 0.25, -0.5)))
        else {
            panic!("expected intersection");
        };

        // The origin must be on the inner side of all four faces.
        let faces = [(0, 1, 2, 3), (0, 3, 1, 2), (0, 2, 3, 1), (1, 3, 2, 0)];
        for (i, j, k, l) in faces {
            let p = simplex[i].diff;
            let mut normal = (simplex[j].diff - p).cross(simplex[k].diff - p);
            if normal.dot(simplex[l].diff - p) > 0.0 {
                normal = -normal;
            }
            assert!(
                normal.dot(-p) <= TOLERANCE,
                "origin outside face ({i},{j},{k})"
            );
        }
    }

    #[test]
    fn rotated_cubes_intersect() {
        let mesh = cube(1.0);
        let tb = Transform::from_position_rotation(
            Vec3::new(1.8, 0.0, 0.0),
            glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        );
        let result = intersect(&mesh, &at(Vec3::ZERO), &mesh, &tb);
        // Rotated 45 degrees, the second cube's corner reaches past
        // x = 1.8 - sqrt(2), well inside the first cube.
        assert!(matches!(result, GjkResult::Intersection(_)));
    }

    #[test]
    fn coincident_cubes_intersect() {
        let mesh = cube(1.0);
        let result = intersect(&mesh, &at(Vec3::ZERO), &mesh, &at(Vec3::ZERO));
        assert!(matches!(result, GjkResult::Intersection(_)));
    }

    #[test]
    fn iteration_cap_never_fires_on_a_position_sweep() {
        // The cap is a safety net; sane geometry must not reach it.
        let mesh = cube(1.0);
        let mut cap_hits = 0;
        for step in 0..60 {
            let x = step as f32 * 0.05;
            let result = intersect(&mesh, &at(Vec3::ZERO), &mesh, &at(Vec3::new(x, 0.0, 0.0)));
            if matches!(result, GjkResult::IterationLimit) {
                cap_hits += 1;
            }
        }
        assert_eq!(cap_hits, 0);
    }

    #[test]
    fn thin_boxes_overlap() {
        let thin = MeshCollider::cuboid(Vec3::new(1.0, 1.0, 0.01));
        let result = intersect(
            &thin,
            &at(Vec3::ZERO),
            &thin,
            &at(Vec3::new(0.5, 0.5, 0.0)),
        );
        assert!(matches!(result, GjkResult::Intersection(_)));
    }

    #[test]
    fn support_points_track_shape_a() {
        let mesh = cube(1.0);
        let point = minkowski_support(
            &mesh,
            &at(Vec3::ZERO),
            &mesh,
            &at(Vec3::new(1.5, 0.0, 0.0)),
            Vec3::X,
        );
        // Along +x: A contributes a +x corner, B a -x corner.
        assert!((point.on_a.x - 1.0).abs() < 1e-6);
        assert!((point.diff.x - 0.5).abs() < 1e-6);
    }
}

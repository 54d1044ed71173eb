//! Expanding polytope algorithm.
//!
//! Takes the enclosing tetrahedron produced by GJK and grows it toward
//! the Minkowski-difference boundary until the face nearest the origin
//! stops moving. That face yields the contact normal and depth; the
//! contributing points recorded on shape A yield a world-space contact.

use glam::Vec3;

use crate::collider::MeshCollider;
use crate::collision::CollisionPoints;
use crate::gjk::{self, SupportPoint, TOLERANCE};
use crate::transform::Transform;

const MAX_ITERATIONS: usize = 100;

/// Recover contact data from a GJK tetrahedron enclosing the origin.
pub(crate) fn contact(
    simplex: [SupportPoint; 4],
    a: &MeshCollider,
    ta: &Transform,
    b: &MeshCollider,
    tb: &Transform,
) -> CollisionPoints {
    let mut polytope: Vec<SupportPoint> = simplex.to_vec();
    let mut faces: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

    for _ in 0..MAX_ITERATIONS {
        let Some((face, normal, distance)) = closest_face(&polytope, &faces) else {
            return CollisionPoints::none();
        };

        let support = gjk::minkowski_support(a, ta, b, tb, normal);
        if support.diff.dot(normal) - distance < TOLERANCE {
            // The polytope cannot grow past this face: it lies on the
            // Minkowski boundary.
            return face_contact(&polytope, face, normal, distance);
        }

        expand(&mut polytope, &mut faces, support);
    }

    tracing::warn!("EPA hit its iteration cap, using the best face found");
    match closest_face(&polytope, &faces) {
        Some((face, normal, distance)) => face_contact(&polytope, face, normal, distance),
        None => CollisionPoints::none(),
    }
}

/// The face nearest the origin, with its outward unit normal and
/// distance. Degenerate faces are ignored.
fn closest_face(polytope: &[SupportPoint], faces: &[[usize; 3]]) -> Option<([usize; 3], Vec3, f32)> {
    let mut best: Option<([usize; 3], Vec3, f32)> = None;
    for &face in faces {
        let p0 = polytope[face[0]].diff;
        let p1 = polytope[face[1]].diff;
        let p2 = polytope[face[2]].diff;

        let normal = (p1 - p0).cross(p2 - p0);
        let length = normal.length();
        if length <= f32::EPSILON {
            continue;
        }
        let mut normal = normal / length;
        let mut distance = normal.dot(p0);
        if distance < 0.0 {
            normal = -normal;
            distance = -distance;
        }

        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((face, normal, distance));
        }
    }
    best
}

/// Grow the polytope toward a new support point: remove every face that
/// sees it, keep the silhouette edges, and fan new faces from them.
fn expand(polytope: &mut Vec<SupportPoint>, faces: &mut Vec<[usize; 3]>, point: SupportPoint) {
    let new_index = polytope.len();

    let mut horizon: Vec<[usize; 2]> = Vec::new();
    let mut i = 0;
    while i < faces.len() {
        let [i0, i1, i2] = faces[i];
        let p0 = polytope[i0].diff;
        let p1 = polytope[i1].diff;
        let p2 = polytope[i2].diff;

        let mut normal = (p1 - p0).cross(p2 - p0);
        if normal.dot(p0) < 0.0 {
            normal = -normal;
        }

        if normal.dot(point.diff - p0) > 0.0 {
            add_edge(&mut horizon, i0, i1);
            add_edge(&mut horizon, i1, i2);
            add_edge(&mut horizon, i2, i0);
            faces.swap_remove(i);
        } else {
            i += 1;
        }
    }

    polytope.push(point);
    for [e0, e1] in horizon {
        faces.push([e0, e1, new_index]);
    }
}

/// Record an edge, cancelling against its reverse so only silhouette
/// edges survive.
fn add_edge(edges: &mut Vec<[usize; 2]>, a: usize, b: usize) {
    if let Some(found) = edges.iter().position(|&[x, y]| x == b && y == a) {
        edges.swap_remove(found);
    } else {
        edges.push([a, b]);
    }
}

/// Build collision points from the converged face.
fn face_contact(
    polytope: &[SupportPoint],
    face: [usize; 3],
    normal: Vec3,
    distance: f32,
) -> CollisionPoints {
    let p0 = polytope[face[0]];
    let p1 = polytope[face[1]];
    let p2 = polytope[face[2]];

    // Closest point to the origin on the face, as barycentric weights.
    let closest = normal * distance;
    let (u, v, w) = barycentric(closest, p0.diff, p1.diff, p2.diff);

    let a = p0.on_a * u + p1.on_a * v + p2.on_a * w;
    let collision_normal = -normal;
    let b = a + collision_normal * distance;

    CollisionPoints {
        a,
        b,
        normal: collision_normal,
        depth: distance,
        has_collision: true,
    }
}

/// Barycentric weights of `p` on triangle `(a, b, c)` as ratios of the
/// three sub-triangle areas.
fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
    let total = (b - a).cross(c - a).length();
    if total <= f32::EPSILON {
        return (1.0, 0.0, 0.0);
    }
    let u = (b - p).cross(c - p).length() / total;
    let v = (c - p).cross(a - p).length() / total;
    let w = (a - p).cross(b - p).length() / total;
    (u, v, w)
}

//! Narrow-phase collision tests.
//!
//! One entry point, [`collision_test`], dispatches on the ordered pair
//! of collider kinds. Implemented pairs are sphere/sphere, sphere/plane
//! and mesh/mesh; every other pairing reports no contact. Inputs whose
//! kinds arrive in the wrong order are swapped before the test and the
//! resulting contact is flipped back.

use glam::Vec3;

use crate::body::BodyId;
use crate::collider::{Collider, MeshCollider};
use crate::transform::Transform;
use crate::{epa, gjk};

/// Result of a narrow-phase test.
///
/// `a` is the deepest point of shape A inside shape B, `b` the deepest
/// point of B inside A, and `normal` points from B toward A.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionPoints {
    /// Deepest point of A inside B.
    pub a: Vec3,
    /// Deepest point of B inside A.
    pub b: Vec3,
    /// Unit contact normal, pointing from B toward A.
    pub normal: Vec3,
    /// Penetration depth, `|a - b|`.
    pub depth: f32,
    /// Whether the shapes touch at all.
    pub has_collision: bool,
}

impl CollisionPoints {
    /// The "no contact" result.
    pub fn none() -> Self {
        Self {
            a: Vec3::ZERO,
            b: Vec3::ZERO,
            normal: Vec3::Y,
            depth: 0.0,
            has_collision: false,
        }
    }

    /// Swap the roles of A and B: exchanges the contact points and
    /// negates the normal.
    pub fn flipped(mut self) -> Self {
        std::mem::swap(&mut self.a, &mut self.b);
        self.normal = -self.normal;
        self
    }
}

impl Default for CollisionPoints {
    fn default() -> Self {
        Self::none()
    }
}

/// A detected collision between two world objects.
#[derive(Clone, Copy, Debug)]
pub struct Collision {
    /// First object.
    pub a: BodyId,
    /// Second object.
    pub b: BodyId,
    /// Contact data, with `a`/`b` matching the object order.
    pub points: CollisionPoints,
}

/// Test two collider/transform pairs for contact.
pub fn collision_test(
    a: &Collider,
    ta: &Transform,
    b: &Collider,
    tb: &Transform,
) -> CollisionPoints {
    // Keep the implemented pairs in canonical order; flip the result
    // back if the inputs were swapped.
    let swap = a.kind() > b.kind();
    let (a, ta, b, tb) = if swap { (b, tb, a, ta) } else { (a, ta, b, tb) };

    let points = match (a, b) {
        (
            Collider::Sphere {
                center: a_center,
                radius: a_radius,
            },
            Collider::Sphere {
                center: b_center,
                radius: b_radius,
            },
        ) => sphere_sphere(*a_center, *a_radius, ta, *b_center, *b_radius, tb),
        (
            Collider::Sphere { center, radius },
            Collider::Plane { normal, distance },
        ) => sphere_plane(*center, *radius, ta, *normal, *distance, tb),
        (Collider::Mesh(mesh_a), Collider::Mesh(mesh_b)) => mesh_mesh(mesh_a, ta, mesh_b, tb),
        _ => CollisionPoints::none(),
    };

    if swap {
        points.flipped()
    } else {
        points
    }
}

fn sphere_sphere(
    a_center: Vec3,
    a_radius: f32,
    ta: &Transform,
    b_center: Vec3,
    b_radius: f32,
    tb: &Transform,
) -> CollisionPoints {
    // Spheres support only uniform scales.
    debug_assert!(ta.scale.x == ta.scale.y && ta.scale.y == ta.scale.z);
    debug_assert!(tb.scale.x == tb.scale.y && tb.scale.y == tb.scale.z);

    let a_center = a_center + ta.position();
    let b_center = b_center + tb.position();
    let a_radius = ta.scale.x * a_radius;
    let b_radius = tb.scale.x * b_radius;

    let ab = b_center - a_center;
    let distance = ab.length();
    if distance > a_radius + b_radius {
        return CollisionPoints::none();
    }

    let ab_normal = ab.normalize_or(Vec3::Y);
    let a_point = a_center + ab_normal * a_radius;
    let b_point = b_center - ab_normal * b_radius;

    CollisionPoints {
        a: a_point,
        b: b_point,
        normal: -ab_normal,
        depth: (b_point - a_point).length(),
        has_collision: true,
    }
}

fn sphere_plane(
    center: Vec3,
    radius: f32,
    ta: &Transform,
    plane_normal: Vec3,
    plane_distance: f32,
    tb: &Transform,
) -> CollisionPoints {
    debug_assert!(ta.scale.x == ta.scale.y && ta.scale.y == ta.scale.z);

    let sphere_center = center + ta.position();
    let sphere_radius = ta.scale.x * radius;

    let point_on_plane = plane_normal * plane_distance + tb.position();

    let signed_distance = plane_normal.dot(sphere_center - point_on_plane);
    if signed_distance > sphere_radius {
        return CollisionPoints::none();
    }

    // Nearest point of the sphere toward the plane, and the center's
    // projection onto the plane.
    let a_point = sphere_center - plane_normal * sphere_radius;
    let b_point = sphere_center - plane_normal * signed_distance;

    CollisionPoints {
        a: a_point,
        b: b_point,
        normal: plane_normal,
        depth: (b_point - a_point).length(),
        has_collision: true,
    }
}

fn mesh_mesh(
    a: &MeshCollider,
    ta: &Transform,
    b: &MeshCollider,
    tb: &Transform,
) -> CollisionPoints {
    match gjk::intersect(a, ta, b, tb) {
        gjk::GjkResult::Intersection(simplex) => epa::contact(simplex, a, ta, b, tb),
        gjk::GjkResult::Separated => CollisionPoints::none(),
        gjk::GjkResult::IterationLimit => {
            tracing::warn!("GJK hit its iteration cap, reporting no collision");
            CollisionPoints::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(position: Vec3) -> Transform {
        Transform::from_position(position)
    }

    #[test]
    fn separated_spheres_do_not_collide() {
        let sphere = Collider::sphere(1.0);
        let points = collision_test(
            &sphere,
            &at(Vec3::ZERO),
            &sphere,
            &at(Vec3::new(2.5, 0.0, 0.0)),
        );
        assert!(!points.has_collision);
    }

    #[test]
    fn sphere_sphere_closed_form() {
        // Radii 1 + 1 at distance 1.5: depth must be 0.5.
        let sphere = Collider::sphere(1.0);
        let points = collision_test(
            &sphere,
            &at(Vec3::ZERO),
            &sphere,
            &at(Vec3::new(1.5, 0.0, 0.0)),
        );
        assert!(points.has_collision);
        assert!((points.depth - 0.5).abs() < 1e-5);
        assert!(points.normal.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-5));
        assert!(points.a.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        assert!(points.b.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn sphere_sphere_touch_threshold() {
        let sphere = Collider::sphere(1.0);
        let touching = collision_test(
            &sphere,
            &at(Vec3::ZERO),
            &sphere,
            &at(Vec3::new(2.0, 0.0, 0.0)),
        );
        assert!(touching.has_collision);
        assert!(touching.depth < 1e-5);

        let apart = collision_test(
            &sphere,
            &at(Vec3::ZERO),
            &sphere,
            &at(Vec3::new(2.0 + 1e-3, 0.0, 0.0)),
        );
        assert!(!apart.has_collision);
    }

    #[test]
    fn scaled_sphere_uses_scaled_radius() {
        let sphere = Collider::sphere(1.0);
        let mut ta = at(Vec3::ZERO);
        ta.scale = Vec3::splat(2.0);
        let points = collision_test(&sphere, &ta, &sphere, &at(Vec3::new(2.5, 0.0, 0.0)));
        assert!(points.has_collision);
        assert!((points.depth - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sphere_above_plane_rests_on_it() {
        let sphere = Collider::sphere(0.5);
        let plane = Collider::plane(Vec3::Y, 0.0);
        let points = collision_test(
            &sphere,
            &at(Vec3::new(0.0, 0.49, 0.0)),
            &plane,
            &at(Vec3::ZERO),
        );
        assert!(points.has_collision);
        assert!(points.normal.abs_diff_eq(Vec3::Y, 1e-5));
        assert!((points.depth - 0.01).abs() < 1e-5);
        assert!(points.a.abs_diff_eq(Vec3::new(0.0, -0.01, 0.0), 1e-5));
        assert!(points.b.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn sphere_clears_plane() {
        let sphere = Collider::sphere(0.5);
        let plane = Collider::plane(Vec3::Y, 0.0);
        let points = collision_test(
            &sphere,
            &at(Vec3::new(0.0, 0.51, 0.0)),
            &plane,
            &at(Vec3::ZERO),
        );
        assert!(!points.has_collision);
    }

    #[test]
    fn swapped_pair_flips_normal_and_points() {
        // Plane/sphere arrives out of order; the dispatch must swap it
        // and flip the result.
        let sphere = Collider::sphere(0.5);
        let plane = Collider::plane(Vec3::Y, 0.0);

        let forward = collision_test(
            &sphere,
            &at(Vec3::new(0.0, 0.4, 0.0)),
            &plane,
            &at(Vec3::ZERO),
        );
        let swapped = collision_test(
            &plane,
            &at(Vec3::ZERO),
            &sphere,
            &at(Vec3::new(0.0, 0.4, 0.0)),
        );

        assert!(forward.has_collision && swapped.has_collision);
        assert!((forward.depth - swapped.depth).abs() < 1e-6);
        assert!(swapped.normal.abs_diff_eq(-forward.normal, 1e-6));
        assert!(swapped.a.abs_diff_eq(forward.b, 1e-6));
        assert!(swapped.b.abs_diff_eq(forward.a, 1e-6));
    }

    #[test]
    fn unsupported_pair_reports_no_contact() {
        let plane = Collider::plane(Vec3::Y, 0.0);
        let points = collision_test(&plane, &at(Vec3::ZERO), &plane, &at(Vec3::ZERO));
        assert!(!points.has_collision);
    }

    #[test]
    fn contact_points_are_consistent_with_depth() {
        let sphere = Collider::sphere(1.0);
        let points = collision_test(
            &sphere,
            &at(Vec3::new(0.0, 0.2, 0.0)),
            &sphere,
            &at(Vec3::new(1.4, 0.0, 0.0)),
        );
        assert!(points.has_collision);
        assert!(((points.a - points.b).length() - points.depth).abs() < 1e-3);
        // The contact axis is collinear with the normal.
        let axis = (points.b - points.a).normalize();
        assert!(axis.dot(points.normal).abs() > 1.0 - 1e-3);
    }
}

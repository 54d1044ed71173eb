//! Ray vs. triangle-mesh tests, in two equivalent formulations.
//!
//! Both walk every triangle of the mesh and report hit or miss; neither
//! computes the hit location. The scalar-triple form works entirely in
//! vector algebra; the projective form meets the ray's line with the
//! three edge lines of each triangle. The two agree exactly: each
//! antiwedge is the negation of the corresponding scalar triple
//! product.

use geomath::Line3;
use glam::Vec3;

use crate::collider::{triangle_edge_lines, MeshCollider};

/// Test a ray against every triangle of a mesh using scalar triple
/// products.
pub fn raycast(mesh: &MeshCollider, origin: Vec3, direction: Vec3) -> bool {
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);

        // Translate so the ray origin is at zero.
        let a = a - origin;
        let b = b - origin;
        let c = c - origin;

        // The ray passes through the triangle when none of the edge
        // orientations is positive.
        let ab = a.cross(b).dot(direction);
        let bc = b.cross(c).dot(direction);
        let ca = c.cross(a).dot(direction);

        if !(ab > 0.0 || bc > 0.0 || ca > 0.0) {
            return true;
        }
    }
    false
}

/// Test a ray against every triangle of a mesh by meeting the ray's
/// line with each triangle's edge lines.
pub fn pga_raycast(mesh: &MeshCollider, origin: Vec3, direction: Vec3) -> bool {
    // The line through the ray, built once.
    let line = Line3::through_points(origin, origin + direction);

    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);

        // Work in the frame where the triangle's first vertex is the
        // origin; the edge lines may be precomputed there.
        let line = line.rebased(a);
        let edges = match &mesh.edge_lines {
            Some(lines) => lines[i],
            None => triangle_edge_lines(a, b, c),
        };

        let any_negative = line.antiwedge(&edges[0]) < 0.0
            || line.antiwedge(&edges[1]) < 0.0
            || line.antiwedge(&edges[2]) < 0.0;

        if !any_negative {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Icosahedron inscribed in the unit sphere.
    fn icosphere() -> MeshCollider {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let positions: Vec<Vec3> = [
            (-1.0, phi, 0.0),
            (1.0, phi, 0.0),
            (-1.0, -phi, 0.0),
            (1.0, -phi, 0.0),
            (0.0, -1.0, phi),
            (0.0, 1.0, phi),
            (0.0, -1.0, -phi),
            (0.0, 1.0, -phi),
            (phi, 0.0, -1.0),
            (phi, 0.0, 1.0),
            (-phi, 0.0, -1.0),
            (-phi, 0.0, 1.0),
        ]
        .into_iter()
        .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
        .collect();
        let indices = vec![
            0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
            1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
            3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
            4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
        ];
        MeshCollider::new(positions, indices).unwrap()
    }

    #[test]
    fn grazing_ray_misses_low_res_icosphere() {
        // The hull of the icosahedron stays below y = 1, so a ray at
        // that height passes clear over it.
        let mesh = icosphere();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let direction = Vec3::X;
        assert!(!raycast(&mesh, origin, direction));
        assert!(!pga_raycast(&mesh, origin, direction));
    }

    #[test]
    fn axis_ray_hits_cube() {
        let mesh = MeshCollider::cuboid(Vec3::splat(0.5));
        let origin = Vec3::new(-2.0, 0.0, 0.0);
        let direction = Vec3::X;
        assert!(raycast(&mesh, origin, direction));
        assert!(pga_raycast(&mesh, origin, direction));
    }

    #[test]
    fn ray_through_icosphere_center_hits() {
        let mesh = icosphere();
        let origin = Vec3::new(-3.0, 0.05, 0.1);
        let direction = Vec3::X;
        assert!(raycast(&mesh, origin, direction));
        assert!(pga_raycast(&mesh, origin, direction));
    }

    #[test]
    fn ray_beside_cube_misses() {
        let mesh = MeshCollider::cuboid(Vec3::splat(0.5));
        let origin = Vec3::new(-2.0, 0.8, 0.0);
        let direction = Vec3::X;
        assert!(!raycast(&mesh, origin, direction));
        assert!(!pga_raycast(&mesh, origin, direction));
    }

    #[test]
    fn formulations_agree_on_a_direction_sweep() {
        let sphere = icosphere();
        let cube = MeshCollider::cuboid(Vec3::new(0.6, 0.4, 0.8));
        let origin = Vec3::new(-2.0, 0.3, 0.15);

        // Deterministic fan of directions, hits and misses mixed in.
        for i in 0..48 {
            let t = i as f32 * 0.3;
            let direction = Vec3::new(1.0, (t.sin()) * 0.6, (t.cos()) * 0.6);
            for mesh in [&sphere, &cube] {
                assert_eq!(
                    raycast(mesh, origin, direction),
                    pga_raycast(mesh, origin, direction),
                    "disagreement at direction {direction}"
                );
            }
        }
    }

    #[test]
    fn precomputed_edge_lines_change_nothing() {
        let plain = icosphere();
        let precomputed = icosphere().with_edge_lines();

        for i in 0..32 {
            let t = i as f32 * 0.41;
            let origin = Vec3::new(t.sin() * 3.0, t.cos() * 3.0, 0.2);
            let direction = (Vec3::new(0.05, 0.1, 0.0) - origin).normalize();
            assert_eq!(
                pga_raycast(&plain, origin, direction),
                pga_raycast(&precomputed, origin, direction),
            );
        }
    }
}

//! Collision shapes.
//!
//! Three shapes exist: spheres, infinite planes, and convex triangle
//! meshes. Spheres and planes have closed-form narrow-phase tests; mesh
//! pairs go through GJK/EPA, which only needs the support function
//! defined here.

use geomath::Line3;
use glam::Vec3;
use thiserror::Error;

use crate::transform::Transform;

/// Collision shape attached to a body.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Collider {
    /// Sphere with a local center offset.
    Sphere {
        /// Center offset in the body's local space.
        center: Vec3,
        /// Radius before transform scale is applied.
        radius: f32,
    },
    /// Infinite plane defined by normal and distance from origin.
    Plane {
        /// Unit normal pointing away from the solid side.
        normal: Vec3,
        /// Distance from origin along the normal.
        distance: f32,
    },
    /// Convex triangle mesh.
    Mesh(MeshCollider),
}

/// Shape kind, ordered for narrow-phase dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColliderKind {
    /// Sphere shape.
    Sphere,
    /// Plane shape.
    Plane,
    /// Convex mesh shape.
    Mesh,
}

impl Collider {
    /// Create a sphere collider centered on its body.
    pub fn sphere(radius: f32) -> Self {
        Collider::Sphere {
            center: Vec3::ZERO,
            radius,
        }
    }

    /// Create a plane collider. The normal is normalized.
    pub fn plane(normal: Vec3, distance: f32) -> Self {
        Collider::Plane {
            normal: normal.normalize(),
            distance,
        }
    }

    /// Wrap a validated mesh.
    pub fn mesh(mesh: MeshCollider) -> Self {
        Collider::Mesh(mesh)
    }

    /// The dispatch kind of this shape.
    pub fn kind(&self) -> ColliderKind {
        match self {
            Collider::Sphere { .. } => ColliderKind::Sphere,
            Collider::Plane { .. } => ColliderKind::Plane,
            Collider::Mesh(_) => ColliderKind::Mesh,
        }
    }

    /// World-space extremum of the shape along `direction`.
    ///
    /// Planes are unbounded and have no support point.
    pub fn support(&self, transform: &Transform, direction: Vec3) -> Option<Vec3> {
        match self {
            Collider::Sphere { center, radius } => {
                let world_center = *center + transform.position();
                let radius = transform.scale.x * radius;
                Some(world_center + direction.normalize_or(Vec3::X) * radius)
            }
            Collider::Plane { .. } => None,
            Collider::Mesh(mesh) => Some(mesh.support(transform, direction)),
        }
    }
}

/// Error building a mesh collider from raw buffers.
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// The index buffer does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    /// An index points past the end of the position buffer.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// The offending index value.
        index: u32,
        /// Number of vertices in the position buffer.
        vertex_count: usize,
    },
}

/// A convex triangle mesh in local space.
///
/// The mesh must be convex and must contain its local origin; the
/// support function relies on both.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshCollider {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle index buffer, three indices per triangle.
    pub indices: Vec<u32>,
    /// Precomputed edge lines for the projective raycast, three per
    /// triangle, expressed in the frame of each triangle's first vertex.
    pub edge_lines: Option<Vec<[Line3; 3]>>,
}

impl MeshCollider {
    /// Build a mesh collider, validating the index buffer.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        for &index in &indices {
            if index as usize >= positions.len() {
                return Err(MeshError::IndexOutOfBounds {
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
        Ok(Self {
            positions,
            indices,
            edge_lines: None,
        })
    }

    /// An axis-aligned cuboid centered on the local origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let Vec3 { x, y, z } = half_extents;
        let positions = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        // Outward counter-clockwise winding.
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self {
            positions,
            indices,
            edge_lines: None,
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        [
            self.positions[self.indices[i * 3] as usize],
            self.positions[self.indices[i * 3 + 1] as usize],
            self.positions[self.indices[i * 3 + 2] as usize],
        ]
    }

    /// Precompute the per-triangle edge lines used by the projective
    /// raycast, in the frame where each triangle's first vertex is the
    /// origin.
    pub fn with_edge_lines(mut self) -> Self {
        let lines = (0..self.triangle_count())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                triangle_edge_lines(a, b, c)
            })
            .collect();
        self.edge_lines = Some(lines);
        self
    }

    /// World-space extremum of the mesh along `direction`.
    ///
    /// The direction is rotated into local space, the farthest vertex is
    /// picked, and the result is mapped back to world space. Requires
    /// the local origin to lie inside the mesh, which makes the maximum
    /// dot product non-negative.
    pub fn support(&self, transform: &Transform, direction: Vec3) -> Vec3 {
        let local_direction = transform.rotation().inverse() * direction;

        let mut best = Vec3::ZERO;
        let mut best_dot = f32::NEG_INFINITY;
        for &p in &self.positions {
            let dot = local_direction.dot(p);
            if dot > best_dot {
                best_dot = dot;
                best = p;
            }
        }
        debug_assert!(
            best_dot >= 0.0,
            "mesh collider does not contain its local origin"
        );

        transform.rotation() * best + transform.position()
    }
}

/// Edge lines of a triangle translated so `a` sits at the origin.
pub(crate) fn triangle_edge_lines(a: Vec3, b: Vec3, c: Vec3) -> [Line3; 3] {
    let b = b - a;
    let c = c - a;
    [
        Line3::through_points(Vec3::ZERO, b),
        Line3::through_points(b, c),
        Line3::through_points(c, Vec3::ZERO),
    ]
}

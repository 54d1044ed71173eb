//! Impulse-based 3D rigid body physics.
//!
//! The core pipeline per [`World::step`]: enumerate object pairs, run
//! narrow-phase collision tests, hand the collision list to a
//! registered solver chain, then integrate rigid-body motion.
//!
//! - `Collider` - sphere, plane and convex mesh shapes
//! - `CollisionObject` - static body, rigid body, or trigger area
//! - `collision_test` - narrow phase (closed forms + GJK/EPA)
//! - `raycast` / `pga_raycast` - ray vs. mesh in two formulations
//! - `Solver` - impulse response, positional separation, area triggers
//! - `World` - object arenas, solver chain, integrator
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use tics::{
//!     Collider, CollisionObject, ImpulseSolver, NonIntersectionConstraintSolver, RigidBody,
//!     StaticBody, Transform, World,
//! };
//!
//! let mut world = World::new();
//! world.add_solver(Box::<ImpulseSolver>::default());
//! world.add_solver(Box::<NonIntersectionConstraintSolver>::default());
//!
//! let ball_shape = world.add_collider(Collider::sphere(0.5));
//! let ball_pose = world.add_transform(Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
//! world.add_object(CollisionObject::Rigid(
//!     RigidBody::new(ball_shape, ball_pose).with_elasticity(0.4),
//! ));
//!
//! let ground_shape = world.add_collider(Collider::plane(Vec3::Y, 0.0));
//! let ground_pose = world.add_transform(Transform::identity());
//! world.add_object(CollisionObject::Static(StaticBody::new(ground_shape, ground_pose)));
//!
//! for _ in 0..120 {
//!     world.step(1.0 / 60.0);
//! }
//! let height = world.transform(ball_pose).unwrap().position().y;
//! assert!(height > 0.0);
//! ```

pub mod body;
pub mod collider;
pub mod collision;
mod epa;
mod gjk;
pub mod raycast;
pub mod solver;
pub mod transform;
pub mod world;

pub use body::{
    BodyId, ColliderId, CollisionArea, CollisionObject, RigidBody, StaticBody, TransformId,
};
pub use collider::{Collider, ColliderKind, MeshCollider, MeshError};
pub use collision::{collision_test, Collision, CollisionPoints};
pub use raycast::{pga_raycast, raycast};
pub use solver::{CollisionAreaSolver, ImpulseSolver, NonIntersectionConstraintSolver, Solver};
pub use transform::Transform;
pub use world::{Objects, SolverId, World};

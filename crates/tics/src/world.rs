//! Simulation container and per-tick pipeline.
//!
//! The world owns its objects, colliders and transforms in index-stable
//! arenas; hosts keep ids. Each `step`: enumerate pairs, run the narrow
//! phase, fire the collision event, run the solver chain in
//! registration order, then integrate rigid bodies.

use geomath::rotor_scale;
use glam::Vec3;
use slab::Slab;

use crate::body::{BodyId, ColliderId, CollisionObject, TransformId};
use crate::collider::Collider;
use crate::collision::{collision_test, Collision};
use crate::solver::Solver;
use crate::transform::Transform;

/// Angular velocity rotors describe the rotation over 0.1 s; this
/// converts their effect to per-second units.
pub(crate) const ANGULAR_RATE_SCALE: f32 = 10.0;

/// Per-second linear velocity decay factor.
const LINEAR_AIR_FRICTION: f32 = 0.2;

/// Per-second angular velocity decay factor.
const ANGULAR_AIR_FRICTION: f32 = 0.5;

/// Handle to a registered solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SolverId(usize);

/// Arena storage for everything the narrow phase and the solvers touch.
///
/// Kept separate from the solver list so a running solver can mutate
/// objects freely.
#[derive(Debug, Default)]
pub struct Objects {
    pub(crate) bodies: Slab<CollisionObject>,
    pub(crate) colliders: Slab<Collider>,
    pub(crate) transforms: Slab<Transform>,
}

impl Objects {
    /// Store a collider, returning its id.
    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        ColliderId(self.colliders.insert(collider))
    }

    /// Look up a collider.
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.0)
    }

    /// Look up a collider mutably.
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id.0)
    }

    /// Remove a collider. Bodies still referencing it are skipped by
    /// the narrow phase from then on.
    pub fn remove_collider(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.try_remove(id.0)
    }

    /// Store a transform, returning its id.
    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        TransformId(self.transforms.insert(transform))
    }

    /// Look up a transform.
    pub fn transform(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id.0)
    }

    /// Look up a transform mutably.
    pub fn transform_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.transforms.get_mut(id.0)
    }

    /// Remove a transform.
    pub fn remove_transform(&mut self, id: TransformId) -> Option<Transform> {
        self.transforms.try_remove(id.0)
    }

    /// Store a collision object, returning its id.
    pub fn add_body(&mut self, object: CollisionObject) -> BodyId {
        BodyId(self.bodies.insert(object))
    }

    /// Look up a collision object.
    pub fn body(&self, id: BodyId) -> Option<&CollisionObject> {
        self.bodies.get(id.0)
    }

    /// Look up a collision object mutably.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut CollisionObject> {
        self.bodies.get_mut(id.0)
    }

    /// Remove a collision object.
    pub fn remove_body(&mut self, id: BodyId) -> Option<CollisionObject> {
        self.bodies.try_remove(id.0)
    }

    /// Run the narrow phase over every unordered pair.
    ///
    /// Static/static pairs are skipped, as are pairs whose collider or
    /// transform ids have gone stale.
    pub(crate) fn detect_collisions(&self) -> Vec<Collision> {
        let mut collisions = Vec::new();
        for (index_a, object_a) in self.bodies.iter() {
            for (index_b, object_b) in self.bodies.iter() {
                if index_b >= index_a {
                    break;
                }
                if object_a.is_static() && object_b.is_static() {
                    continue;
                }

                let (Some(collider_a), Some(collider_b)) = (
                    self.colliders.get(object_a.collider().0),
                    self.colliders.get(object_b.collider().0),
                ) else {
                    continue;
                };
                let (Some(transform_a), Some(transform_b)) = (
                    self.transforms.get(object_a.transform().0),
                    self.transforms.get(object_b.transform().0),
                ) else {
                    continue;
                };

                let points = collision_test(collider_a, transform_a, collider_b, transform_b);
                if points.has_collision {
                    collisions.push(Collision {
                        a: BodyId(index_a),
                        b: BodyId(index_b),
                        points,
                    });
                }
            }
        }
        collisions
    }
}

/// The physics world.
pub struct World {
    objects: Objects,
    solvers: Vec<Option<Box<dyn Solver>>>,
    gravity: Vec3,
    collision_event: Option<Box<dyn FnMut(&Collision)>>,
}

impl World {
    /// Create an empty world with standard gravity.
    pub fn new() -> Self {
        Self {
            objects: Objects::default(),
            solvers: Vec::new(),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            collision_event: None,
        }
    }

    /// The object arenas.
    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    /// Mutable access to the object arenas.
    pub fn objects_mut(&mut self) -> &mut Objects {
        &mut self.objects
    }

    /// Add a collision object.
    pub fn add_object(&mut self, object: CollisionObject) -> BodyId {
        self.objects.add_body(object)
    }

    /// Remove a collision object. Stale ids are a silent no-op.
    pub fn remove_object(&mut self, id: BodyId) -> Option<CollisionObject> {
        self.objects.remove_body(id)
    }

    /// Store a collider.
    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        self.objects.add_collider(collider)
    }

    /// Store a transform.
    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        self.objects.add_transform(transform)
    }

    /// Look up a collision object.
    pub fn body(&self, id: BodyId) -> Option<&CollisionObject> {
        self.objects.body(id)
    }

    /// Look up a collision object mutably.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut CollisionObject> {
        self.objects.body_mut(id)
    }

    /// Look up a transform.
    pub fn transform(&self, id: TransformId) -> Option<&Transform> {
        self.objects.transform(id)
    }

    /// Look up a transform mutably.
    pub fn transform_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.objects.transform_mut(id)
    }

    /// Register a solver. Solvers run in registration order.
    pub fn add_solver(&mut self, solver: Box<dyn Solver>) -> SolverId {
        self.solvers.push(Some(solver));
        SolverId(self.solvers.len() - 1)
    }

    /// Unregister a solver. Stale ids are a silent no-op.
    pub fn remove_solver(&mut self, id: SolverId) -> Option<Box<dyn Solver>> {
        self.solvers.get_mut(id.0)?.take()
    }

    /// Set the gravity acceleration.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Current gravity acceleration.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Register a callback fired once per detected collision, before
    /// the solver chain runs.
    pub fn set_collision_event(&mut self, event: impl FnMut(&Collision) + 'static) {
        self.collision_event = Some(Box::new(event));
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        assert!(dt > 0.0, "step requires a positive dt");

        let collisions = self.objects.detect_collisions();

        if let Some(event) = &mut self.collision_event {
            for collision in &collisions {
                event(collision);
            }
        }

        for solver in self.solvers.iter_mut().flatten() {
            solver.solve(&mut self.objects, &collisions, dt);
        }

        self.integrate(dt);
    }

    /// Turn accumulated impulses and gravity into motion, apply air
    /// friction, and clear the accumulators.
    fn integrate(&mut self, dt: f32) {
        for (_, object) in self.objects.bodies.iter_mut() {
            let Some(body) = object.as_rigid_mut() else {
                continue;
            };

            body.impulse += self.gravity * (body.mass * dt * body.gravity_scale);
            body.velocity += body.impulse / body.mass;
            debug_assert!(body.velocity.is_finite());

            let angular_kick = rotor_scale(body.angular_impulse, 1.0 / body.mass);
            body.angular_velocity = angular_kick * body.angular_velocity;

            let Some(transform) = self.objects.transforms.get_mut(body.transform.0) else {
                body.clear_accumulators();
                continue;
            };
            transform.translate(body.velocity * dt);

            let spin = rotor_scale(body.angular_velocity, dt * ANGULAR_RATE_SCALE);
            transform.rotate(spin);

            body.velocity *= 1.0 - LINEAR_AIR_FRICTION * dt;
            body.angular_velocity =
                rotor_scale(body.angular_velocity, 1.0 - ANGULAR_AIR_FRICTION * dt);

            body.clear_accumulators();
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

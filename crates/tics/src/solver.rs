//! Collision solvers.
//!
//! Solvers consume the collision list produced each tick, in
//! registration order. Three are provided: the impulse solver feeds the
//! rigid-body accumulators, the non-intersection solver separates
//! penetrating pairs positionally, and the area solver turns contact
//! state into enter/exit events.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::body::{BodyId, CollisionObject};
use crate::collision::{Collision, CollisionPoints};
use crate::world::{Objects, ANGULAR_RATE_SCALE};

/// Coulomb dynamic friction coefficient.
const DYNAMIC_FRICTION: f32 = 0.07;

/// Fraction of the remaining penetration removed per tick.
const CORRECTION_FACTOR: f32 = 0.8;

/// Penetration depth bodies are allowed to keep.
const DEPTH_TOLERANCE: f32 = 0.01;

/// A pass over the tick's collision list.
pub trait Solver {
    /// Process the collisions detected this tick.
    fn solve(&mut self, objects: &mut Objects, collisions: &[Collision], dt: f32);
}

/// Per-body data an impulse or positional solve needs, with static
/// bodies carrying no rigid state.
#[derive(Clone, Copy)]
struct Participant {
    center: Vec3,
    elasticity: f32,
    rigid: Option<RigidState>,
}

#[derive(Clone, Copy)]
struct RigidState {
    mass: f32,
    velocity: Vec3,
    angular_velocity: Quat,
}

/// Collect solver-facing state for a body. Areas and stale ids yield
/// `None`, which callers skip silently.
fn participant(objects: &Objects, id: BodyId) -> Option<Participant> {
    let object = objects.body(id)?;
    let center = objects.transform(object.transform())?.position();
    match object {
        CollisionObject::Rigid(body) => Some(Participant {
            center,
            elasticity: body.elasticity,
            rigid: Some(RigidState {
                mass: body.mass,
                velocity: body.velocity,
                angular_velocity: body.angular_velocity,
            }),
        }),
        CollisionObject::Static(body) => Some(Participant {
            center,
            elasticity: body.elasticity,
            rigid: None,
        }),
        CollisionObject::Area(_) => None,
    }
}

/// World-space velocity of a contact point on a rigid body. The rotor
/// angular velocity covers 0.1 s, so its displacement of the contact
/// arm is scaled to per-second units.
fn point_velocity(state: &RigidState, r: Vec3) -> Vec3 {
    state.velocity + (state.angular_velocity * r - r) * ANGULAR_RATE_SCALE
}

/// Impulse-based collision response with angular effects and friction.
///
/// Writes only the per-tick accumulators; the integrator turns them
/// into velocity at the end of the step.
#[derive(Debug, Default)]
pub struct ImpulseSolver;

impl Solver for ImpulseSolver {
    fn solve(&mut self, objects: &mut Objects, collisions: &[Collision], _dt: f32) {
        for collision in collisions {
            let (Some(a), Some(b)) = (
                participant(objects, collision.a),
                participant(objects, collision.b),
            ) else {
                continue;
            };
            if a.rigid.is_none() && b.rigid.is_none() {
                continue;
            }

            let normal = collision.points.normal;
            let r_a = collision.points.a - a.center;
            let r_b = collision.points.b - b.center;

            let v_a = a
                .rigid
                .as_ref()
                .map_or(Vec3::ZERO, |state| point_velocity(state, r_a));
            let v_b = b
                .rigid
                .as_ref()
                .map_or(Vec3::ZERO, |state| point_velocity(state, r_b));

            let relative = v_a - v_b;
            let approach = relative.dot(normal);
            if approach >= 0.0 {
                // Already separating.
                continue;
            }

            let cor = a.elasticity * b.elasticity;
            let inv_mass_a = a.rigid.map_or(0.0, |state| 1.0 / state.mass);
            let inv_mass_b = b.rigid.map_or(0.0, |state| 1.0 / state.mass);
            let angular = normal.dot(
                inverse_inertia_term(a.rigid, r_a, normal)
                    + inverse_inertia_term(b.rigid, r_b, normal),
            );

            let j = -(1.0 + cor) * approach / (inv_mass_a + inv_mass_b + angular);

            let tangent_velocity = relative - normal * approach;
            let friction = if tangent_velocity.length_squared() > f32::EPSILON {
                tangent_velocity.normalize() * (j * DYNAMIC_FRICTION)
            } else {
                Vec3::ZERO
            };

            let impulse = normal * j - friction;
            accumulate_impulse(objects, collision.a, r_a, impulse);
            accumulate_impulse(objects, collision.b, r_b, -impulse);
        }
    }
}

/// `(1/I) * ((r x n) x r)` with the moment of inertia approximated as
/// `m * r^2`. Contacts at the body center contribute nothing.
fn inverse_inertia_term(state: Option<RigidState>, r: Vec3, normal: Vec3) -> Vec3 {
    let Some(state) = state else {
        return Vec3::ZERO;
    };
    let r_squared = r.length_squared();
    if r_squared <= f32::EPSILON {
        return Vec3::ZERO;
    }
    r.cross(normal).cross(r) / (state.mass * r_squared)
}

/// Add an impulse at contact arm `r` into a rigid body's accumulators.
fn accumulate_impulse(objects: &mut Objects, id: BodyId, r: Vec3, impulse: Vec3) {
    let Some(body) = objects.body_mut(id).and_then(CollisionObject::as_rigid_mut) else {
        return;
    };
    body.impulse += impulse;

    let torque = r.cross(impulse);
    let r_squared = r.length_squared();
    if torque.length_squared() > f32::EPSILON && r_squared > f32::EPSILON {
        let angle = torque.length() * 0.1 / r_squared;
        let rotor = Quat::from_axis_angle(torque.normalize(), angle);
        body.angular_impulse = rotor * body.angular_impulse;
    }
}

/// Positional constraint keeping bodies from resting inside each other.
///
/// Translates transforms directly, splitting the correction by mass
/// share for rigid/rigid pairs.
#[derive(Debug, Default)]
pub struct NonIntersectionConstraintSolver;

impl Solver for NonIntersectionConstraintSolver {
    fn solve(&mut self, objects: &mut Objects, collisions: &[Collision], _dt: f32) {
        for collision in collisions {
            let (Some(a), Some(b)) = (
                participant(objects, collision.a),
                participant(objects, collision.b),
            ) else {
                continue;
            };

            let depth = (collision.points.depth - DEPTH_TOLERANCE).max(0.0);
            let correction = collision.points.normal * (CORRECTION_FACTOR * depth);

            match (a.rigid, b.rigid) {
                (Some(rigid_a), Some(rigid_b)) => {
                    // The heavier the partner, the larger the share.
                    let b_share = rigid_b.mass / (rigid_a.mass + rigid_b.mass);
                    translate_body(objects, collision.a, correction * b_share);
                    translate_body(objects, collision.b, -correction * (1.0 - b_share));
                }
                (Some(_), None) => translate_body(objects, collision.a, correction),
                (None, Some(_)) => translate_body(objects, collision.b, -correction),
                (None, None) => {}
            }
        }
    }
}

fn translate_body(objects: &mut Objects, id: BodyId, offset: Vec3) {
    let Some(transform_id) = objects.body(id).map(CollisionObject::transform) else {
        return;
    };
    if let Some(transform) = objects.transform_mut(transform_id) {
        transform.translate(offset);
    }
}

/// One area's view of a collision.
struct AreaContact {
    other: BodyId,
    points: CollisionPoints,
    /// True when the area was recorded as `a`, meaning the contact must
    /// be flipped before delivery so callbacks see the other body as
    /// `a`.
    flipped: bool,
}

/// Edge-triggers collision-area callbacks by diffing each tick's
/// contacts against the previous tick's.
#[derive(Default)]
pub struct CollisionAreaSolver {
    record: HashMap<BodyId, Vec<AreaContact>>,
}

impl CollisionAreaSolver {
    /// Create a solver with an empty contact record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Solver for CollisionAreaSolver {
    fn solve(&mut self, objects: &mut Objects, collisions: &[Collision], _dt: f32) {
        let mut current: HashMap<BodyId, Vec<AreaContact>> = HashMap::new();
        for collision in collisions {
            let a_is_area = objects
                .body(collision.a)
                .is_some_and(|object| object.as_area().is_some());
            let b_is_area = objects
                .body(collision.b)
                .is_some_and(|object| object.as_area().is_some());

            if a_is_area {
                current.entry(collision.a).or_default().push(AreaContact {
                    other: collision.b,
                    points: collision.points,
                    flipped: true,
                });
            }
            if b_is_area {
                current.entry(collision.b).or_default().push(AreaContact {
                    other: collision.a,
                    points: collision.points,
                    flipped: false,
                });
            }
        }

        // Contacts that vanished this tick. Fires even when the other
        // body is already gone from the world; the callback gets the
        // stale id.
        for (&area_id, previous) in &self.record {
            for contact in previous {
                let still_colliding = current
                    .get(&area_id)
                    .is_some_and(|list| list.iter().any(|c| c.other == contact.other));
                if still_colliding {
                    continue;
                }
                if let Some(area) = objects
                    .body_mut(area_id)
                    .and_then(CollisionObject::as_area_mut)
                {
                    if let Some(on_exit) = &mut area.on_exit {
                        on_exit(contact.other);
                    }
                }
            }
        }

        // Contacts that appeared this tick.
        for (&area_id, contacts) in &current {
            for contact in contacts {
                let was_colliding = self
                    .record
                    .get(&area_id)
                    .is_some_and(|list| list.iter().any(|c| c.other == contact.other));
                if was_colliding {
                    continue;
                }
                if let Some(area) = objects
                    .body_mut(area_id)
                    .and_then(CollisionObject::as_area_mut)
                {
                    if let Some(on_enter) = &mut area.on_enter {
                        let delivered = if contact.flipped {
                            contact.points.flipped()
                        } else {
                            contact.points
                        };
                        on_enter(contact.other, &delivered);
                    }
                }
            }
        }

        self.record = current;
    }
}

//! Collision objects: static bodies, rigid bodies, and trigger areas.
//!
//! All three carry the same collider/transform id pair so the narrow
//! phase never cares which kind it is looking at; solvers classify by
//! matching on the enum.

use glam::{Quat, Vec3};

use crate::collision::CollisionPoints;

/// Handle to a collision object stored in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) usize);

/// Handle to a collider stored in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderId(pub(crate) usize);

/// Handle to a transform stored in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformId(pub(crate) usize);

/// Callback fired when another object starts overlapping an area.
pub type AreaEnterFn = Box<dyn FnMut(BodyId, &CollisionPoints)>;
/// Callback fired when a previously overlapping object leaves an area.
pub type AreaExitFn = Box<dyn FnMut(BodyId)>;

/// Anything that can take part in collision detection.
pub enum CollisionObject {
    /// Immovable obstacle.
    Static(StaticBody),
    /// Simulated body with mass and velocity.
    Rigid(RigidBody),
    /// Non-solid region reporting enter/exit events.
    Area(CollisionArea),
}

impl CollisionObject {
    /// The object's collider.
    pub fn collider(&self) -> ColliderId {
        match self {
            CollisionObject::Static(body) => body.collider,
            CollisionObject::Rigid(body) => body.collider,
            CollisionObject::Area(area) => area.collider,
        }
    }

    /// The object's transform.
    pub fn transform(&self) -> TransformId {
        match self {
            CollisionObject::Static(body) => body.transform,
            CollisionObject::Rigid(body) => body.transform,
            CollisionObject::Area(area) => area.transform,
        }
    }

    /// True for static bodies.
    pub fn is_static(&self) -> bool {
        matches!(self, CollisionObject::Static(_))
    }

    /// The rigid body inside, if this is one.
    pub fn as_rigid(&self) -> Option<&RigidBody> {
        match self {
            CollisionObject::Rigid(body) => Some(body),
            _ => None,
        }
    }

    /// Mutable access to the rigid body inside, if this is one.
    pub fn as_rigid_mut(&mut self) -> Option<&mut RigidBody> {
        match self {
            CollisionObject::Rigid(body) => Some(body),
            _ => None,
        }
    }

    /// The area inside, if this is one.
    pub fn as_area(&self) -> Option<&CollisionArea> {
        match self {
            CollisionObject::Area(area) => Some(area),
            _ => None,
        }
    }

    /// Mutable access to the area inside, if this is one.
    pub fn as_area_mut(&mut self) -> Option<&mut CollisionArea> {
        match self {
            CollisionObject::Area(area) => Some(area),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CollisionObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionObject::Static(body) => f.debug_tuple("Static").field(body).finish(),
            CollisionObject::Rigid(body) => f.debug_tuple("Rigid").field(body).finish(),
            CollisionObject::Area(area) => f.debug_tuple("Area").field(area).finish(),
        }
    }
}

/// An immovable collision object.
#[derive(Clone, Debug)]
pub struct StaticBody {
    /// Collision shape.
    pub collider: ColliderId,
    /// Pose.
    pub transform: TransformId,
    /// Bounciness in `[0, 1]`.
    pub elasticity: f32,
}

impl StaticBody {
    /// Create a static body.
    pub fn new(collider: ColliderId, transform: TransformId) -> Self {
        Self {
            collider,
            transform,
            elasticity: 0.5,
        }
    }

    /// Set the elasticity.
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }
}

/// A simulated rigid body.
///
/// Angular state uses the engine's rotor convention: `angular_velocity`
/// is the rotation the body undergoes in 0.1 s. The per-tick
/// accumulators are written by the impulse solver and consumed (then
/// cleared) by the integrator.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Collision shape.
    pub collider: ColliderId,
    /// Pose.
    pub transform: TransformId,
    /// Mass in kilograms. Must be positive.
    pub mass: f32,
    /// Bounciness in `[0, 1]`.
    pub elasticity: f32,
    /// Multiplier on world gravity.
    pub gravity_scale: f32,
    /// Linear velocity in m/s.
    pub velocity: Vec3,
    /// Angular velocity rotor, rad per 0.1 s.
    pub angular_velocity: Quat,
    /// Accumulated linear impulse for this tick.
    pub impulse: Vec3,
    /// Accumulated angular impulse for this tick, as a rotor already
    /// divided by the squared contact distance.
    pub angular_impulse: Quat,
}

impl RigidBody {
    /// Create a rigid body with unit mass.
    pub fn new(collider: ColliderId, transform: TransformId) -> Self {
        Self {
            collider,
            transform,
            mass: 1.0,
            elasticity: 0.5,
            gravity_scale: 1.0,
            velocity: Vec3::ZERO,
            angular_velocity: Quat::IDENTITY,
            impulse: Vec3::ZERO,
            angular_impulse: Quat::IDENTITY,
        }
    }

    /// Set the mass.
    pub fn with_mass(mut self, mass: f32) -> Self {
        assert!(mass > 0.0, "rigid body mass must be positive");
        self.mass = mass;
        self
    }

    /// Set the elasticity.
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Set the gravity multiplier.
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Set the initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Reset both per-tick accumulators.
    pub(crate) fn clear_accumulators(&mut self) {
        self.impulse = Vec3::ZERO;
        self.angular_impulse = Quat::IDENTITY;
    }
}

/// A non-solid region that reports objects entering and leaving.
pub struct CollisionArea {
    /// Collision shape.
    pub collider: ColliderId,
    /// Pose.
    pub transform: TransformId,
    /// Fired on the first frame another object overlaps the area.
    pub on_enter: Option<AreaEnterFn>,
    /// Fired on the first frame a previously overlapping object no
    /// longer does.
    pub on_exit: Option<AreaExitFn>,
}

impl CollisionArea {
    /// Create an area with no listeners.
    pub fn new(collider: ColliderId, transform: TransformId) -> Self {
        Self {
            collider,
            transform,
            on_enter: None,
            on_exit: None,
        }
    }

    /// Attach an enter listener.
    pub fn with_on_enter(mut self, callback: AreaEnterFn) -> Self {
        self.on_enter = Some(callback);
        self
    }

    /// Attach an exit listener.
    pub fn with_on_exit(mut self, callback: AreaExitFn) -> Self {
        self.on_exit = Some(callback);
        self
    }
}

impl std::fmt::Debug for CollisionArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionArea")
            .field("collider", &self.collider)
            .field("transform", &self.transform)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

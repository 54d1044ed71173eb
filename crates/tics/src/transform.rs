//! Body pose, shared between simulation and whatever renders it.
//!
//! Two storage configurations exist behind the `ga` cargo feature:
//! classical position + rotation, or a single rigid motor. The accessor
//! API is identical in both, so nothing else in the engine knows which
//! one it was compiled against.

use glam::{Quat, Vec3};

#[cfg(feature = "ga")]
use geomath::Motor3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pose of a collision object.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    #[cfg(not(feature = "ga"))]
    position: Vec3,
    #[cfg(not(feature = "ga"))]
    rotation: Quat,
    #[cfg(feature = "ga")]
    motor: Motor3,
    /// Scale factor. Sphere colliders require it to be uniform.
    pub scale: Vec3,
}

impl Transform {
    /// The identity pose at the origin.
    pub fn identity() -> Self {
        Self::from_position(Vec3::ZERO)
    }

    /// A pose at `position` with no rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self::from_position_rotation(position, Quat::IDENTITY)
    }

    /// A pose from explicit position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            #[cfg(not(feature = "ga"))]
            position,
            #[cfg(not(feature = "ga"))]
            rotation,
            #[cfg(feature = "ga")]
            motor: Motor3::from_parts(rotation, position),
            scale: Vec3::ONE,
        }
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        #[cfg(not(feature = "ga"))]
        {
            self.position
        }
        #[cfg(feature = "ga")]
        {
            self.motor.translation
        }
    }

    /// World-space orientation.
    pub fn rotation(&self) -> Quat {
        #[cfg(not(feature = "ga"))]
        {
            self.rotation
        }
        #[cfg(feature = "ga")]
        {
            self.motor.rotation
        }
    }

    /// Replace the position, keeping orientation.
    pub fn set_position(&mut self, position: Vec3) {
        #[cfg(not(feature = "ga"))]
        {
            self.position = position;
        }
        #[cfg(feature = "ga")]
        {
            self.motor.translation = position;
        }
    }

    /// Replace the orientation, keeping position.
    pub fn set_rotation(&mut self, rotation: Quat) {
        #[cfg(not(feature = "ga"))]
        {
            self.rotation = rotation;
        }
        #[cfg(feature = "ga")]
        {
            self.motor.rotation = rotation;
        }
    }

    /// Move the pose by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        #[cfg(not(feature = "ga"))]
        {
            self.position += offset;
        }
        #[cfg(feature = "ga")]
        {
            self.motor = Motor3::translation(offset) * self.motor;
        }
    }

    /// Pre-multiply a rotor onto the orientation. The position is
    /// unaffected: this spins the body in place.
    pub fn rotate(&mut self, rotor: Quat) {
        #[cfg(not(feature = "ga"))]
        {
            self.rotation = rotor * self.rotation;
        }
        #[cfg(feature = "ga")]
        {
            self.motor.rotation = rotor * self.motor.rotation;
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        let rotation = Quat::from_rotation_y(0.8);
        let t = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), rotation);
        assert!(t.position().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert!(t.rotation().abs_diff_eq(rotation, 1e-6));
    }

    #[test]
    fn translate_accumulates() {
        let mut t = Transform::from_position(Vec3::X);
        t.translate(Vec3::new(0.0, 2.0, 0.0));
        t.translate(Vec3::new(-1.0, 0.0, 0.0));
        assert!(t.position().abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn rotate_spins_in_place() {
        let mut t = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        t.rotate(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        // Position must not orbit the origin.
        assert!(t.position().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-6));
        let spun = t.rotation() * Vec3::X;
        assert!(spun.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn rotate_pre_multiplies() {
        let mut t = Transform::identity();
        t.rotate(Quat::from_rotation_x(0.3));
        t.rotate(Quat::from_rotation_y(0.5));
        let expected = Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.3);
        assert!(t.rotation().abs_diff_eq(expected, 1e-6));
    }
}

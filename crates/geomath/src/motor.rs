//! Rigid motion as a single value.

use glam::{Quat, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A proper rigid motion: rotate, then translate.
///
/// Stored as its rotation and translation parts. Composition follows
/// motor convention: `(a * b)` applies `b` first, then `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motor3 {
    /// Rotation part (unit rotor).
    pub rotation: Quat,
    /// Translation part.
    pub translation: Vec3,
}

impl Motor3 {
    /// The identity motion.
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// A pure translation.
    pub fn translation(offset: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: offset,
        }
    }

    /// A pure rotation about the origin.
    pub fn rotation(rotor: Quat) -> Self {
        Self {
            rotation: rotor,
            translation: Vec3::ZERO,
        }
    }

    /// Build from rotation and translation parts.
    pub fn from_parts(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Apply the motion to a point.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }
}

impl Default for Motor3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Motor3 {
    type Output = Motor3;

    fn mul(self, rhs: Motor3) -> Motor3 {
        Motor3 {
            rotation: self.rotation * rhs.rotation,
            translation: self.translation + self.rotation * rhs.translation,
        }
    }
}

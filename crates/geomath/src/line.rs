//! 3D projective lines.
//!
//! A line is stored in Plücker form as a direction vector and a moment
//! bivector. The only products the engine needs are the wedge of two
//! points (a line through them) and the antiwedge (meet) of two lines,
//! whose scalar part tells which side of one line the other passes.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A line in 3D projective geometric algebra.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line3 {
    /// Direction part.
    pub direction: Vec3,
    /// Moment part, the bivector `p ∧ q` of two points on the line.
    pub moment: Vec3,
}

impl Line3 {
    /// The line through two points, `p ∧ q`, oriented from `p` to `q`.
    pub fn through_points(p: Vec3, q: Vec3) -> Self {
        Self {
            direction: q - p,
            moment: p.cross(q),
        }
    }

    /// The same line expressed in a frame where `origin` is the zero
    /// point. The direction is unchanged; only the moment moves.
    pub fn rebased(&self, origin: Vec3) -> Self {
        Self {
            direction: self.direction,
            moment: self.moment - origin.cross(self.direction),
        }
    }

    /// Antiwedge (meet) of two lines.
    ///
    /// The scalar sign indicates the relative orientation of the lines:
    /// zero when they intersect, positive/negative for the two crossing
    /// sides.
    pub fn antiwedge(&self, other: &Line3) -> f32 {
        -(self.direction.dot(other.moment) + self.moment.dot(other.direction))
    }
}

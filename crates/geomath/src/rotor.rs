//! Rotor helpers on top of `glam::Quat`.

use glam::Quat;

/// Scale a rotor's angle by `s` using the lerp approximation
/// `normalize(identity * (1 - s) + rotor * s)`.
///
/// Valid for small angles, which is what per-tick angular velocities
/// are. This is intentionally not a slerp: the engine's behaviour is
/// calibrated against the lerp form.
pub fn rotor_scale(rotor: Quat, s: f32) -> Quat {
    // Stay on the identity side of the double cover.
    let rotor = if rotor.w < 0.0 { -rotor } else { rotor };
    Quat::from_xyzw(
        rotor.x * s,
        rotor.y * s,
        rotor.z * s,
        (1.0 - s) + rotor.w * s,
    )
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn scale_of_identity_is_identity() {
        let scaled = rotor_scale(Quat::IDENTITY, 0.3);
        assert!((scaled.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scale_by_one_is_unchanged() {
        let rotor = Quat::from_axis_angle(Vec3::Y, 0.4);
        let scaled = rotor_scale(rotor, 1.0);
        assert!(scaled.abs_diff_eq(rotor, 1e-6));
    }

    #[test]
    fn scale_by_zero_is_identity() {
        let rotor = Quat::from_axis_angle(Vec3::X, 0.7);
        let scaled = rotor_scale(rotor, 0.0);
        assert!(scaled.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn small_angle_scaling_matches_angle_ratio() {
        let rotor = Quat::from_axis_angle(Vec3::Z, 0.1);
        let half = rotor_scale(rotor, 0.5);
        let (axis, angle) = half.to_axis_angle();
        assert!(axis.abs_diff_eq(Vec3::Z, 1e-3));
        assert!(
            (angle - 0.05).abs() < 1e-4,
            "expected half angle 0.05, got {angle}"
        );
    }

    #[test]
    fn result_is_normalized() {
        let rotor = Quat::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), 1.2);
        let scaled = rotor_scale(rotor, 0.25);
        assert!((scaled.length() - 1.0).abs() < 1e-6);
    }
}

use bevy::math::{EulerRot, Quat, Vec2};

/// Rig orientation driven by yaw and pitch angles accumulated from pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FreeLook {
    /// (-720..720)
    ///
    /// Note: Quaternions can encode 720 degrees of rotation, by keeping the yaw in this range
    /// the precision is preserved without changing the resulting rotation.
    pub yaw_degrees: f32,

    /// [-90..90]
    pub pitch_degrees: f32,
}

impl FreeLook {
    pub const MAX_PITCH: f32 = 90.0;

    pub fn new(yaw_degrees: f32, pitch_degrees: f32) -> Self {
        Self {
            yaw_degrees: yaw_degrees % 720_f32,
            pitch_degrees: pitch_degrees.clamp(-Self::MAX_PITCH, Self::MAX_PITCH),
        }
    }

    /// Extract the yaw and pitch angles of a rotation, the roll is dropped.
    pub fn from_rotation(rotation: Quat) -> Self {
        let (yaw, pitch, _) = rotation.to_euler(EulerRot::YXZ);
        Self::new(yaw.to_degrees(), pitch.to_degrees())
    }

    /// Additively rotate by the specified angles.
    pub fn rotate_yaw_pitch(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        self.yaw_degrees = (self.yaw_degrees + yaw_degrees) % 720_f32;
        self.pitch_degrees = (self.pitch_degrees + pitch_degrees).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Integrate pointer motion: horizontal motion turns the yaw, vertical motion lowers the pitch.
    pub fn integrate(&mut self, pointer_delta: Vec2, sensitivity: f32, delta_time_s: f32) {
        let scale = sensitivity * delta_time_s;
        if !scale.is_finite() {
            return;
        }
        self.rotate_yaw_pitch(pointer_delta.x * scale, -pointer_delta.y * scale);
    }

    /// Rotation of pitch around the local X axis followed by yaw around the world Y axis.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;
    use shine_test::test;

    #[test]
    fn test_pitch_is_clamped() {
        let mut look = FreeLook::default();
        for _ in 0..100 {
            look.integrate(Vec2::new(0.0, -1000.0), 500.0, 0.1);
            assert!((-90.0..=90.0).contains(&look.pitch_degrees));
        }
        assert_eq!(look.pitch_degrees, 90.0);

        for _ in 0..100 {
            look.integrate(Vec2::new(0.0, 1000.0), 500.0, 0.1);
            assert!((-90.0..=90.0).contains(&look.pitch_degrees));
        }
        assert_eq!(look.pitch_degrees, -90.0);
    }

    #[test]
    fn test_integrate() {
        let mut look = FreeLook::default();
        look.integrate(Vec2::new(2.0, 1.0), 10.0, 0.5);
        assert_eq!(look.yaw_degrees, 10.0);
        assert_eq!(look.pitch_degrees, -5.0);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut look = FreeLook::new(700.0, 0.0);
        look.rotate_yaw_pitch(40.0, 0.0);
        assert!((look.yaw_degrees - 20.0).abs() < 1e-4);
        // 720 degrees apart, the same orientation
        assert!(look.rotation().abs_diff_eq(FreeLook::new(20.0, 0.0).rotation(), 1e-5));
    }

    #[test]
    fn test_rotation() {
        let look = FreeLook::new(90.0, 0.0);
        let forward = look.rotation() * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5), "{forward:?}");

        let look = FreeLook::new(0.0, 90.0);
        let forward = look.rotation() * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::NEG_Y, 1e-5), "{forward:?}");

        let restored = FreeLook::from_rotation(FreeLook::new(30.0, -20.0).rotation());
        assert!((restored.yaw_degrees - 30.0).abs() < 1e-3);
        assert!((restored.pitch_degrees + 20.0).abs() < 1e-3);
    }
}

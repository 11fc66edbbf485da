use crate::{
    camera_rig::{CollisionLayers, RigError},
    math::value::{ValueError, ValueType},
};
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration of a spring arm camera rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// Nominal length of the arm without any obstruction.
    pub target_arm_length: f32,
    /// Offset of the socket at the end of the arm, in the local space of the rig.
    pub socket_offset: Vec3,
    /// Offset from the followed target to the origin of the rig, in world space.
    pub follow_offset: Vec3,
    /// Smoothing time of the rig following the target.
    pub movement_smooth_time: f32,
    /// Smoothing time of the sockets following the (retracted) end of the arm.
    pub collision_smooth_time: f32,
    pub collision_enabled: bool,
    /// Number of line tests in the probe ring, in the `[MIN_PROBE_SAMPLES..=MAX_PROBE_SAMPLES]` range.
    pub probe_sample_count: usize,
    pub probe_radius: f32,
    pub collision_layers: CollisionLayers,
    /// Degrees of rotation per unit of pointer motion per second.
    pub rotation_sensitivity: f32,
    pub free_look_enabled: bool,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            target_arm_length: 3.0,
            socket_offset: Vec3::ZERO,
            follow_offset: Vec3::ZERO,
            movement_smooth_time: 0.05,
            collision_smooth_time: 0.05,
            collision_enabled: true,
            probe_sample_count: 4,
            probe_radius: 0.3,
            collision_layers: CollisionLayers::ALL,
            rotation_sensitivity: 500.0,
            free_look_enabled: true,
        }
    }
}

impl ArmConfig {
    pub const MIN_PROBE_SAMPLES: usize = 2;
    pub const MAX_PROBE_SAMPLES: usize = 20;

    pub const PARAMETER_NAMES: [&'static str; 11] = [
        "target_arm_length",
        "socket_offset",
        "follow_offset",
        "movement_smooth_time",
        "collision_smooth_time",
        "collision_enabled",
        "probe_sample_count",
        "probe_radius",
        "collision_layers",
        "rotation_sensitivity",
        "free_look_enabled",
    ];

    pub fn with_arm_length(mut self, target_arm_length: f32) -> Self {
        self.target_arm_length = target_arm_length;
        self
    }

    pub fn with_socket_offset(mut self, socket_offset: Vec3) -> Self {
        self.socket_offset = socket_offset;
        self
    }

    pub fn with_follow_offset(mut self, follow_offset: Vec3) -> Self {
        self.follow_offset = follow_offset;
        self
    }

    pub fn with_smooth_times(mut self, movement_smooth_time: f32, collision_smooth_time: f32) -> Self {
        self.movement_smooth_time = movement_smooth_time;
        self.collision_smooth_time = collision_smooth_time;
        self
    }

    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.collision_enabled = enabled;
        self
    }

    pub fn with_probe(mut self, sample_count: usize, radius: f32) -> Self {
        self.probe_sample_count = sample_count;
        self.probe_radius = radius;
        self
    }

    pub fn with_collision_layers(mut self, layers: CollisionLayers) -> Self {
        self.collision_layers = layers;
        self
    }

    pub fn with_free_look(mut self, enabled: bool, sensitivity: f32) -> Self {
        self.free_look_enabled = enabled;
        self.rotation_sensitivity = sensitivity;
        self
    }

    /// Check the configuration and return the one to use.
    /// Probe sample counts above the supported maximum are clamped, all other violations are rejected.
    pub fn validated(mut self) -> Result<Self, RigError> {
        if !(self.target_arm_length >= 0.0 && self.target_arm_length.is_finite()) {
            return Err(RigError::InvalidArmLength(self.target_arm_length));
        }
        for (name, value) in [
            ("movement_smooth_time", self.movement_smooth_time),
            ("collision_smooth_time", self.collision_smooth_time),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(RigError::InvalidSmoothTime { name, value });
            }
        }
        if !(self.probe_radius > 0.0 && self.probe_radius.is_finite()) {
            return Err(RigError::InvalidProbeRadius(self.probe_radius));
        }
        if self.probe_sample_count < Self::MIN_PROBE_SAMPLES {
            return Err(RigError::InvalidSampleCount {
                min: Self::MIN_PROBE_SAMPLES,
                found: self.probe_sample_count,
            });
        }
        if self.probe_sample_count > Self::MAX_PROBE_SAMPLES {
            log::warn!(
                "Probe sample count {} is clamped to {}",
                self.probe_sample_count,
                Self::MAX_PROBE_SAMPLES
            );
            self.probe_sample_count = Self::MAX_PROBE_SAMPLES;
        }
        for (name, value) in [("socket_offset", self.socket_offset), ("follow_offset", self.follow_offset)] {
            if !value.is_finite() {
                return Err(RigError::InvalidOffset { name, value });
            }
        }
        if !self.rotation_sensitivity.is_finite() {
            return Err(RigError::InvalidSensitivity(self.rotation_sensitivity));
        }

        Ok(self)
    }

    /// Get a field by name.
    pub fn parameter(&self, name: &str) -> Result<ValueType, ValueError> {
        let value: ValueType = match name {
            "target_arm_length" => self.target_arm_length.into(),
            "socket_offset" => self.socket_offset.into(),
            "follow_offset" => self.follow_offset.into(),
            "movement_smooth_time" => self.movement_smooth_time.into(),
            "collision_smooth_time" => self.collision_smooth_time.into(),
            "collision_enabled" => self.collision_enabled.into(),
            "probe_sample_count" => ValueType::UInt(u32::try_from(self.probe_sample_count).unwrap_or(u32::MAX)),
            "probe_radius" => self.probe_radius.into(),
            "collision_layers" => u32::from(self.collision_layers).into(),
            "rotation_sensitivity" => self.rotation_sensitivity.into(),
            "free_look_enabled" => self.free_look_enabled.into(),
            _ => return Err(ValueError::UnknownParameter(name.to_string())),
        };
        Ok(value)
    }

    /// Set a field by name without validation.
    pub fn set_parameter(&mut self, name: &str, value: ValueType) -> Result<(), ValueError> {
        match name {
            "target_arm_length" => self.target_arm_length = value.try_into()?,
            "socket_offset" => self.socket_offset = value.try_into()?,
            "follow_offset" => self.follow_offset = value.try_into()?,
            "movement_smooth_time" => self.movement_smooth_time = value.try_into()?,
            "collision_smooth_time" => self.collision_smooth_time = value.try_into()?,
            "collision_enabled" => self.collision_enabled = value.try_into()?,
            "probe_sample_count" => self.probe_sample_count = u32::try_from(value)? as usize,
            "probe_radius" => self.probe_radius = value.try_into()?,
            "collision_layers" => self.collision_layers = u32::try_from(value)?.into(),
            "rotation_sensitivity" => self.rotation_sensitivity = value.try_into()?,
            "free_look_enabled" => self.free_look_enabled = value.try_into()?,
            _ => return Err(ValueError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }
}

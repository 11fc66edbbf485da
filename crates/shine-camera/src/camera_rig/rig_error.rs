use crate::math::value::ValueError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RigError {
    #[error("Arm length must be a non-negative finite number, found {0}")]
    InvalidArmLength(f32),
    #[error("Smoothing time of {name} must be positive, found {value}")]
    InvalidSmoothTime { name: &'static str, value: f32 },
    #[error("Probe radius must be positive, found {0}")]
    InvalidProbeRadius(f32),
    #[error("Probe sample count must be at least {min}, found {found}")]
    InvalidSampleCount { min: usize, found: usize },
    #[error("Offset {name} must be finite, found {value:?}")]
    InvalidOffset { name: &'static str, value: bevy::math::Vec3 },
    #[error("Rotation sensitivity must be finite, found {0}")]
    InvalidSensitivity(f32),

    #[error(transparent)]
    ValueError(#[from] ValueError),
}

use crate::camera_rig::{ArmConfig, ProbeSample};
use bevy::math::{Quat, Vec3};

/// Result of an arm solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmSolution {
    /// End of the arm without any obstruction.
    pub endpoint: Vec3,
    /// Position of the socket after retracting the arm in front of the nearest obstruction.
    pub socket: Vec3,
}

impl ArmSolution {
    /// Length of the retraction applied to the endpoint.
    pub fn retraction(&self) -> f32 {
        self.endpoint.distance(self.socket)
    }
}

/// Nominal end of the arm: the socket offset applied to a point `target_arm_length` behind the origin.
pub fn arm_endpoint(origin: Vec3, rotation: Quat, config: &ArmConfig) -> Vec3 {
    let arm_offset = config.socket_offset - Vec3::new(0.0, 0.0, config.target_arm_length);
    origin + rotation * arm_offset
}

/// Find the socket position for the arm starting at `origin` with the given orientation.
///
/// The arm is pulled in along its direction to the closest obstruction found by any of the probe samples.
pub fn solve_arm(origin: Vec3, rotation: Quat, config: &ArmConfig, samples: &[ProbeSample]) -> ArmSolution {
    let endpoint = arm_endpoint(origin, rotation, config);

    if !config.collision_enabled {
        return ArmSolution { endpoint, socket: endpoint };
    }

    let arm_length = config.target_arm_length.max(0.0);
    let min_distance = samples
        .iter()
        .filter_map(|sample| sample.hit)
        .map(|hit| hit.point.distance(origin))
        .fold(arm_length, f32::min)
        .clamp(0.0, arm_length);

    let retraction = arm_length - min_distance;
    if retraction <= 0.0 {
        return ArmSolution { endpoint, socket: endpoint };
    }

    // a zero length arm has no direction to retract along
    let direction = (endpoint - origin).normalize_or_zero();
    let socket = endpoint - direction * retraction;

    log::trace!("Arm retracted by {retraction} to {socket}");
    ArmSolution { endpoint, socket }
}

use crate::{
    camera_rig::{arm_endpoint, solve_arm, ArmConfig, ArmSolution, CollisionWorld, FreeLook, ProbeRing, ProbeSample, RigError},
    math::{
        value::{ValueLike, ValueType},
        SmoothDamped,
    },
};
use bevy::{
    math::{Quat, Vec2, Vec3},
    transform::components::Transform,
};

pub struct ArmUpdateParams<'a, W>
where
    W: CollisionWorld + ?Sized,
{
    pub world: &'a W,
    /// Pointer motion since the previous frame.
    pub pointer_delta: Vec2,
    pub delta_time_s: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArmState {
    /// No target is bound, updates are skipped.
    Inactive,
    Active,
}

/// Key of a transform driven towards the socket of the arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FollowerId(pub u64);

#[derive(Clone, Debug)]
struct ArmFollower {
    id: FollowerId,
    position: SmoothDamped<Vec3>,
}

/// Read only view of the last update for debug visualization.
#[derive(Clone, Copy, Debug)]
pub struct ArmSnapshot<'a> {
    pub origin: Vec3,
    pub rotation: Quat,
    pub endpoint: Vec3,
    pub socket: Vec3,
    /// Probe samples of the last update, empty when collision testing is disabled.
    pub samples: &'a [ProbeSample],
}

/// Third person camera rig following a target at the end of a retractable arm.
///
/// Each [`step`](SpringArm::step):
/// - probes the geometry around the end of the arm,
/// - pulls the socket in front of the nearest obstruction,
/// - smooths the rig towards the target and the followers towards the socket,
/// - integrates the free look rotation.
#[derive(Clone, Debug)]
pub struct SpringArm {
    config: ArmConfig,
    target: Option<Transform>,
    position: SmoothDamped<Vec3>,
    rotation: Quat,
    free_look: FreeLook,
    probe: ProbeRing,
    solution: ArmSolution,
    followers: Vec<ArmFollower>,
}

impl SpringArm {
    /// Create an inactive rig at the origin. Fails if the configuration is invalid.
    pub fn new(config: ArmConfig) -> Result<Self, RigError> {
        let config = config.validated()?;
        let solution = {
            let endpoint = arm_endpoint(Vec3::ZERO, Quat::IDENTITY, &config);
            ArmSolution { endpoint, socket: endpoint }
        };

        Ok(Self {
            position: SmoothDamped::new(Vec3::ZERO, config.movement_smooth_time),
            rotation: Quat::IDENTITY,
            free_look: FreeLook::default(),
            probe: ProbeRing::new(config.probe_sample_count),
            solution,
            followers: Vec::new(),
            target: None,
            config,
        })
    }

    /// Place the rig at the given pose without any smoothing, see [`reset`](SpringArm::reset).
    pub fn with_pose<W>(mut self, world: &W, position: Vec3, rotation: Quat) -> Self
    where
        W: CollisionWorld + ?Sized,
    {
        self.set_rotation(rotation);
        self.reset(world, position);
        self
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    /// Replace the configuration. An invalid configuration is rejected and the current one is kept.
    ///
    /// Changing the sample count reallocates the probe ring, the smoothing velocities are preserved.
    pub fn set_config(&mut self, config: ArmConfig) -> Result<(), RigError> {
        let config = match config.validated() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Rejected spring arm configuration: {err}");
                return Err(err);
            }
        };

        if config.probe_sample_count != self.probe.len() {
            log::debug!(
                "Reallocating probe ring: {} -> {} samples",
                self.probe.len(),
                config.probe_sample_count
            );
            self.probe.resize(config.probe_sample_count);
        }
        if config.free_look_enabled && !self.config.free_look_enabled {
            self.free_look = FreeLook::from_rotation(self.rotation);
        }
        self.position.set_smooth_time(config.movement_smooth_time);
        for follower in &mut self.followers {
            follower.position.set_smooth_time(config.collision_smooth_time);
        }

        self.config = config;
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<ValueType, RigError> {
        Ok(self.config.parameter(name)?)
    }

    /// Update a single configuration field by name, see [`ArmConfig::PARAMETER_NAMES`].
    pub fn set_parameter(&mut self, name: &str, value: impl Into<ValueType>) -> Result<(), RigError> {
        let mut config = self.config.clone();
        config.set_parameter(name, value.into())?;
        self.set_config(config)
    }

    /// Update a parameter from its current value.
    pub fn set_parameter_with<T>(&mut self, name: &str, update: impl FnOnce(T) -> T) -> Result<(), RigError>
    where
        T: ValueLike,
    {
        let value = T::try_from(self.config.parameter(name)?)?;
        self.set_parameter(name, update(value))
    }

    pub fn state(&self) -> ArmState {
        if self.target.is_some() {
            ArmState::Active
        } else {
            ArmState::Inactive
        }
    }

    pub fn target(&self) -> Option<&Transform> {
        self.target.as_ref()
    }

    /// Bind (or update) the followed pose, `None` deactivates the rig.
    pub fn set_target(&mut self, target: Option<Transform>) {
        match (&self.target, &target) {
            (None, Some(target)) => log::debug!("Spring arm activated, following {}", target.translation),
            (Some(_), None) => log::debug!("Spring arm deactivated"),
            _ => {}
        }
        self.target = target;
    }

    pub fn clear_target(&mut self) {
        self.set_target(None);
    }

    pub fn position(&self) -> Vec3 {
        self.position.value()
    }

    pub fn velocity(&self) -> Vec3 {
        self.position.velocity()
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set the orientation of the rig. With free look enabled the next update rotates from this orientation.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.free_look = FreeLook::from_rotation(self.rotation);
    }

    pub fn free_look(&self) -> &FreeLook {
        &self.free_look
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position.value()).with_rotation(self.rotation)
    }

    pub fn solution(&self) -> &ArmSolution {
        &self.solution
    }

    pub fn snapshot(&self) -> ArmSnapshot<'_> {
        ArmSnapshot {
            origin: self.position.value(),
            rotation: self.rotation,
            endpoint: self.solution.endpoint,
            socket: self.solution.socket,
            samples: if self.config.collision_enabled {
                self.probe.samples()
            } else {
                &[]
            },
        }
    }

    /// Register a transform to be driven towards the socket, starting from `position`.
    /// Attaching an already registered id restarts its smoothing from `position`.
    pub fn attach_follower(&mut self, id: FollowerId, position: Vec3) {
        let smoothed = SmoothDamped::new(position, self.config.collision_smooth_time);
        match self.followers.iter_mut().find(|follower| follower.id == id) {
            Some(follower) => follower.position = smoothed,
            None => self.followers.push(ArmFollower { id, position: smoothed }),
        }
    }

    pub fn detach_follower(&mut self, id: FollowerId) -> bool {
        let count = self.followers.len();
        self.followers.retain(|follower| follower.id != id);
        count != self.followers.len()
    }

    pub fn follower_position(&self, id: FollowerId) -> Option<Vec3> {
        self.followers
            .iter()
            .find(|follower| follower.id == id)
            .map(|follower| follower.position.value())
    }

    /// Iterate the followers in the order of registration.
    pub fn followers(&self) -> impl Iterator<Item = (FollowerId, Vec3)> + '_ {
        self.followers
            .iter()
            .map(|follower| (follower.id, follower.position.value()))
    }

    /// Move the rig to `position` and stop all motion.
    /// The arm is probed and solved at the new position and the followers are snapped to the socket.
    pub fn reset<W>(&mut self, world: &W, position: Vec3)
    where
        W: CollisionWorld + ?Sized,
    {
        self.position.reset(position);
        self.solution = self.solve(world, position);
        for follower in &mut self.followers {
            follower.position.reset(self.solution.socket);
        }
    }

    /// Probe the geometry around the end of the arm starting at `origin` and solve the socket position.
    fn solve<W>(&mut self, world: &W, origin: Vec3) -> ArmSolution
    where
        W: CollisionWorld + ?Sized,
    {
        let samples: &[ProbeSample] = if self.config.collision_enabled {
            let endpoint = arm_endpoint(origin, self.rotation, &self.config);
            self.probe.cast(
                world,
                origin,
                endpoint,
                self.rotation,
                self.config.probe_radius,
                self.config.collision_layers,
            )
        } else {
            &[]
        };
        solve_arm(origin, self.rotation, &self.config, samples)
    }

    /// Advance the rig by a frame. Returns `None` when no target is bound.
    pub fn step<W>(&mut self, params: ArmUpdateParams<'_, W>) -> Option<ArmSolution>
    where
        W: CollisionWorld + ?Sized,
    {
        let target = self.target?;
        let ArmUpdateParams {
            world,
            pointer_delta,
            delta_time_s,
        } = params;

        self.solution = self.solve(world, self.position.value());

        self.position
            .smooth_towards(target.translation + self.config.follow_offset, delta_time_s);

        let socket = self.solution.socket;
        for follower in &mut self.followers {
            follower.position.smooth_towards(socket, delta_time_s);
        }

        if self.config.free_look_enabled {
            self.free_look
                .integrate(pointer_delta, self.config.rotation_sensitivity, delta_time_s);
            self.rotation = self.free_look.rotation();
        }

        Some(self.solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera_rig::{ArmSolution, CollisionLayers, LineHit, StaticGeometry},
        math::value::ValueError,
    };
    use shine_test::test;

    const DT: f32 = 1.0 / 60.0;
    const CAMERA: FollowerId = FollowerId(1);

    fn no_input(world: &StaticGeometry) -> ArmUpdateParams<'_, StaticGeometry> {
        ArmUpdateParams {
            world,
            pointer_delta: Vec2::ZERO,
            delta_time_s: DT,
        }
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert!(SpringArm::new(ArmConfig::default().with_probe(0, 0.3)).is_err());
        assert!(SpringArm::new(ArmConfig::default().with_smooth_times(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_inactive_without_target() {
        let world = StaticGeometry::new();
        let mut arm = SpringArm::new(ArmConfig::default()).unwrap();
        arm.attach_follower(CAMERA, Vec3::ONE);

        assert_eq!(arm.state(), ArmState::Inactive);
        assert_eq!(arm.step(no_input(&world)), None);
        assert_eq!(arm.position(), Vec3::ZERO);
        assert_eq!(arm.follower_position(CAMERA), Some(Vec3::ONE));

        arm.set_target(Some(Transform::from_xyz(1.0, 0.0, 0.0)));
        assert_eq!(arm.state(), ArmState::Active);
        assert!(arm.step(no_input(&world)).is_some());

        arm.clear_target();
        assert_eq!(arm.state(), ArmState::Inactive);
    }

    #[test]
    fn test_follows_target() {
        let world = StaticGeometry::new();
        let config = ArmConfig::default()
            .with_follow_offset(Vec3::new(0.0, 1.5, 0.0))
            .with_free_look(false, 0.0);
        let mut arm = SpringArm::new(config).unwrap();
        arm.attach_follower(CAMERA, Vec3::ZERO);
        arm.set_target(Some(Transform::from_xyz(4.0, 0.0, 2.0)));

        for _ in 0..120 {
            arm.step(no_input(&world));
        }

        let origin = Vec3::new(4.0, 1.5, 2.0);
        assert!(arm.position().abs_diff_eq(origin, 1e-3), "{}", arm.position());
        let socket = arm.follower_position(CAMERA).unwrap();
        assert!(socket.abs_diff_eq(origin + Vec3::new(0.0, 0.0, -3.0), 1e-3), "{socket}");
    }

    #[test]
    fn test_unobstructed_socket_is_endpoint() {
        let world = StaticGeometry::new();
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(false, 0.0)).unwrap();
        arm.set_target(Some(Transform::IDENTITY));

        let solution = arm.step(no_input(&world)).unwrap();
        assert_eq!(solution.endpoint, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(solution.socket, solution.endpoint);
        assert_eq!(arm.snapshot().samples.len(), 4);
    }

    #[test]
    fn test_obstruction_pulls_socket_in() {
        // a wall crossing the arm 1 unit behind the rig
        let world = StaticGeometry::new().with_cuboid(Vec3::new(-5.0, -5.0, -1.5), Vec3::new(5.0, 5.0, -1.0));
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(false, 0.0)).unwrap();
        arm.attach_follower(CAMERA, Vec3::new(0.0, 0.0, -3.0));
        arm.set_target(Some(Transform::IDENTITY));

        let solution = arm.step(no_input(&world)).unwrap();
        let snapshot = arm.snapshot();
        assert!(snapshot.samples.iter().all(|s| s.hit.is_some()));
        // the nearest hit is the sample closest to the arm axis
        let min_distance = snapshot
            .samples
            .iter()
            .filter_map(|s| s.hit)
            .map(|hit| hit.distance)
            .fold(f32::MAX, f32::min);
        assert!(solution.socket.abs_diff_eq(Vec3::new(0.0, 0.0, -min_distance), 1e-5));
        assert!(min_distance >= 1.0 && min_distance < 1.1);

        for _ in 0..60 {
            arm.step(no_input(&world));
        }
        let socket = arm.follower_position(CAMERA).unwrap();
        assert!(socket.abs_diff_eq(solution.socket, 1e-3), "{socket}");
    }

    #[test]
    fn test_collision_disabled() {
        let world = |_: Vec3, to: Vec3, _: CollisionLayers| Some(LineHit { point: to * 0.1, distance: 0.3 });
        let mut arm = SpringArm::new(ArmConfig::default().with_collision(false)).unwrap();
        arm.set_target(Some(Transform::IDENTITY));

        let solution = arm
            .step(ArmUpdateParams {
                world: &world,
                pointer_delta: Vec2::ZERO,
                delta_time_s: DT,
            })
            .unwrap();
        assert_eq!(solution.socket, solution.endpoint);
        assert!(arm.snapshot().samples.is_empty());
    }

    #[test]
    fn test_collision_layers_filter() {
        let world = |_: Vec3, to: Vec3, layers: CollisionLayers| {
            layers
                .intersects(CollisionLayers::layer(2))
                .then_some(LineHit { point: to * 0.5, distance: 1.5 })
        };
        let config = ArmConfig::default()
            .with_collision_layers(CollisionLayers::layer(0))
            .with_free_look(false, 0.0);
        let mut arm = SpringArm::new(config).unwrap();
        arm.set_target(Some(Transform::IDENTITY));

        let params = || ArmUpdateParams {
            world: &world,
            pointer_delta: Vec2::ZERO,
            delta_time_s: DT,
        };
        let solution = arm.step(params()).unwrap();
        assert_eq!(solution.socket, solution.endpoint);

        arm.set_parameter("collision_layers", CollisionLayers::layer(2).0).unwrap();
        let solution = arm.step(params()).unwrap();
        assert!(solution.retraction() > 1.0);
    }

    #[test]
    fn test_free_look() {
        let world = StaticGeometry::new();
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(true, 10.0)).unwrap();
        arm.set_target(Some(Transform::IDENTITY));

        arm.step(ArmUpdateParams {
            world: &world,
            pointer_delta: Vec2::new(9.0, 0.0),
            delta_time_s: 1.0,
        });
        assert_eq!(arm.free_look().yaw_degrees, 90.0);
        // the arm is solved before the rotation is applied
        assert!(arm.solution().endpoint.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));

        let solution = arm.step(no_input(&world)).unwrap();
        assert!(solution.endpoint.abs_diff_eq(Vec3::new(-3.0, 0.0, 0.0), 1e-4), "{}", solution.endpoint);

        for _ in 0..50 {
            arm.step(ArmUpdateParams {
                world: &world,
                pointer_delta: Vec2::new(0.0, -1000.0),
                delta_time_s: DT,
            });
            assert!((-90.0..=90.0).contains(&arm.free_look().pitch_degrees));
        }
    }

    #[test]
    fn test_rotation_kept_without_free_look() {
        let world = StaticGeometry::new();
        let rotation = Quat::from_rotation_y(1.0);
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(false, 10.0))
            .unwrap()
            .with_pose(&world, Vec3::ZERO, rotation);
        arm.set_target(Some(Transform::IDENTITY));

        arm.step(ArmUpdateParams {
            world: &world,
            pointer_delta: Vec2::new(100.0, 100.0),
            delta_time_s: DT,
        });
        assert!(arm.rotation().abs_diff_eq(rotation, 1e-6));
    }

    #[test]
    fn test_reconfigure_keeps_velocity() {
        let world = StaticGeometry::new();
        let mut arm = SpringArm::new(ArmConfig::default().with_smooth_times(0.3, 0.3)).unwrap();
        arm.attach_follower(CAMERA, Vec3::ZERO);
        arm.set_target(Some(Transform::from_xyz(10.0, 0.0, 0.0)));
        for _ in 0..5 {
            arm.step(no_input(&world));
        }
        let velocity = arm.velocity();
        assert!(velocity.x > 0.0);

        arm.set_parameter("movement_smooth_time", 0.6_f32).unwrap();
        assert_eq!(arm.velocity(), velocity);
        assert_eq!(arm.config().movement_smooth_time, 0.6);

        arm.set_parameter("probe_sample_count", 7_u32).unwrap();
        assert_eq!(arm.velocity(), velocity);
        arm.step(no_input(&world));
        assert_eq!(arm.snapshot().samples.len(), 7);
    }

    #[test]
    fn test_invalid_reconfigure_keeps_last_good() {
        let mut arm = SpringArm::new(ArmConfig::default()).unwrap();

        assert!(matches!(
            arm.set_parameter("probe_radius", -1.0_f32),
            Err(RigError::InvalidProbeRadius(_))
        ));
        assert!(matches!(
            arm.set_parameter("probe_radius", true),
            Err(RigError::ValueError(ValueError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            arm.set_parameter("arm_length", 1.0_f32),
            Err(RigError::ValueError(ValueError::UnknownParameter(_)))
        ));
        assert_eq!(arm.config(), &ArmConfig::default());

        arm.set_parameter_with("target_arm_length", |length: f32| length * 2.0)
            .unwrap();
        assert_eq!(arm.config().target_arm_length, 6.0);
    }

    #[test]
    fn test_reset() {
        let world = StaticGeometry::new();
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(false, 0.0)).unwrap();
        arm.attach_follower(CAMERA, Vec3::ZERO);
        arm.set_target(Some(Transform::from_xyz(10.0, 0.0, 0.0)));
        for _ in 0..3 {
            arm.step(no_input(&world));
        }
        assert_ne!(arm.velocity(), Vec3::ZERO);

        arm.reset(&world, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(arm.velocity(), Vec3::ZERO);
        assert_eq!(
            arm.solution(),
            &ArmSolution {
                endpoint: Vec3::new(10.0, 0.0, -3.0),
                socket: Vec3::new(10.0, 0.0, -3.0),
            }
        );
        assert_eq!(arm.follower_position(CAMERA), Some(Vec3::new(10.0, 0.0, -3.0)));
    }

    #[test]
    fn test_reset_next_to_wall() {
        let wall = StaticGeometry::new().with_cuboid(Vec3::new(15.0, -5.0, -2.5), Vec3::new(25.0, 5.0, -1.5));
        let mut arm = SpringArm::new(ArmConfig::default().with_free_look(false, 0.0)).unwrap();
        arm.attach_follower(CAMERA, Vec3::ZERO);
        arm.reset(&wall, Vec3::ZERO);
        assert!(arm.snapshot().samples.iter().all(|s| s.hit.is_none()));

        // teleport in front of the wall, the camera must not be placed inside of it
        let position = Vec3::new(20.0, 0.0, 0.0);
        arm.reset(&wall, position);

        let snapshot = arm.snapshot();
        assert_eq!(snapshot.origin, position);
        assert!(snapshot.samples.iter().all(|s| s.hit.is_some()));
        assert!(snapshot.endpoint.abs_diff_eq(Vec3::new(20.0, 0.0, -3.0), 1e-6));
        let socket = snapshot.socket;
        assert!(socket.z > -1.6 && socket.z < -1.4, "{socket}");
        assert_eq!(arm.follower_position(CAMERA), Some(socket));
    }

    #[test]
    fn test_followers() {
        let mut arm = SpringArm::new(ArmConfig::default()).unwrap();
        arm.attach_follower(FollowerId(3), Vec3::X);
        arm.attach_follower(FollowerId(1), Vec3::Y);
        arm.attach_follower(FollowerId(3), Vec3::Z);

        let followers: Vec<_> = arm.followers().collect();
        assert_eq!(followers, vec![(FollowerId(3), Vec3::Z), (FollowerId(1), Vec3::Y)]);

        assert!(arm.detach_follower(FollowerId(3)));
        assert!(!arm.detach_follower(FollowerId(3)));
        assert_eq!(arm.follower_position(FollowerId(3)), None);
    }
}

use crate::{
    app::{AppGameSchedule, CameraSimulate},
    camera_rig::{ArmUpdateParams, CollisionWorld, FollowerId, SpringArm, StaticGeometry},
};
use bevy::{
    app::{App, Plugin, Update},
    ecs::{
        change_detection::{DetectChanges, Ref},
        component::Component,
        entity::Entity,
        event::EventReader,
        query::{Added, Without},
        removal_detection::RemovedComponents,
        resource::Resource,
        schedule::IntoScheduleConfigs,
        system::{Query, Res},
    },
    input::mouse::MouseMotion,
    math::Vec2,
    time::Time,
    transform::components::Transform,
};

impl From<Entity> for FollowerId {
    fn from(entity: Entity) -> Self {
        FollowerId(entity.to_bits())
    }
}

/// Spring arm following the `target` entity. The transform of the rig entity is driven by the arm.
///
/// When the component is added, the arm is reset to the pose of the entity.
#[derive(Component)]
#[require(Transform)]
pub struct SpringArmRig {
    pub arm: SpringArm,
    pub target: Option<Entity>,
}

impl SpringArmRig {
    pub fn new(arm: SpringArm) -> Self {
        Self { arm, target: None }
    }

    pub fn with_target(self, target: Entity) -> Self {
        Self {
            target: Some(target),
            ..self
        }
    }
}

/// Entity with a translation driven towards the socket of a [`SpringArmRig`], usually the camera.
///
/// The rig entity may receive its [`SpringArmRig`] later, the follower is attached once the rig exists.
#[derive(Component)]
#[require(Transform)]
pub struct SpringArmFollower {
    pub rig: Entity,
}

/// The geometry the arms are probed against.
#[derive(Resource)]
pub struct ArmCollisionWorld(pub Box<dyn CollisionWorld + Send + Sync>);

impl ArmCollisionWorld {
    pub fn new<W>(world: W) -> Self
    where
        W: CollisionWorld + Send + Sync + 'static,
    {
        Self(Box::new(world))
    }
}

impl Default for ArmCollisionWorld {
    fn default() -> Self {
        Self::new(StaticGeometry::new())
    }
}

pub fn init_spring_arms(
    rig_q: Query<(Entity, &mut SpringArmRig, &Transform), Added<SpringArmRig>>,
    world: Res<ArmCollisionWorld>,
) {
    for (entity, mut rig, transform) in rig_q {
        log::debug!("Spring arm {entity} placed at {}", transform.translation);
        rig.arm.set_rotation(transform.rotation);
        rig.arm.reset(world.0.as_ref(), transform.translation);
    }
}

/// Attach the followers not registered in their rig yet.
pub fn attach_arm_followers(
    follower_q: Query<(Entity, Ref<SpringArmFollower>, &Transform)>,
    mut rig_q: Query<&mut SpringArmRig>,
) {
    for (entity, follower, transform) in follower_q {
        let id = FollowerId::from(entity);
        match rig_q.get_mut(follower.rig) {
            Ok(mut rig) => {
                if rig.arm.follower_position(id).is_none() {
                    rig.arm.attach_follower(id, transform.translation);
                }
            }
            Err(err) => {
                if follower.is_added() {
                    log::warn!("Follower {entity} refers to a missing spring arm, waiting for it: {err}");
                }
            }
        }
    }
}

pub fn detach_arm_followers(mut removed: RemovedComponents<SpringArmFollower>, rig_q: Query<&mut SpringArmRig>) {
    let removed: Vec<FollowerId> = removed.read().map(FollowerId::from).collect();
    if removed.is_empty() {
        return;
    }

    for mut rig in rig_q {
        for id in &removed {
            rig.arm.detach_follower(*id);
        }
    }
}

pub fn update_spring_arms(
    rig_q: Query<(&mut SpringArmRig, &mut Transform)>,
    target_q: Query<&Transform, Without<SpringArmRig>>,
    world: Res<ArmCollisionWorld>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    time: Res<Time>,
) {
    let mut pointer_delta = Vec2::ZERO;
    for event in mouse_motion_events.read() {
        pointer_delta += event.delta;
    }

    for (mut rig, mut transform) in rig_q {
        let target = match rig.target {
            Some(entity) => target_q.get(entity).ok().copied(),
            None => None,
        };
        rig.arm.set_target(target);

        let params = ArmUpdateParams {
            world: world.0.as_ref(),
            pointer_delta,
            delta_time_s: time.delta_secs(),
        };
        if rig.arm.step(params).is_some() {
            *transform = rig.arm.transform();
        }
    }
}

pub fn update_arm_follower_transforms(
    follower_q: Query<(Entity, &SpringArmFollower, &mut Transform), Without<SpringArmRig>>,
    rig_q: Query<&SpringArmRig>,
) {
    for (entity, follower, mut transform) in follower_q {
        let position = rig_q
            .get(follower.rig)
            .ok()
            .and_then(|rig| rig.arm.follower_position(entity.into()));
        if let Some(position) = position {
            transform.translation = position;
        }
    }
}

/// Drive the [`SpringArmRig`] and [`SpringArmFollower`] entities in the camera steps of the `Update` schedule.
pub struct SpringArmPlugin;

impl Plugin for SpringArmPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MouseMotion>();
        app.init_resource::<ArmCollisionWorld>();

        app.configure_sets(
            Update,
            (
                CameraSimulate::PreparePose,
                CameraSimulate::SimulatePose,
                CameraSimulate::WithPose,
            )
                .chain(),
        );

        app.add_update_systems(
            CameraSimulate::PreparePose,
            (init_spring_arms, detach_arm_followers, attach_arm_followers).chain(),
        );
        app.add_update_systems(CameraSimulate::SimulatePose, update_spring_arms);
        app.add_update_systems(CameraSimulate::WithPose, update_arm_follower_transforms);
    }
}

//! Headless run of a spring arm following a target walking past a row of pillars.
//!
//! Run with `RUST_LOG=debug cargo run -p shine-camera --example follow_target`.

use bevy::{app::App, math::Vec3, time::Time, transform::components::Transform};
use shine_camera::camera_rig::{
    ArmCollisionWorld, ArmConfig, RigError, SpringArm, SpringArmFollower, SpringArmPlugin, SpringArmRig, StaticGeometry,
};
use std::time::Duration;

fn main() -> Result<(), RigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut geometry = StaticGeometry::new().with_half_space(Vec3::Y, -0.5);
    for i in 0..5 {
        geometry = geometry.with_sphere(Vec3::new(-2.0 + i as f32 * 4.0, 1.0, -2.5), 0.8);
    }

    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.insert_resource(ArmCollisionWorld::new(geometry));
    app.add_plugins(SpringArmPlugin);

    let config = ArmConfig::default()
        .with_arm_length(4.0)
        .with_follow_offset(Vec3::new(0.0, 1.0, 0.0))
        .with_smooth_times(0.1, 0.05)
        .with_free_look(false, 0.0);
    let target = app.world_mut().spawn(Transform::IDENTITY).id();
    let rig = app
        .world_mut()
        .spawn(SpringArmRig::new(SpringArm::new(config)?).with_target(target))
        .id();
    let camera = app.world_mut().spawn(SpringArmFollower { rig }).id();

    let frame = Duration::from_secs_f32(1.0 / 30.0);
    for step in 0..300 {
        let walked = step as f32 * frame.as_secs_f32() * 2.0;
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(target) {
            transform.translation = Vec3::new(walked - 2.0, 0.0, 0.0);
        }

        app.world_mut().resource_mut::<Time>().advance_by(frame);
        app.update();

        if step % 15 == 0 {
            let world = app.world();
            let (Some(rig), Some(camera)) = (world.get::<SpringArmRig>(rig), world.get::<Transform>(camera)) else {
                break;
            };
            let solution = rig.arm.solution();
            log::info!(
                "frame {step:3}: rig {:.2}, camera {:.2}, retraction {:.2}",
                rig.arm.position(),
                camera.translation,
                solution.retraction()
            );
        }
    }

    Ok(())
}

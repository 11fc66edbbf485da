use bevy::{
    app::{App, Update},
    ecs::{
        schedule::{IntoScheduleConfigs, SystemSet},
        system::ScheduleSystem,
    },
};

/// A trait for all abstract systems for fine grained scheduling in the Update stage.
pub trait UpdateSystem: SystemSet + Sized {}

/// Fine grained steps of the camera handling
#[derive(SystemSet, Clone, Hash, Debug, PartialEq, Eq)]
pub enum CameraSimulate {
    /// Bookkeeping of the rigs and their followers.
    PreparePose,
    /// Solve the rigs.
    SimulatePose,
    /// Propagate the solved poses.
    WithPose,
}

impl UpdateSystem for CameraSimulate {}

pub trait AppGameSchedule {
    fn add_update_systems<M>(
        &mut self,
        set: impl UpdateSystem,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self;
}

impl AppGameSchedule for App {
    fn add_update_systems<M>(
        &mut self,
        set: impl UpdateSystem,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        self.add_systems(Update, system.in_set(set));
        self
    }
}

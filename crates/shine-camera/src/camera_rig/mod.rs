//! Spring arm camera rig keeping the camera behind a followed target without clipping into the geometry.

mod rig_error;
pub use self::rig_error::*;
mod collision;
pub use self::collision::*;
mod static_geometry;
pub use self::static_geometry::*;
mod arm_config;
pub use self::arm_config::*;
mod probe_ring;
pub use self::probe_ring::*;
mod arm_solver;
pub use self::arm_solver::*;
mod free_look;
pub use self::free_look::*;
mod spring_arm;
pub use self::spring_arm::*;
mod rig_plugin;
pub use self::rig_plugin::*;

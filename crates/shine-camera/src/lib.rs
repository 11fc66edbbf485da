pub mod app;
pub mod camera_rig;
pub mod math;

mod smooth_damp;
pub use self::smooth_damp::*;

pub mod value;

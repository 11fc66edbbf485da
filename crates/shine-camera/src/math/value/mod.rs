mod value_type;
pub use self::value_type::*;
mod value_error;
pub use self::value_error::*;

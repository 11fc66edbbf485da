mod game_systems;
pub use self::game_systems::*;

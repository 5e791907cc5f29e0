mod components;
mod systems;
mod tic;

pub use components::{
    Buttons, Burst, EnemyState, ExitPortal, InputCmd, PickupItem, PlayerTag, Pos, Shot, Vel,
};
pub use systems::{MOVE_SPEED, TURN_RATE, player_input, snapshot_sprites};
pub use tic::{SIM_FPS, TicRunner};

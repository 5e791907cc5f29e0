use bitflags::bitflags;
use glam::Vec2;

use crate::world::PickupKind;

/// World-space position on the grid plane.
#[derive(Debug, Clone, Copy)]
pub struct Pos(pub Vec2);

#[derive(Debug, Clone, Copy, Default)]
pub struct Vel(pub Vec2);

/// Marks the single player entity the camera follows.
#[derive(Debug, Clone, Copy)]
pub struct PlayerTag;

/// Wandering opponent.  `hurt_tics` counts down the hit flash.
#[derive(Debug, Clone, Copy)]
pub struct EnemyState {
    pub health: i32,
    pub max_health: i32,
    pub hurt_tics: i32,
    /// current wander heading, radians
    pub heading: f32,
    /// tics until the next heading change
    pub rethink: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct PickupItem(pub PickupKind);

/// A shot in flight; despawns on wall impact (leaving a burst) or when
/// `life` runs out.
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub from_player: bool,
    pub damage: i32,
    pub life: i32, // tics
    pub color: u32,
}

/// Wall-impact burst; purely visual, ages out over `total` tics.
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub age: i32,
    pub total: i32,
    pub color: u32,
}

/// Level exit; `phase` drives the marker pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitPortal {
    pub phase: f32,
}

bitflags! {
    /// Momentary action buttons for one tic.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const FIRE = 0x01;
        const RUN  = 0x02;
    }
}

/// One tic worth of player intent, same shape every input back-end fills.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub buttons: Buttons,
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    /// Every defined button maps to an action a system reads; the set
    /// must not grow without a consumer.
    #[test]
    fn button_set_matches_the_bound_actions() {
        assert_eq!(Buttons::all(), Buttons::FIRE | Buttons::RUN);
    }
}

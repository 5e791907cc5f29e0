use std::time::{Duration, Instant};

use glam::{Vec2, vec2};
use hecs::World;
use rand::prelude::*;

use crate::world::{Camera, MapGrid, PickupKind};

use super::components::*;
use super::systems;

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all game-logic systems at a fixed rate.
pub struct TicRunner {
    world: World,
    rng: StdRng,
    last: Instant,
    pending_input: InputCmd,
}

impl TicRunner {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: StdRng::seed_from_u64(seed),
            last: Instant::now(),
            pending_input: InputCmd::default(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn the player plus a population of enemies, pickups and the exit
    /// marker into the open cells of a freshly carved maze.
    pub fn populate(&mut self, map: &MapGrid) -> hecs::Entity {
        let player_pos = vec2(1.5, 1.5);
        let player = self.world.spawn((PlayerTag, Pos(player_pos), Vel::default()));

        let (ex, ey) = map.farthest_open((1, 1));
        self.world.spawn((
            ExitPortal::default(),
            Pos(vec2(ex as f32 + 0.5, ey as f32 + 0.5)),
        ));

        let mut open: Vec<Vec2> = Vec::new();
        for y in 1..map.height() as i32 - 1 {
            for x in 1..map.width() as i32 - 1 {
                if !map.is_wall(x, y) {
                    open.push(vec2(x as f32 + 0.5, y as f32 + 0.5));
                }
            }
        }
        // keep spawns away from the player start
        open.retain(|p| p.distance(player_pos) > 3.0);
        open.shuffle(&mut self.rng);

        let mut cells = open.into_iter();
        for _ in 0..6 {
            if let Some(p) = cells.next() {
                let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
                self.world.spawn((
                    Pos(p),
                    EnemyState {
                        health: 3,
                        max_health: 3,
                        hurt_tics: 0,
                        heading,
                        rethink: self.rng.gen_range(20..70),
                    },
                ));
            }
        }
        for i in 0..6 {
            if let Some(p) = cells.next() {
                let kind = if i % 2 == 0 {
                    PickupKind::Health
                } else {
                    PickupKind::Ammo
                };
                self.world.spawn((Pos(p), PickupItem(kind)));
            }
        }
        player
    }

    /// Record this frame's player intent; consumed by every tic until the
    /// next call replaces it.
    pub fn set_input(&mut self, cmd: InputCmd) {
        self.pending_input = cmd;
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, map: &MapGrid, camera: &mut Camera) {
        while self.last.elapsed() >= TIC {
            self.tick(map, camera);
            self.last += TIC;
        }
    }

    /// Run exactly one fixed-rate tic (the unit the tests drive).
    pub fn tick(&mut self, map: &MapGrid, camera: &mut Camera) {
        let cmd = self.pending_input;
        systems::player_input(&mut self.world, map, camera, &cmd);
        systems::shots(&mut self.world, map, DT);
        systems::enemies(&mut self.world, map, &mut self.rng, DT);
        systems::bursts_and_portal(&mut self.world, DT);
        systems::pickups(&mut self.world, camera.pos);

        // FIRE is edge-triggered by the input layer; one trigger, one shot.
        self.pending_input.buttons -= Buttons::FIRE;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_spawns_player_and_exit() {
        let map = MapGrid::carve_maze(21, 21, 9).unwrap();
        let mut sim = TicRunner::new(9);
        let player = sim.populate(&map);

        assert!(sim.world().get::<&PlayerTag>(player).is_ok());
        let exits = sim.world.query_mut::<&ExitPortal>().into_iter().count();
        assert_eq!(exits, 1);
        let enemies = sim.world.query_mut::<&EnemyState>().into_iter().count();
        assert!(enemies > 0);
    }

    #[test]
    fn tick_is_seed_deterministic() {
        let map = MapGrid::carve_maze(21, 21, 4).unwrap();
        let run = |seed| {
            let mut sim = TicRunner::new(seed);
            sim.populate(&map);
            let mut cam = Camera::new(vec2(1.5, 1.5), vec2(1.0, 0.0), 1.2);
            for _ in 0..50 {
                sim.tick(&map, &mut cam);
            }
            let mut positions: Vec<(u32, u32)> = sim
                .world
                .query_mut::<(&Pos, &EnemyState)>()
                .into_iter()
                .map(|(_, (p, _))| (p.0.x.to_bits(), p.0.y.to_bits()))
                .collect();
            positions.sort_unstable();
            positions
        };
        assert_eq!(run(11), run(11));
    }
}

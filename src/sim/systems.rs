use glam::Vec2;
use hecs::{Entity, World};
use rand::prelude::*;
use smallvec::SmallVec;

use crate::world::{Camera, MapGrid, Sprite, SpriteKind};

use super::components::*;
use super::tic::DT;

pub const MOVE_SPEED: f32 = 2.6; // cells / second
pub const RUN_FACTOR: f32 = 1.7;
pub const TURN_RATE: f32 = 2.4; // rad / second
pub const SHOT_SPEED: f32 = 9.0; // cells / second
pub const SHOT_LIFE: i32 = 70; // tics
pub const BURST_LIFE: i32 = 14; // tics
const PLAYER_RADIUS: f32 = 0.2;
const HIT_RADIUS: f32 = 0.4;

/// Move `pos` by `delta`, sliding along walls one axis at a time so the
/// player skims corridors instead of sticking to them.
fn slide_move(map: &MapGrid, pos: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let mut out = pos;
    let clear = |p: Vec2| {
        !map.blocked(p + Vec2::new(radius, radius))
            && !map.blocked(p + Vec2::new(-radius, radius))
            && !map.blocked(p + Vec2::new(radius, -radius))
            && !map.blocked(p + Vec2::new(-radius, -radius))
    };
    let try_x = Vec2::new(out.x + delta.x, out.y);
    if clear(try_x) {
        out = try_x;
    }
    let try_y = Vec2::new(out.x, out.y + delta.y);
    if clear(try_y) {
        out = try_y;
    }
    out
}

/// Apply one tic of player intent: turn, slide-move, fire.
///
/// The camera is the authoritative player pose; the `PlayerTag` entity's
/// `Pos` mirrors it for systems that only know the ECS.
pub fn player_input(world: &mut World, map: &MapGrid, camera: &mut Camera, cmd: &InputCmd) {
    camera.turn(cmd.turn * TURN_RATE * DT);

    let speed = MOVE_SPEED
        * if cmd.buttons.contains(Buttons::RUN) {
            RUN_FACTOR
        } else {
            1.0
        };
    let wish = camera.wish_move(cmd.forward, cmd.strafe);
    camera.pos = slide_move(map, camera.pos, wish * speed * DT, PLAYER_RADIUS);

    for (_, (pos, _)) in world.query_mut::<(&mut Pos, &PlayerTag)>() {
        pos.0 = camera.pos;
    }

    if cmd.buttons.contains(Buttons::FIRE) {
        world.spawn((
            Pos(camera.pos + camera.dir * 0.3),
            Vel(camera.dir * SHOT_SPEED),
            Shot {
                from_player: true,
                damage: 1,
                life: SHOT_LIFE,
                color: 0x00_FF_F0_A0,
            },
        ));
    }
}

/// Advance every shot, resolving wall impacts and player-bullet hits.
pub fn shots(world: &mut World, map: &MapGrid, dt: f32) {
    // 1. integrate
    for (_, (pos, vel, shot)) in world.query_mut::<(&mut Pos, &Vel, &mut Shot)>() {
        pos.0 += vel.0 * dt;
        shot.life -= 1;
    }

    // 2. resolve; spawns/despawns are deferred out of the queries
    let enemies: SmallVec<[(Entity, Vec2); 8]> = world
        .query_mut::<(&Pos, &EnemyState)>()
        .into_iter()
        .map(|(e, (p, _))| (e, p.0))
        .collect();

    let mut dead: SmallVec<[Entity; 8]> = SmallVec::new();
    let mut hits: SmallVec<[(Entity, i32); 8]> = SmallVec::new();
    let mut burst_spawns: SmallVec<[(Vec2, u32); 8]> = SmallVec::new();

    for (ent, (pos, shot)) in &mut world.query::<(&Pos, &Shot)>() {
        if map.blocked(pos.0) || shot.life <= 0 {
            dead.push(ent);
            burst_spawns.push((pos.0, shot.color));
            continue;
        }
        if shot.from_player {
            if let Some(&(enemy, _)) = enemies
                .iter()
                .find(|(_, ep)| ep.distance(pos.0) < HIT_RADIUS)
            {
                hits.push((enemy, shot.damage));
                dead.push(ent);
                burst_spawns.push((pos.0, 0x00_FF_60_30));
            }
        }
    }

    for (enemy, damage) in hits {
        let killed = {
            let mut state = world.get::<&mut EnemyState>(enemy).unwrap();
            state.health -= damage;
            state.hurt_tics = 6;
            state.health <= 0
        };
        if killed {
            let at = world.get::<&Pos>(enemy).unwrap().0;
            burst_spawns.push((at, 0x00_C0_30_20));
            dead.push(enemy);
        }
    }

    for ent in dead {
        let _ = world.despawn(ent);
    }
    for (at, color) in burst_spawns {
        world.spawn((
            Pos(at),
            Burst {
                age: 0,
                total: BURST_LIFE,
                color,
            },
        ));
    }
}

/// Enemy wander and return fire.
pub fn enemies(world: &mut World, map: &MapGrid, rng: &mut StdRng, dt: f32) {
    let player = world
        .query_mut::<(&Pos, &PlayerTag)>()
        .into_iter()
        .next()
        .map(|(_, (p, _))| p.0);

    let mut volleys: SmallVec<[Vec2; 4]> = SmallVec::new();

    for (_, (pos, state)) in world.query_mut::<(&mut Pos, &mut EnemyState)>() {
        if state.hurt_tics > 0 {
            state.hurt_tics -= 1;
        }
        state.rethink -= 1;
        if state.rethink <= 0 {
            state.heading = rng.gen_range(0.0..std::f32::consts::TAU);
            state.rethink = rng.gen_range(20..70);
        }

        let step = Vec2::from_angle(state.heading) * MOVE_SPEED * 0.35 * dt;
        let moved = slide_move(map, pos.0, step, PLAYER_RADIUS);
        if moved == pos.0 {
            // walked into a wall; pick a new direction next tic
            state.rethink = 0;
        }
        pos.0 = moved;

        if let Some(pp) = player {
            if pp.distance(pos.0) < 6.0 && rng.gen_ratio(1, 40) {
                volleys.push(pos.0);
            }
        }
    }

    if let Some(pp) = player {
        for from in volleys {
            let dir = (pp - from).normalize_or_zero();
            if dir != Vec2::ZERO {
                world.spawn((
                    Pos(from + dir * 0.4),
                    Vel(dir * SHOT_SPEED * 0.6),
                    Shot {
                        from_player: false,
                        damage: 1,
                        life: SHOT_LIFE,
                        color: 0x00_FF_80_20,
                    },
                ));
            }
        }
    }
}

/// Age impact bursts out of existence and advance the exit pulse.
pub fn bursts_and_portal(world: &mut World, dt: f32) {
    let mut done: SmallVec<[Entity; 8]> = SmallVec::new();
    for (ent, burst) in world.query_mut::<&mut Burst>() {
        burst.age += 1;
        if burst.age >= burst.total {
            done.push(ent);
        }
    }
    for ent in done {
        let _ = world.despawn(ent);
    }

    for (_, portal) in world.query_mut::<&mut ExitPortal>() {
        portal.phase += dt * 2.0;
    }
}

/// Collect pickups the player walks over.
pub fn pickups(world: &mut World, player_pos: Vec2) {
    let mut taken: SmallVec<[Entity; 4]> = SmallVec::new();
    for (ent, (pos, _)) in world.query_mut::<(&Pos, &PickupItem)>() {
        if pos.0.distance(player_pos) < 0.5 {
            taken.push(ent);
        }
    }
    for ent in taken {
        let _ = world.despawn(ent);
    }
}

/// Flatten the ECS into the read-only sprite list the renderer consumes.
pub fn snapshot_sprites(world: &World) -> Vec<Sprite> {
    let mut out = Vec::new();
    for (_, (pos, e)) in &mut world.query::<(&Pos, &EnemyState)>() {
        out.push(Sprite::new(
            pos.0,
            SpriteKind::Enemy {
                health: e.health,
                max_health: e.max_health,
                hurt: e.hurt_tics > 0,
            },
        ));
    }
    for (_, (pos, item)) in &mut world.query::<(&Pos, &PickupItem)>() {
        out.push(Sprite::new(pos.0, SpriteKind::Pickup(item.0)));
    }
    for (_, (pos, shot)) in &mut world.query::<(&Pos, &Shot)>() {
        let kind = if shot.from_player {
            SpriteKind::PlayerBullet
        } else {
            SpriteKind::Projectile { color: shot.color }
        };
        out.push(Sprite::new(pos.0, kind));
    }
    for (_, (pos, burst)) in &mut world.query::<(&Pos, &Burst)>() {
        out.push(Sprite::new(
            pos.0,
            SpriteKind::Impact {
                age: burst.age as f32 / burst.total as f32,
                color: burst.color,
            },
        ));
    }
    for (_, (pos, portal)) in &mut world.query::<(&Pos, &ExitPortal)>() {
        out.push(Sprite::new(
            pos.0,
            SpriteKind::ExitMarker {
                phase: portal.phase,
            },
        ));
    }
    out
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn small_room() -> MapGrid {
        let mut cells = vec![1u8; 7 * 7];
        for y in 1..6 {
            for x in 1..6 {
                cells[y * 7 + x] = 0;
            }
        }
        MapGrid::from_cells(7, 7, cells).unwrap()
    }

    #[test]
    fn walls_block_player_movement() {
        let map = small_room();
        let mut world = World::new();
        let mut camera = Camera::new(vec2(1.5, 3.5), vec2(-1.0, 0.0), 1.2);
        world.spawn((PlayerTag, Pos(camera.pos), Vel::default()));

        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            player_input(&mut world, &map, &mut camera, &cmd);
        }
        // pressed against the west wall, never inside it
        assert!(camera.pos.x >= 1.0 + 0.2 - 1e-3);
        assert!(!map.blocked(camera.pos));
    }

    #[test]
    fn shot_hitting_a_wall_becomes_a_burst() {
        let map = small_room();
        let mut world = World::new();
        world.spawn((
            Pos(vec2(1.5, 3.5)),
            Vel(vec2(-SHOT_SPEED, 0.0)),
            Shot {
                from_player: true,
                damage: 1,
                life: SHOT_LIFE,
                color: 0xFFFFFF,
            },
        ));

        for _ in 0..40 {
            shots(&mut world, &map, DT);
        }
        let live_shots = world.query_mut::<&Shot>().into_iter().count();
        let bursts = world.query_mut::<&Burst>().into_iter().count();
        assert_eq!(live_shots, 0);
        assert_eq!(bursts, 1);
    }

    #[test]
    fn player_bullet_damages_and_kills() {
        let map = small_room();
        let mut world = World::new();
        let enemy = world.spawn((
            Pos(vec2(4.5, 3.5)),
            EnemyState {
                health: 1,
                max_health: 3,
                hurt_tics: 0,
                heading: 0.0,
                rethink: 100,
            },
        ));
        world.spawn((
            Pos(vec2(4.2, 3.5)),
            Vel(vec2(SHOT_SPEED, 0.0)),
            Shot {
                from_player: true,
                damage: 1,
                life: SHOT_LIFE,
                color: 0xFFFFFF,
            },
        ));

        shots(&mut world, &map, DT);
        assert!(!world.contains(enemy), "enemy at 1 hp should die to one hit");
    }

    #[test]
    fn pickup_is_collected_in_range_only() {
        let mut world = World::new();
        let near = world.spawn((
            Pos(vec2(1.6, 1.5)),
            PickupItem(crate::world::PickupKind::Ammo),
        ));
        let far = world.spawn((
            Pos(vec2(4.5, 4.5)),
            PickupItem(crate::world::PickupKind::Health),
        ));
        pickups(&mut world, vec2(1.5, 1.5));
        assert!(!world.contains(near));
        assert!(world.contains(far));
    }

    #[test]
    fn snapshot_covers_every_variant() {
        let mut world = World::new();
        world.spawn((
            Pos(vec2(1.0, 1.0)),
            EnemyState {
                health: 2,
                max_health: 3,
                hurt_tics: 1,
                heading: 0.0,
                rethink: 5,
            },
        ));
        world.spawn((
            Pos(vec2(2.0, 1.0)),
            PickupItem(crate::world::PickupKind::Health),
        ));
        world.spawn((
            Pos(vec2(3.0, 1.0)),
            Vel(Vec2::ZERO),
            Shot {
                from_player: false,
                damage: 1,
                life: 5,
                color: 0xAA,
            },
        ));
        world.spawn((
            Pos(vec2(4.0, 1.0)),
            Burst {
                age: 7,
                total: 14,
                color: 0xBB,
            },
        ));
        world.spawn((Pos(vec2(5.0, 1.0)), ExitPortal { phase: 0.3 }));

        let sprites = snapshot_sprites(&world);
        assert_eq!(sprites.len(), 5);
        assert!(sprites.iter().any(|s| matches!(
            s.kind,
            SpriteKind::Enemy { hurt: true, .. }
        )));
        assert!(sprites
            .iter()
            .any(|s| matches!(s.kind, SpriteKind::Impact { age, .. } if (age - 0.5).abs() < 1e-6)));
        assert!(sprites
            .iter()
            .any(|s| matches!(s.kind, SpriteKind::Projectile { color: 0xAA })));
    }
}

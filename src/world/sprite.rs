use glam::Vec2;

/// What a pickup billboard contains, which also decides its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Ammo,
}

/// One world-space billboard handed to the sprite projector.
///
/// Each variant carries exactly the visual state its draw path needs;
/// simulation-only data (velocities, timers, AI state) stays in the ECS.
#[derive(Clone, Copy, Debug)]
pub enum SpriteKind {
    /// Walking opponent.  `hurt` flashes the body for a few frames after a
    /// hit; a live enemy also gets a health bar above the billboard.
    Enemy {
        health: i32,
        max_health: i32,
        hurt: bool,
    },
    Pickup(PickupKind),
    /// Enemy shot in flight.
    Projectile { color: u32 },
    /// The player's own shot; visually a thin bright tracer.
    PlayerBullet,
    /// Radial burst left where a shot hit a wall.  `age` runs 0..1 over the
    /// burst's lifetime and controls its radius.
    Impact { age: f32, color: u32 },
    /// Level exit; `phase` drives a slow pulse.
    ExitMarker { phase: f32 },
}

#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub pos: Vec2,
    pub kind: SpriteKind,
}

impl Sprite {
    pub fn new(pos: Vec2, kind: SpriteKind) -> Self {
        Self { pos, kind }
    }

    /// Billboard height as a fraction of the wall height at equal depth.
    pub fn scale(&self) -> f32 {
        match self.kind {
            SpriteKind::Enemy { .. } => 0.75,
            SpriteKind::Pickup(_) => 0.3,
            SpriteKind::Projectile { .. } => 0.12,
            SpriteKind::PlayerBullet => 0.08,
            SpriteKind::Impact { .. } => 0.5,
            SpriteKind::ExitMarker { .. } => 0.95,
        }
    }

    /// Width / height of the billboard.
    pub fn aspect(&self) -> f32 {
        match self.kind {
            SpriteKind::Enemy { .. } => 0.6,
            SpriteKind::Pickup(_) => 1.0,
            SpriteKind::Projectile { .. } | SpriteKind::PlayerBullet => 0.5,
            SpriteKind::Impact { .. } => 1.0,
            SpriteKind::ExitMarker { .. } => 0.5,
        }
    }

    /// Base body color before distance shading.
    pub fn color(&self) -> u32 {
        match self.kind {
            SpriteKind::Enemy { hurt: true, .. } => 0x00_FF_E0_E0,
            SpriteKind::Enemy { .. } => 0x00_B0_20_20,
            SpriteKind::Pickup(PickupKind::Health) => 0x00_30_D0_50,
            SpriteKind::Pickup(PickupKind::Ammo) => 0x00_D0_B0_30,
            SpriteKind::Projectile { color } | SpriteKind::Impact { color, .. } => color,
            SpriteKind::PlayerBullet => 0x00_FF_F0_A0,
            SpriteKind::ExitMarker { phase } => {
                // slow green pulse
                let g = 0x90 + (phase.sin().abs() * 96.0) as u32;
                0x00_20_00_20 | (g << 8)
            }
        }
    }
}

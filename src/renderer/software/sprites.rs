//! Sprite pass: world-space billboards projected through the inverse
//! camera basis, depth-tested per column against the wall pass.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::{
    renderer::{scale_rgb, shade},
    world::{Camera, Sprite, SpriteKind},
};

use super::Software;

/// A sprite that survived projection, in screen space.
#[derive(Clone, Copy)]
pub struct VisSprite {
    pub sprite: Sprite,
    /// Camera-space forward distance; what the per-column depth test
    /// compares against the wall depth buffer.
    pub depth: f32,
    pub screen_x: i32,
    /// Inclusive billboard extents, not yet clamped to the screen.
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
    pub light: f32,
}

/// Billboards that stand on the floor (vs. flying at eye level).
fn floor_anchored(kind: &SpriteKind) -> bool {
    matches!(
        kind,
        SpriteKind::Enemy { .. } | SpriteKind::Pickup(_) | SpriteKind::ExitMarker { .. }
    )
}

impl Software {
    /// Project all sprites into screen space, farthest first.
    ///
    /// The painter's sort uses `total_cmp`, so a NaN-positioned sprite
    /// cannot panic the frame; it sorts to an end and the `transform_y`
    /// test culls it.
    pub fn build_vis_sprites(&self, camera: &Camera, sprites: &[Sprite]) -> Vec<VisSprite> {
        let dist2 = |s: &Sprite| (s.pos - camera.pos).length_squared();
        let mut order: Vec<&Sprite> = sprites.iter().collect();
        order.sort_by(|a, b| dist2(b).total_cmp(&dist2(a)));

        let inv_det = 1.0 / camera.det();
        let mut out = Vec::with_capacity(order.len());

        for s in order {
            let rel: Vec2 = s.pos - camera.pos;
            // inverse of the (plane, dir) basis
            let transform_x = inv_det * (camera.dir.y * rel.x - camera.dir.x * rel.y);
            let transform_y = inv_det * (-camera.plane.y * rel.x + camera.plane.x * rel.y);
            if !(transform_y > 0.0) {
                continue; // behind the camera (or degenerate position)
            }

            let screen_x = (self.half_w * (1.0 + transform_x / transform_y)) as i32;
            let full_h = self.height_f / transform_y; // wall height at this depth
            let sp_h = full_h * s.scale();
            let sp_w = sp_h * s.aspect();

            // floor-standers share the wall's floor line; the rest hover
            // at eye level
            let y1 = if floor_anchored(&s.kind) {
                (self.half_h + full_h * 0.5) as i32
            } else {
                (self.half_h + sp_h * 0.5) as i32
            };
            let y0 = y1 - sp_h as i32;

            let x0 = screen_x - (sp_w * 0.5) as i32;
            let x1 = x0 + (sp_w as i32).max(1);
            if x1 < 0 || x0 >= self.width as i32 {
                continue; // entirely off-screen
            }

            out.push(VisSprite {
                sprite: *s,
                depth: transform_y,
                screen_x,
                x0,
                x1,
                y0,
                y1,
                light: shade(transform_y),
            });
        }
        out
    }

    /// Composite an already-sorted sprite list back-to-front.
    pub fn draw_sprites(&mut self, vis: &[VisSprite]) {
        for vs in vis {
            match vs.sprite.kind {
                SpriteKind::Impact { age, .. } => self.draw_burst(vs, age),
                _ => self.draw_billboard(vs),
            }
        }
    }

    fn draw_billboard(&mut self, vs: &VisSprite) {
        let color = scale_rgb(vs.sprite.color(), vs.light);
        let x0 = vs.x0.max(0);
        let x1 = vs.x1.min(self.width as i32 - 1);
        let y0 = vs.y0.max(0);
        let y1 = vs.y1.min(self.height as i32 - 1);

        for x in x0..=x1 {
            if vs.depth >= self.depth[x as usize] {
                continue; // wall in front of this column
            }
            for y in y0..=y1 {
                self.put_pixel(x as usize, y as usize, color);
            }
        }

        if let SpriteKind::Enemy {
            health, max_health, ..
        } = vs.sprite.kind
        {
            if health > 0 {
                self.draw_health_bar(vs, health, max_health);
            }
        }
    }

    /// Two-segment health bar one bar-height above the billboard top.
    fn draw_health_bar(&mut self, vs: &VisSprite, health: i32, max_health: i32) {
        let bar_h = ((vs.y1 - vs.y0) / 12).max(1);
        let bar_top = vs.y0 - 2 * bar_h;
        let span = vs.x1 - vs.x0;
        let filled = vs.x0 + span * health / max_health.max(1);

        let y0 = bar_top.max(0);
        let y1 = (bar_top + bar_h).min(self.height as i32 - 1);
        let x0 = vs.x0.max(0);
        let x1 = vs.x1.min(self.width as i32 - 1);
        for x in x0..=x1 {
            if vs.depth >= self.depth[x as usize] {
                continue;
            }
            let color = if x <= filled { 0x00_20_E0_20 } else { 0x00_70_18_18 };
            for y in y0..=y1 {
                self.put_pixel(x as usize, y as usize, color);
            }
        }
    }

    /// Radial spoke burst for wall impacts; grows and dims with `age`.
    fn draw_burst(&mut self, vs: &VisSprite, age: f32) {
        let cx = vs.screen_x;
        let cy = (vs.y0 + vs.y1) / 2;
        let radius = ((vs.y1 - vs.y0) as f32 * 0.5 * (0.3 + 0.7 * age)).max(1.0);
        let color = scale_rgb(vs.sprite.color(), vs.light * (1.0 - 0.7 * age));

        const SPOKES: usize = 12;
        for k in 0..SPOKES {
            let (s, c) = (k as f32 / SPOKES as f32 * TAU).sin_cos();
            let mut t = radius * 0.25;
            while t <= radius {
                let x = cx + (c * t) as i32;
                let y = cy + (s * t) as i32;
                if x >= 0
                    && (x as usize) < self.width
                    && y >= 0
                    && (y as usize) < self.height
                    && vs.depth < self.depth[x as usize]
                {
                    self.put_pixel(x as usize, y as usize, color);
                }
                t += 1.0;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/

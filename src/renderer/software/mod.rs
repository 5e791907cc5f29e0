//! CPU rasteriser: one `Vec<u32>` scratch frame, one f32 depth value per
//! screen column, no other state carried across frames.

mod planes;
mod sprites;
mod walls;

pub use sprites::VisSprite;
pub use walls::{Side, WallHit, cast_ray};

use crate::{
    renderer::{Renderer, Rgba},
    world::{Camera, MapGrid, Sprite, TextureBank},
};

/// Software back-end.
///
/// All buffers are per-frame scratch: `begin_frame` resets them, the three
/// render passes fill them, `end_frame` loans the pixels out.  Nothing here
/// survives into the next frame except the allocations themselves.
#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    /// Per-column perpendicular distance of the nearest wall, written by
    /// the wall pass and read (only) by the sprite pass within the same
    /// frame.
    pub depth: Vec<f32>,
    /// Per-column wall slice extents; the floor/ceiling pass paints only
    /// outside these bands so the passes can run wall-first.
    pub wall_top: Vec<i32>,
    pub wall_bot: Vec<i32>,

    pub width: usize,
    pub height: usize,

    pub width_f: f32,
    pub height_f: f32,
    pub half_w: f32,
    pub half_h: f32,
}

/// Frame clear color; only visible if a pass is skipped.
const CLEAR: Rgba = 0x00_10_10_14;

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.width_f = w as f32;
            self.height_f = h as f32;
            self.half_w = self.width_f * 0.5;
            self.half_h = self.height_f * 0.5;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, 0.0);
            self.wall_top.resize(w, 0);
            self.wall_bot.resize(w, 0);
        }
        self.scratch.fill(CLEAR);
        self.depth.fill(f32::MAX);
        // fully open bands until the wall pass narrows them
        self.wall_top.fill(h as i32);
        self.wall_bot.fill(-1);
    }

    fn render_frame(
        &mut self,
        camera: &Camera,
        map: &MapGrid,
        sprites: &[Sprite],
        bank: &TextureBank,
    ) {
        // Caller contract: a non-solid border would hang the DDA loop.
        debug_assert!(map.has_solid_border(), "map border must be solid");

        self.draw_walls(camera, map, bank);
        self.draw_planes(camera, bank);

        let vis = self.build_vis_sprites(camera, sprites);
        self.draw_sprites(&vis);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    #[inline]
    pub(crate) fn put_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        self.scratch[y * self.width + x] = color;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::procedural;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    fn open_room(w: usize, h: usize) -> MapGrid {
        let mut cells = vec![1u8; w * h];
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                cells[y * w + x] = 0;
            }
        }
        MapGrid::from_cells(w, h, cells).unwrap()
    }

    fn bank() -> TextureBank {
        let mut bank = TextureBank::default();
        procedural::install(&mut bank).unwrap();
        bank
    }

    /// Square room, camera facing a wall at exactly 3.0 map units,
    /// 640x400: centre column depth == 3.0 and its wall slice is
    /// ~screen_height/3 pixels tall.
    #[test]
    fn room_scenario_end_to_end() {
        // interior spans x 1..=7, so the facing wall boundary is at x = 8.0
        let map = open_room(9, 9);
        let camera = Camera::new(vec2(5.0, 4.5), vec2(1.0, 0.0), FRAC_PI_2);
        let mut sw = Software::default();
        sw.begin_frame(640, 400);
        sw.render_frame(&camera, &map, &[], &bank());

        assert!((sw.depth[320] - 3.0).abs() < 1e-3);
        let slice = sw.wall_bot[320] - sw.wall_top[320] + 1;
        assert!((slice - 400 / 3).abs() <= 2, "slice height was {slice}");
    }

    /// Every pixel of the frame gets painted by walls, floor or ceiling –
    /// the clear color never survives a full render of a closed room.
    #[test]
    fn closed_room_leaves_no_background() {
        let map = open_room(9, 9);
        let camera = Camera::new(vec2(4.5, 4.5), vec2(0.7, 0.3), FRAC_PI_2);
        let mut sw = Software::default();
        sw.begin_frame(160, 120);
        sw.render_frame(&camera, &map, &[], &bank());

        assert!(sw.scratch.iter().all(|&px| px != CLEAR));
    }

    #[test]
    fn depth_buffer_is_written_for_every_column() {
        let map = open_room(9, 9);
        let camera = Camera::new(vec2(4.5, 4.5), vec2(1.0, 0.0), FRAC_PI_2);
        let mut sw = Software::default();
        sw.begin_frame(80, 50);
        sw.render_frame(&camera, &map, &[], &bank());
        assert!(sw.depth.iter().all(|&d| d < f32::MAX && d > 0.0));
    }
}

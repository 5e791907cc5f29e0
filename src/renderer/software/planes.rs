//! Floor/ceiling pass: perspective-correct row marching below and above
//! the horizon.
//!
//! Unlike the wall pass this works per *row*: all pixels of one screen row
//! lie at the same distance, so the world-space sample position can be
//! marched across the row with a constant step.  No depth test – the wall
//! bands recorded by the wall pass tell us which pixels are backdrop.

use crate::{
    renderer::{scale_rgb, shade},
    world::{Camera, TextureBank},
};

use super::Software;

impl Software {
    pub fn draw_planes(&mut self, camera: &Camera, bank: &TextureBank) {
        let floor_tex = bank.texture_or_missing(bank.id_or_missing("FLOOR"));
        let ceil_tex = bank.texture_or_missing(bank.id_or_missing("CEIL"));

        let (ray0, ray1) = camera.edge_rays();
        // camera height above the floor plane, in screen-space units
        let pos_z = 0.5 * self.height_f;
        let horizon = self.height / 2;

        // Rows at the horizon itself have unbounded distance; they are
        // always covered by a wall slice (every slice straddles the
        // horizon in a bordered map), so start one row down.
        for y in horizon + 1..self.height {
            let row_offset = y as f32 - self.half_h;
            // similar triangles: eye height over vertical screen offset
            let row_dist = pos_z / row_offset;
            let light = shade(row_dist);

            let step = (ray1 - ray0) * (row_dist / self.width_f);
            let mut world = camera.pos + ray0 * row_dist;

            let ceil_y = self.height - 1 - y;
            for x in 0..self.width {
                if y as i32 > self.wall_bot[x] {
                    let px = scale_rgb(floor_tex.sample_world(world), light);
                    self.put_pixel(x, y, px);
                }
                if (ceil_y as i32) < self.wall_top[x] {
                    let px = scale_rgb(ceil_tex.sample_world(world), light);
                    self.put_pixel(x, ceil_y, px);
                }
                world += step;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use crate::renderer::Renderer;
    use crate::renderer::software::Software;
    use crate::world::{Camera, MapGrid, TextureBank, procedural};
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    fn setup() -> (Software, Camera, MapGrid, TextureBank) {
        let mut cells = vec![1u8; 13 * 13];
        for y in 1..12 {
            for x in 1..12 {
                cells[y * 13 + x] = 0;
            }
        }
        let map = MapGrid::from_cells(13, 13, cells).unwrap();
        let camera = Camera::new(vec2(6.5, 6.5), vec2(1.0, 0.0), FRAC_PI_2);
        let mut bank = TextureBank::default();
        procedural::install(&mut bank).unwrap();
        let mut sw = Software::default();
        sw.begin_frame(200, 150);
        (sw, camera, map, bank)
    }

    /// The bottom row is the nearest floor: it must be painted and brighter
    /// than a row further up (closer to the horizon = further away).
    #[test]
    fn floor_shading_falls_off_with_row_distance() {
        let (mut sw, camera, map, bank) = setup();
        sw.draw_walls(&camera, &map, &bank);
        sw.draw_planes(&camera, &bank);

        // Compare whole-row brightness so texel variation averages out.
        let luma = |px: u32| (px >> 16 & 0xFF) + (px >> 8 & 0xFF) + (px & 0xFF);
        let row_luma = |y: usize| -> u32 { (0..200).map(|x| luma(sw.scratch[y * 200 + x])).sum() };
        let near = row_luma(149);
        let far = row_luma(120);
        assert!(near > 0);
        assert!(near > far, "near row {near} should be brighter than {far}");
    }

    /// Floor and ceiling are mirrored around the horizon: the rows they
    /// paint never intrude into the wall bands.
    #[test]
    fn planes_respect_wall_bands() {
        let (mut sw, camera, map, bank) = setup();
        sw.draw_walls(&camera, &map, &bank);
        let wall_band: Vec<u32> = (0..200)
            .map(|x| sw.scratch[(sw.wall_top[x] as usize + 2) * 200 + x])
            .collect();
        sw.draw_planes(&camera, &bank);
        for (x, &before) in wall_band.iter().enumerate() {
            let after = sw.scratch[(sw.wall_top[x] as usize + 2) * 200 + x];
            assert_eq!(before, after, "wall pixel at column {x} was overwritten");
        }
    }
}

//! Wall pass: one DDA grid traversal per screen column.

use glam::Vec2;

use crate::{
    renderer::{UNREACHABLE_DIST, Y_SIDE_SHADE, scale_rgb, shade},
    world::{Camera, CellId, MapGrid, TextureBank, procedural},
};

use super::Software;

/// Which cell boundary the ray crossed last when it found the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

/// Result of casting a single ray into the grid.
#[derive(Clone, Copy, Debug)]
pub struct WallHit {
    /// Distance along the camera's forward axis, *not* Euclidean distance
    /// to the hit point.  Euclidean would bow the image outwards (fisheye).
    pub perp_dist: f32,
    pub cell: CellId,
    pub side: Side,
    /// Fractional position of the hit along the wall edge, in `[0, 1)`,
    /// mirrored so the texture reads the same from both approach sides.
    pub wall_u: f32,
}

/// Step a ray cell-by-cell until it lands in a wall cell.
///
/// Terminates because the map border is solid – `MapGrid` enforces the
/// contract at construction, so no iteration ceiling is kept here.
pub fn cast_ray(pos: Vec2, ray_dir: Vec2, map: &MapGrid) -> WallHit {
    let mut map_x = pos.x.floor() as i32;
    let mut map_y = pos.y.floor() as i32;

    // Cost of crossing one full cell on each axis.  A zero component gets
    // the unreachable sentinel so that axis simply never wins the race
    // below; keeps the loop branch-free of special cases.
    let delta_dist_x = if ray_dir.x == 0.0 {
        UNREACHABLE_DIST
    } else {
        (1.0 / ray_dir.x).abs()
    };
    let delta_dist_y = if ray_dir.y == 0.0 {
        UNREACHABLE_DIST
    } else {
        (1.0 / ray_dir.y).abs()
    };

    // Step direction and distance to the first boundary on each axis,
    // from the fractional position inside the starting cell.
    let (step_x, mut side_dist_x) = if ray_dir.x < 0.0 {
        (-1, (pos.x - map_x as f32) * delta_dist_x)
    } else {
        (1, (map_x as f32 + 1.0 - pos.x) * delta_dist_x)
    };
    let (step_y, mut side_dist_y) = if ray_dir.y < 0.0 {
        (-1, (pos.y - map_y as f32) * delta_dist_y)
    } else {
        (1, (map_y as f32 + 1.0 - pos.y) * delta_dist_y)
    };

    // Advance along whichever axis reaches its next gridline first.
    let side = loop {
        let side = if side_dist_x < side_dist_y {
            side_dist_x += delta_dist_x;
            map_x += step_x;
            Side::X
        } else {
            side_dist_y += delta_dist_y;
            map_y += step_y;
            Side::Y
        };
        if map.is_wall(map_x, map_y) {
            break side;
        }
    };

    // Pull back one step on the hit axis: the accumulated side distance is
    // measured to the *far* boundary of the wall cell.
    let perp_dist = match side {
        Side::X => side_dist_x - delta_dist_x,
        Side::Y => side_dist_y - delta_dist_y,
    };

    // Exact hit fraction along the wall edge comes from the other axis.
    let wall_x = match side {
        Side::X => pos.y + perp_dist * ray_dir.y,
        Side::Y => pos.x + perp_dist * ray_dir.x,
    };
    let mut wall_u = wall_x - wall_x.floor();
    // Mirror so the texture is not flipped when seen from the other side.
    if (side == Side::X && ray_dir.x > 0.0) || (side == Side::Y && ray_dir.y < 0.0) {
        wall_u = 1.0 - wall_u;
    }

    WallHit {
        perp_dist,
        cell: map.cell(map_x, map_y),
        side,
        wall_u,
    }
}

impl Software {
    /// Cast and rasterise every column, filling the depth buffer and the
    /// wall bands the floor/ceiling pass clips against.
    pub fn draw_walls(&mut self, camera: &Camera, map: &MapGrid, bank: &TextureBank) {
        let h = self.height as i32;

        for x in 0..self.width {
            let hit = cast_ray(camera.pos, camera.ray_dir(x, self.width), map);

            // camera sitting on a wall boundary would divide by zero
            let perp = hit.perp_dist.max(1e-4);
            self.depth[x] = perp;

            let slice_h = self.height_f / perp;
            let top_f = self.half_h - slice_h * 0.5;
            let y0 = (top_f as i32).max(0);
            let y1 = ((self.half_h + slice_h * 0.5) as i32).min(h - 1);
            self.wall_top[x] = y0;
            self.wall_bot[x] = y1;

            let tex = bank.texture_or_missing(procedural::wall_texture(bank, hit.cell));
            let size = tex.size() as f32;
            let tex_x = ((hit.wall_u * size) as i32).min(tex.size() as i32 - 1);

            let light = shade(perp)
                * match hit.side {
                    Side::X => 1.0,
                    Side::Y => Y_SIDE_SHADE,
                };

            // vertical texture step, accounting for the clipped top
            let v_step = size / slice_h;
            let mut v = (y0 as f32 - top_f) * v_step;
            for y in y0..=y1 {
                let color = tex.texel(tex_x, v as i32);
                self.put_pixel(x, y as usize, scale_rgb(color, light));
                v += v_step;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/

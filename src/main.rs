//! Top-down maze viewer – a debugging aid for the grid generator.
//!
//! ```bash
//! cargo run --bin map_view -- [seed]
//! ```

use minifb::{Key, Window, WindowOptions};

use glam::vec2;
use raymaze_rs::world::{Camera, MapGrid};

const WIDTH: usize = 768;
const HEIGHT: usize = 768;

fn main() -> anyhow::Result<()> {
    let seed: u64 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "1".into())
        .parse()?;

    let map = MapGrid::carve_maze(31, 31, seed)?;
    let camera = Camera::new(vec2(1.5, 1.5), vec2(1.0, 0.0), 90_f32.to_radians());

    // map-space → screen-space: uniform scale with a 5 % margin
    let scale = (WIDTH.min(HEIGHT) as f32 / map.width().max(map.height()) as f32) * 0.95;
    let cell_px = scale as usize;
    let offset = ((WIDTH as f32 - map.width() as f32 * scale) * 0.5) as usize;

    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            let cell = map.cell(x, y);
            let color = match cell {
                0 => 0x00_18_18_18,
                1 => 0x00_A0_44_30,
                2 => 0x00_60_68_70,
                _ => 0x00_50_70_46,
            };
            fill_cell(
                &mut buffer,
                offset + x as usize * cell_px,
                offset + y as usize * cell_px,
                cell_px,
                color,
            );
        }
    }

    // player start marker plus a heading tick
    let px = (offset as f32 + (camera.pos.x) * scale) as i32;
    let py = (offset as f32 + (camera.pos.y) * scale) as i32;
    let hx = px + (camera.dir.x * scale) as i32;
    let hy = py + (camera.dir.y * scale) as i32;
    draw_line(&mut buffer, px, py, hx, hy, 0x00_FF_FF_40);

    // exit cell
    let (ex, ey) = map.farthest_open((1, 1));
    fill_cell(
        &mut buffer,
        offset + ex * cell_px,
        offset + ey * cell_px,
        cell_px,
        0x00_30_E0_60,
    );

    let mut window = Window::new("raymaze map", WIDTH, HEIGHT, WindowOptions::default())?;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

fn fill_cell(buf: &mut [u32], x0: usize, y0: usize, size: usize, color: u32) {
    for y in y0..(y0 + size).min(HEIGHT) {
        for x in x0..(x0 + size).min(WIDTH) {
            buf[y * WIDTH + x] = color;
        }
    }
}

/// Integer Bresenham line drawing.
fn draw_line(buf: &mut [u32], mut x0: i32, mut y0: i32, x1: i32, y1: i32, color: u32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..WIDTH as i32).contains(&x0) && (0..HEIGHT as i32).contains(&y0) {
            buf[y0 as usize * WIDTH + x0 as usize] = color;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

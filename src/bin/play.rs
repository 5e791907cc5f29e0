//! Interactive first-person demo.
//!
//! Arrows/WASD move, Alt strafes, Shift runs, Ctrl or Space fires,
//! Escape quits.

use std::time::{Duration, Instant};

use clap::Parser;
use glam::vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use raymaze_rs::{
    renderer::{Renderer, Software},
    sim::{Buttons, InputCmd, TicRunner, snapshot_sprites},
    world::{Camera, MapGrid, TextureBank, procedural},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(about = "Grid-raycasting maze shooter")]
struct Opts {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Horizontal field of view, degrees
    #[arg(long, default_value_t = 66.0)]
    fov: f32,

    /// Maze size in cells (rounded up to odd)
    #[arg(long, default_value_t = 31)]
    maze: usize,

    /// RNG seed for maze carving and AI
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let map = MapGrid::carve_maze(opts.maze, opts.maze, opts.seed)?;
    let mut bank = TextureBank::default();
    procedural::install(&mut bank)?;

    let mut sim = TicRunner::new(opts.seed);
    sim.populate(&map);

    let mut camera = Camera::new(vec2(1.5, 1.5), vec2(1.0, 0.0), opts.fov.to_radians());
    let mut renderer = Software::default();

    let mut win = Window::new(
        "raymaze software render",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- build one InputCmd per frame -------------------- */
        let mut cmd = InputCmd::default();

        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }

        let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
        if alt {
            /* Alt + ←/→  = strafe */
            if win.is_key_down(Key::Left) {
                cmd.strafe -= 1.0;
            }
            if win.is_key_down(Key::Right) {
                cmd.strafe += 1.0;
            }
        } else {
            /* plain ←/→   = turn   */
            if win.is_key_down(Key::Left) {
                cmd.turn += 1.0;
            }
            if win.is_key_down(Key::Right) {
                cmd.turn -= 1.0;
            }
        }

        /* WASD strafing mirrors arrow-key strafing */
        if win.is_key_down(Key::A) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            cmd.strafe += 1.0;
        }

        if win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift) {
            cmd.buttons |= Buttons::RUN;
        }
        // edge-trigger so holding the key doesn't hose ammo
        if win.is_key_pressed(Key::LeftCtrl, KeyRepeat::No)
            || win.is_key_pressed(Key::Space, KeyRepeat::No)
        {
            cmd.buttons |= Buttons::FIRE;
        }

        /* simulate ------------------------------------------------------- */
        sim.set_input(cmd);
        sim.pump(&map, &mut camera);

        /* draw ----------------------------------------------------------- */
        let sprites = snapshot_sprites(sim.world());
        renderer.begin_frame(opts.width, opts.height);
        renderer.render_frame(&camera, &map, &sprites, &bank);
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, w, h).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

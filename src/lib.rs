//! Grid-raycasting maze shooter.
//!
//! The crate splits into three layers:
//!
//! * [`world`] – immutable-per-frame data the renderer consumes: camera pose,
//!   the tile grid, textures and the sprite snapshot.
//! * [`renderer`] – the software rasteriser: DDA wall casting,
//!   perspective-correct floor/ceiling texturing and depth-tested billboards.
//! * [`sim`] – the game-logic collaborator that mutates the world between
//!   frames and hands the renderer a read-only snapshot.

pub mod renderer;
pub mod sim;
pub mod world;

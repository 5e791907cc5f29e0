mod camera;
mod grid;
mod sprite;
mod texture;

pub use camera::Camera;
pub use grid::{CellId, GridError, MapGrid};
pub use sprite::{PickupKind, Sprite, SpriteKind};
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId, procedural};

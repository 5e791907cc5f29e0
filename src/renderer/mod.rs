//! Rendering abstraction layer.
//!
//! *The rest of the game never touches a pixel buffer directly.*
//! It hands a read-only frame snapshot – camera, grid, sprites, textures –
//! to a type that implements [`Renderer`] and gets a finished frame back
//! through `end_frame`'s loan closure.
//!
//! One back-end exists today ([`software`]); the trait keeps the seam open
//! without the game logic knowing how columns get rasterised.

use crate::world::{Camera, MapGrid, Sprite, TextureBank};

/// Pixel format of the software frame-buffer (`0x00RRGGBB`).
pub type Rgba = u32;

/// Stand-in step cost for a ray component that is exactly zero: the ray
/// never crosses gridlines on that axis, so the axis must always lose the
/// "smaller side-distance" race.  Large enough to be effectively
/// unreachable, small enough that adding a handful of steps cannot
/// overflow an `f32`.
pub const UNREACHABLE_DIST: f32 = 1e30;

/// Distance at which surfaces fade to the minimum shade.
pub const FADE_DIST: f32 = 14.0;

/// Shade floor – nothing ever goes fully black.
pub const MIN_SHADE: f32 = 0.18;

/// Extra multiplier for walls hit on a y-boundary; two-tone directional
/// "lighting" without a light model.
pub const Y_SIDE_SHADE: f32 = 0.7;

/// Distance attenuation, applied multiplicatively per color channel.
#[inline]
pub fn shade(dist: f32) -> f32 {
    (1.0 - dist / FADE_DIST).max(MIN_SHADE)
}

/// Scale each channel of a packed `0x00RRGGBB` color.
#[inline]
pub fn scale_rgb(color: Rgba, f: f32) -> Rgba {
    let r = ((color >> 16 & 0xFF) as f32 * f) as u32;
    let g = ((color >> 8 & 0xFF) as f32 * f) as u32;
    let b = ((color & 0xFF) as f32 * f) as u32;
    (r << 16) | (g << 8) | b
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one complete frame: walls (filling the per-column depth
    /// buffer), floor/ceiling, then depth-tested sprites back-to-front.
    ///
    /// Pure with respect to its inputs: nothing in `camera`, `map`,
    /// `sprites` or `bank` is mutated.
    fn render_frame(
        &mut self,
        camera: &Camera,
        map: &MapGrid,
        sprites: &[Sprite],
        bank: &TextureBank,
    );

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// `submit(&[Rgba], w, h)` runs exactly once per frame; a windowed
    /// caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;

pub use software::Software;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_clamps_to_floor() {
        assert!((shade(0.0) - 1.0).abs() < 1e-6);
        assert_eq!(shade(FADE_DIST * 4.0), MIN_SHADE);
    }

    #[test]
    fn scale_rgb_darkens_channels_independently() {
        assert_eq!(scale_rgb(0x00_FF_80_40, 0.5), 0x00_7F_40_20);
        assert_eq!(scale_rgb(0x00_FF_FF_FF, 1.0), 0x00_FF_FF_FF);
    }
}

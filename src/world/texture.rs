// Repository of the square power-of-two pixel grids the renderer samples.
// The renderer and game logic interact through `TextureId` only.

use std::collections::HashMap;

use glam::Vec2;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit `0x00RRGGBB` texels in row-major order.
///
/// Width = height = a power of two, so texture coordinates wrap with a
/// bitmask instead of a modulo.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    size: usize,
    mask: usize,
    pixels: Vec<u32>,
}

impl Texture {
    /// Build a texture from raw texels.
    ///
    /// `size` must be a power of two and `pixels.len()` must equal
    /// `size * size`; both are the bank's insert-time contract, checked
    /// there rather than at every sample.
    pub fn from_pixels(size: usize, pixels: Vec<u32>) -> Self {
        Self {
            size,
            // wrapping: a zero size is caught by the bank's insert check,
            // not here
            mask: size.wrapping_sub(1),
            pixels,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Texel at integer coordinates, wrapping via bitmask on both axes.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> u32 {
        let x = x as usize & self.mask;
        let y = y as usize & self.mask;
        self.pixels[y * self.size + x]
    }

    /// Texel for the fractional part of a world-space position – what the
    /// floor/ceiling caster calls once per pixel.
    #[inline]
    pub fn sample_world(&self, p: Vec2) -> u32 {
        let x = (p.x.fract() * self.size as f32) as i32;
        let y = (p.y.fract() * self.size as f32) as i32;
        self.texel(x, y)
    }
}

/// Convenience checkerboard 8x8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u32 = 0x00_9A_9A_9A;
        const DARK: u32 = 0x00_4A_4A_4A;
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture::from_pixels(8, pix)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Dimension is zero or not a power of two; bitmask wrapping needs 2^n.
    #[error("texture size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Pixel vector does not hold `size * size` texels.
    #[error("expected {expected} texels, got {got}")]
    BadPixelCount { expected: usize, got: usize },
}

/// A format-agnostic cache of textures.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
/// * Insertion validates the square power-of-two contract once, so the
///   renderer's hot path never has to.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![Texture::default()],
        }
    }
}

impl TextureBank {
    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1 // only the checkerboard
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Borrow by id, falling back to the checkerboard on a stale handle.
    /// The renderer uses this so a bad id shows up on screen instead of
    /// tearing down the frame.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or_else(|| &self.data[NO_TEXTURE as usize])
    }

    /// Insert a texture under `name` and return its newly assigned id.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.size == 0 || !tex.size.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo(tex.size));
        }
        if tex.pixels.len() != tex.size * tex.size {
            return Err(TextureError::BadPixelCount {
                expected: tex.size * tex.size,
                got: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*====================================================================*/
/*                     Procedural texture builders                     */
/*====================================================================*/

/// Built-in texture set.  There is no asset pipeline – every surface in the
/// game is synthesised here at startup.
pub mod procedural {
    use super::{Texture, TextureBank, TextureError};

    const SIZE: usize = 64;

    fn build<F: Fn(usize, usize) -> u32>(f: F) -> Texture {
        let mut pix = vec![0u32; SIZE * SIZE];
        for y in 0..SIZE {
            for x in 0..SIZE {
                pix[y * SIZE + x] = f(x, y);
            }
        }
        Texture::from_pixels(SIZE, pix)
    }

    fn brick(x: usize, y: usize, base: u32) -> u32 {
        let row = y / 16;
        let shifted = x + if row & 1 == 0 { 0 } else { 16 };
        let mortar = y % 16 < 2 || shifted % 32 < 2;
        if mortar { 0x00_30_30_30 } else { base }
    }

    fn slab(x: usize, y: usize, base: u32) -> u32 {
        let edge = x % 32 < 2 || y % 32 < 2;
        let speck = (x * 31 + y * 17) % 11 == 0;
        if edge {
            0x00_26_26_26
        } else if speck {
            base.wrapping_add(0x00_10_10_10)
        } else {
            base
        }
    }

    /// Fill `bank` with the standard surface set.  Names: `WALL1..WALL3`
    /// keyed by cell id, plus `FLOOR` and `CEIL`.
    pub fn install(bank: &mut TextureBank) -> Result<(), TextureError> {
        bank.insert("WALL1", build(|x, y| brick(x, y, 0x00_A0_44_30)))?;
        bank.insert("WALL2", build(|x, y| slab(x, y, 0x00_60_68_70)))?;
        bank.insert("WALL3", build(|x, y| brick(x, y, 0x00_50_70_46)))?;
        bank.insert(
            "FLOOR",
            build(|x, y| {
                let g = 0x38 + ((x * 13 + y * 7) % 5) as u32 * 6;
                (g << 16) | (g << 8) | (g - 8)
            }),
        )?;
        bank.insert(
            "CEIL",
            build(|x, y| {
                let panel = x % 16 < 1 || y % 16 < 1;
                if panel { 0x00_18_18_20 } else { 0x00_28_28_34 }
            }),
        )?;
        Ok(())
    }

    /// Map a wall cell id onto its texture id.  Unknown ids fall back to
    /// the checkerboard, which makes contract violations visible on screen.
    pub fn wall_texture(bank: &TextureBank, cell: u8) -> super::TextureId {
        match cell {
            1 => bank.id_or_missing("WALL1"),
            2 => bank.id_or_missing("WALL2"),
            3 => bank.id_or_missing("WALL3"),
            _ => super::NO_TEXTURE,
        }
    }
}

/*====================================================================*/
/*                               Tests                                 */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn flat(size: usize, color: u32) -> Texture {
        Texture::from_pixels(size, vec![color; size * size])
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default();
        let red = bank.insert("RED", flat(4, 0xFF0000)).unwrap();
        let blue = bank.insert("BLUE", flat(4, 0x0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.texture(red).unwrap().texel(0, 0), 0xFF0000);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default();
        bank.insert("WOOD", flat(4, 1)).unwrap();
        let err = bank.insert("WOOD", flat(4, 2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn non_power_of_two_rejected() {
        let mut bank = TextureBank::default();
        let err = bank.insert("ODD", flat(6, 0)).unwrap_err();
        assert_eq!(err, TextureError::NotPowerOfTwo(6));
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        // The infallible variant resolves to the checkerboard instead.
        assert_eq!(bank.texture_or_missing(bad).size(), 8);
    }

    #[test]
    fn texel_wraps_with_bitmask() {
        let mut pix = vec![0u32; 16];
        pix[5] = 0xABCDEF; // (1, 1)
        let tex = Texture::from_pixels(4, pix);
        assert_eq!(tex.texel(1, 1), 0xABCDEF);
        assert_eq!(tex.texel(5, 5), 0xABCDEF);
        assert_eq!(tex.texel(-3, -3), 0xABCDEF);
    }

    #[test]
    fn world_sampling_is_periodic() {
        let tex = Texture::default();
        let a = tex.sample_world(vec2(3.37, 9.12));
        let b = tex.sample_world(vec2(4.37, 9.12));
        assert_eq!(a, b);
    }
}

use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// * Position and heading live on the X–Y grid plane – there is no pitch
///   or roll, so the horizon sits at half screen height.
/// * `plane` is perpendicular to `dir` and its length encodes the field of
///   view; `dir` and `plane` are always rotated by the same matrix so the
///   ratio `|plane| / |dir|` (and thus the FoV) never drifts.
///
/// The renderer never mutates a camera – rotation and movement happen in
/// the simulation, between frames.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec2,   // map units
    pub dir: Vec2,   // unit view direction
    pub plane: Vec2, // camera plane (half viewport in world space)
}

impl Camera {
    /// Create a camera at `pos` looking along `dir` with the camera plane
    /// scaled for `fov` radians of horizontal view.
    pub fn new(pos: Vec2, dir: Vec2, fov: f32) -> Self {
        let dir = dir.normalize();
        let plane = dir.perp() * (fov * 0.5).tan();
        Self { pos, dir, plane }
    }

    /*──────────────────────── projection ────────────────────────────*/

    /// Ray direction for screen column `x` of a `width`-column viewport.
    ///
    /// `camera_x` is the column in normalised device coordinates, –1 at the
    /// left edge and +1 at the right edge.
    #[inline]
    pub fn ray_dir(&self, x: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * x as f32 / width as f32 - 1.0;
        self.dir + self.plane * camera_x
    }

    /// Leftmost (`camera_x = -1`) and rightmost (`camera_x = +1`) rays,
    /// used by the floor/ceiling caster to march whole rows at once.
    #[inline]
    pub fn edge_rays(&self) -> (Vec2, Vec2) {
        (self.dir - self.plane, self.dir + self.plane)
    }

    /// Signed area of the `(plane, dir)` basis.
    ///
    /// Constant across rotations; its reciprocal is the inverse-projection
    /// factor the sprite projector uses.
    #[inline]
    pub fn det(&self) -> f32 {
        self.plane.x * self.dir.y - self.dir.x * self.plane.y
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Rotate heading by `angle` radians (positive = counter-clockwise).
    /// `dir` and `plane` go through the same rotation so the FoV holds.
    pub fn turn(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        self.dir = vec2(
            self.dir.x * c - self.dir.y * s,
            self.dir.x * s + self.dir.y * c,
        );
        self.plane = vec2(
            self.plane.x * c - self.plane.y * s,
            self.plane.x * s + self.plane.y * c,
        );
    }

    /// Desired displacement for `forward` / `side` input; sliding the result
    /// along walls is the simulation's job, not ours.
    #[inline]
    pub fn wish_move(&self, forward: f32, side: f32) -> Vec2 {
        self.dir * forward + self.dir.perp() * side
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn ray_dir_spans_the_plane() {
        let cam = Camera::new(Vec2::ZERO, vec2(1.0, 0.0), FRAC_PI_2);
        // Centre column looks straight down `dir`.
        let mid = cam.ray_dir(320, 640);
        assert!((mid - cam.dir).length() < 1e-5);
        // Left edge is dir - plane.
        let left = cam.ray_dir(0, 640);
        assert!((left - (cam.dir - cam.plane)).length() < 1e-5);
    }

    #[test]
    fn full_turn_restores_pose() {
        let mut cam = Camera::new(Vec2::ZERO, vec2(1.0, 0.0), FRAC_PI_2);
        let (dir0, plane0) = (cam.dir, cam.plane);
        let steps = 720;
        for _ in 0..steps {
            cam.turn(TAU / steps as f32);
        }
        assert!((cam.dir - dir0).length() < 1e-4);
        assert!((cam.plane - plane0).length() < 1e-4);
    }

    #[test]
    fn fov_determinant_is_rotation_invariant() {
        let mut cam = Camera::new(Vec2::ZERO, vec2(0.3, 0.7), 1.2);
        let det0 = cam.det().abs();
        for _ in 0..37 {
            cam.turn(0.173);
            assert!((cam.det().abs() - det0).abs() < 1e-5);
        }
    }

    #[test]
    fn plane_stays_perpendicular() {
        let mut cam = Camera::new(Vec2::ZERO, vec2(1.0, 0.0), FRAC_PI_2);
        cam.turn(1.234);
        assert!(cam.dir.dot(cam.plane).abs() < 1e-6);
    }
}

use std::collections::VecDeque;

use glam::Vec2;
use rand::prelude::*;

/// One map cell: `0` is passable, anything `>0` is a wall and doubles as the
/// wall-texture selector.
pub type CellId = u8;

/// Things that can go wrong when building a grid from raw cells.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    /// Width/height under 3 cannot even hold a border plus one open cell.
    #[error("grid of {0}x{1} is too small")]
    TooSmall(usize, usize),

    /// `cells.len()` does not match `width * height`.
    #[error("cell count {got} does not match {w}x{h}")]
    BadCellCount { w: usize, h: usize, got: usize },

    /// A border cell is open.  The DDA wall caster relies on a solid outer
    /// ring to terminate, so such a grid is rejected outright.
    #[error("border cell ({0}, {1}) is open")]
    OpenBorder(usize, usize),
}

/// Rectangular tile grid, immutable for the duration of a frame.
///
/// Invariant: the outer border is entirely wall.  Every constructor either
/// establishes it (`solid`, `carve_maze`) or verifies it (`from_cells`);
/// nothing in this module can undo it afterwards.
#[derive(Clone, Debug)]
pub struct MapGrid {
    width: usize,
    height: usize,
    cells: Vec<CellId>,
}

impl MapGrid {
    /// Grid of the given size filled entirely with wall id 1.
    pub fn solid(width: usize, height: usize) -> Result<Self, GridError> {
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall(width, height));
        }
        Ok(Self {
            width,
            height,
            cells: vec![1; width * height],
        })
    }

    /// Wrap caller-supplied cells, verifying shape and the border contract.
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellId>) -> Result<Self, GridError> {
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall(width, height));
        }
        if cells.len() != width * height {
            return Err(GridError::BadCellCount {
                w: width,
                h: height,
                got: cells.len(),
            });
        }
        let grid = Self {
            width,
            height,
            cells,
        };
        match grid.first_open_border() {
            Some((x, y)) => Err(GridError::OpenBorder(x, y)),
            None => Ok(grid),
        }
    }

    /*──────────────────────── queries ───────────────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at integer coordinates.  Callers stay in range; the wall caster
    /// can only leave the grid if the border invariant was broken.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> CellId {
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) > 0
    }

    /// Wall test at a world-space position (for movement collision).
    #[inline]
    pub fn blocked(&self, p: Vec2) -> bool {
        let (x, y) = (p.x.floor() as i32, p.y.floor() as i32);
        x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || self.is_wall(x, y)
    }

    pub fn has_solid_border(&self) -> bool {
        self.first_open_border().is_none()
    }

    fn first_open_border(&self) -> Option<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        for x in 0..w {
            if self.cells[x] == 0 {
                return Some((x, 0));
            }
            if self.cells[(h - 1) * w + x] == 0 {
                return Some((x, h - 1));
            }
        }
        for y in 0..h {
            if self.cells[y * w] == 0 {
                return Some((0, y));
            }
            if self.cells[y * w + w - 1] == 0 {
                return Some((w - 1, y));
            }
        }
        None
    }

    /// Open cell furthest (by BFS hops) from `from`; where the exit goes.
    pub fn farthest_open(&self, from: (usize, usize)) -> (usize, usize) {
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        let mut last = from;
        seen[from.1 * self.width + from.0] = true;
        queue.push_back(from);
        while let Some((x, y)) = queue.pop_front() {
            last = (x, y);
            for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                // `from` may sit on the border, where neighbors leave the grid
                if nx < 0 || ny < 0 || nx >= self.width as i32 || ny >= self.height as i32 {
                    continue;
                }
                let idx = ny as usize * self.width + nx as usize;
                if self.cells[idx] == 0 && !seen[idx] {
                    seen[idx] = true;
                    queue.push_back((nx as usize, ny as usize));
                }
            }
        }
        last
    }

    /*──────────────────────── carving ───────────────────────────────*/

    #[inline]
    fn carve(&mut self, x: usize, y: usize) {
        self.cells[y * self.width + x] = 0;
    }

    /// Depth-first maze carving with an explicit stack.
    ///
    /// Works on the odd lattice (cells at odd coordinates are rooms, the
    /// ones between them are walls to knock through), so `width`/`height`
    /// are rounded up to odd and the border is never touched.  The carve
    /// order is driven by `seed` alone, making layouts reproducible.
    pub fn carve_maze(width: usize, height: usize, seed: u64) -> Result<Self, GridError> {
        let width = width | 1;
        let height = height | 1;
        let mut grid = Self::solid(width, height)?;

        // Texture variety: wall id cycles by 8x8 block so corridors change
        // material as you walk them.
        for y in 0..height {
            for x in 0..width {
                grid.cells[y * width + x] = 1 + ((x / 8 + y / 8) % 3) as CellId;
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let start = (1usize, 1usize);
        let mut stack = vec![start];
        grid.carve(start.0, start.1);

        while let Some(&(cx, cy)) = stack.last() {
            let mut exits: [(i32, i32); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];
            exits.shuffle(&mut rng);

            let next = exits.iter().find_map(|&(dx, dy)| {
                let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
                let inside = nx > 0 && ny > 0 && nx < width as i32 - 1 && ny < height as i32 - 1;
                (inside && grid.is_wall(nx, ny)).then_some((nx as usize, ny as usize))
            });

            match next {
                Some((nx, ny)) => {
                    grid.carve((cx + nx) / 2, (cy + ny) / 2);
                    grid.carve(nx, ny);
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }
        Ok(grid)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn carved_maze_keeps_border_solid() {
        let grid = MapGrid::carve_maze(31, 21, 7).unwrap();
        assert!(grid.has_solid_border());
        // And actually carved something.
        assert!(!grid.is_wall(1, 1));
    }

    #[test]
    fn carving_is_seed_deterministic() {
        let a = MapGrid::carve_maze(21, 21, 42).unwrap();
        let b = MapGrid::carve_maze(21, 21, 42).unwrap();
        assert_eq!(a.cells, b.cells);
    }

    #[test]
    fn open_border_is_rejected() {
        let mut cells = vec![1u8; 5 * 5];
        cells[2] = 0; // hole in the top edge
        let err = MapGrid::from_cells(5, 5, cells).unwrap_err();
        assert_eq!(err, GridError::OpenBorder(2, 0));
    }

    #[test]
    fn bad_cell_count_is_rejected() {
        let err = MapGrid::from_cells(4, 4, vec![1; 15]).unwrap_err();
        assert_eq!(
            err,
            GridError::BadCellCount {
                w: 4,
                h: 4,
                got: 15
            }
        );
    }

    #[test]
    fn blocked_checks_world_coordinates() {
        let mut cells = vec![1u8; 5 * 5];
        for y in 1..4 {
            for x in 1..4 {
                cells[y * 5 + x] = 0;
            }
        }
        let grid = MapGrid::from_cells(5, 5, cells).unwrap();
        assert!(!grid.blocked(vec2(2.5, 2.5)));
        assert!(grid.blocked(vec2(0.5, 2.5)));
        assert!(grid.blocked(vec2(-1.0, 2.5)));
    }

    #[test]
    fn farthest_open_reaches_a_dead_end() {
        let grid = MapGrid::carve_maze(15, 15, 3).unwrap();
        let (x, y) = grid.farthest_open((1, 1));
        assert!(!grid.is_wall(x as i32, y as i32));
        assert_ne!((x, y), (1, 1));
    }

    #[test]
    fn farthest_open_tolerates_a_border_start() {
        let grid = MapGrid::carve_maze(9, 9, 5).unwrap();
        // corner cell: every in-grid neighbor is border wall
        assert_eq!(grid.farthest_open((0, 0)), (0, 0));
        assert_eq!(grid.farthest_open((8, 8)), (8, 8));
    }
}

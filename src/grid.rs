use crate::error::GridError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chebyshev radius of the walkable square forced around the map center
pub const SAFE_ZONE_RADIUS: i32 = 2;

/// Terrain state of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Walkable,
    Obstacle,
}

/// Obstacle predicate consumed by the visibility engine.
///
/// Implementations must be total: coordinates outside
/// `[0, width) x [0, height)` report an obstacle.
pub trait ObstacleMap {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn is_obstacle(&self, x: i32, y: i32) -> bool;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width() && y >= 0 && y < self.height()
    }
}

impl<T: ObstacleMap + ?Sized> ObstacleMap for &T {
    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        (**self).is_obstacle(x, y)
    }
}

/// Immutable terrain model. Cells are stored row-major: id = x + y * width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl GridMap {
    /// Generate a map where every cell outside the center safe zone is an
    /// obstacle with probability `obstacle_density`, reproducible per `seed`.
    pub fn new(width: i32, height: i32, obstacle_density: f64, seed: u64) -> Result<Self, GridError> {
        Self::with_safe_zone(width, height, obstacle_density, seed, SAFE_ZONE_RADIUS)
    }

    /// Same as [`GridMap::new`] with an explicit safe-zone radius.
    ///
    /// Density is clamped into `[0, 1]`. One random draw is made per cell in
    /// row-major order, safe zone included, so the radius never shifts the
    /// layout of the remaining cells.
    pub fn with_safe_zone(
        width: i32,
        height: i32,
        obstacle_density: f64,
        seed: u64,
        safe_zone_radius: i32,
    ) -> Result<Self, GridError> {
        check_dimensions(width, height)?;

        let density = if obstacle_density.is_nan() {
            0.0
        } else {
            obstacle_density.clamp(0.0, 1.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (center_x, center_y) = (width / 2, height / 2);

        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let roll = rng.gen_bool(density);
                let in_safe_zone = (x - center_x).abs() <= safe_zone_radius
                    && (y - center_y).abs() <= safe_zone_radius;
                cells.push(if roll && !in_safe_zone {
                    Cell::Obstacle
                } else {
                    Cell::Walkable
                });
            }
        }

        let map = GridMap { width, height, cells };
        debug!(
            width,
            height,
            seed,
            density,
            obstacles = map.obstacle_count(),
            "generated grid map"
        );
        Ok(map)
    }

    /// Create a map with specific obstacle cells and no safe zone.
    /// Out-of-bounds entries are ignored.
    pub fn with_obstacles(width: i32, height: i32, obstacles: &[(i32, i32)]) -> Result<Self, GridError> {
        check_dimensions(width, height)?;

        let mut cells = vec![Cell::Walkable; (width * height) as usize];
        for &(x, y) in obstacles {
            if x >= 0 && x < width && y >= 0 && y < height {
                cells[(x + y * width) as usize] = Cell::Obstacle;
            }
        }

        Ok(GridMap { width, height, cells })
    }

    /// Parse a text grid: `■` is an obstacle, every other glyph is walkable.
    /// Width comes from the first row; shorter rows are padded walkable.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let height = rows.len() as i32;
        let width = rows.first().map(|row| row.chars().count() as i32).unwrap_or(0);

        let mut obstacles = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate().take(width.max(0) as usize) {
                if ch == '■' {
                    obstacles.push((x as i32, y as i32));
                }
            }
        }

        Self::with_obstacles(width, height, &obstacles)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Cell at the center of the map; always walkable for generated maps
    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Check if a cell at (x, y) is an obstacle
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        match self.cell(x, y) {
            Some(cell) => cell == Cell::Obstacle,
            None => true, // Out of bounds is considered an obstacle
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[self.get_id(x, y) as usize])
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.width
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: i32) -> (i32, i32) {
        (id % self.width, id / self.width)
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Obstacle).count()
    }
}

impl ObstacleMap for GridMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        GridMap::is_obstacle(self, x, y)
    }
}

fn check_dimensions(width: i32, height: i32) -> Result<(), GridError> {
    if width <= 0 || height <= 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    Ok(())
}

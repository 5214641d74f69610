use crate::grid::ObstacleMap;
use crate::visibility::VisibilityState;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Render classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FogLevel {
    /// Never explored since the last reset
    Hidden,
    /// Explored earlier but not visible now
    Dimmed,
    /// Visible in the latest update
    Clear,
}

/// RGBA tints applied per fog level. Clear cells are always transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FogPalette {
    #[serde(default = "default_hidden")]
    pub hidden: [u8; 4],
    #[serde(default = "default_dimmed")]
    pub dimmed: [u8; 4],
}

fn default_hidden() -> [u8; 4] { [20, 20, 30, 255] }
fn default_dimmed() -> [u8; 4] { [50, 50, 70, 160] }

impl Default for FogPalette {
    fn default() -> Self {
        Self {
            hidden: default_hidden(),
            dimmed: default_dimmed(),
        }
    }
}

impl FogPalette {
    pub fn tint(&self, level: FogLevel) -> [u8; 4] {
        match level {
            FogLevel::Hidden => self.hidden,
            FogLevel::Dimmed => self.dimmed,
            FogLevel::Clear => [0, 0, 0, 0],
        }
    }
}

/// Per-cell fog classification, row-major with id = x + y * width
/// (same indexing as `GridMap::get_id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    width: i32,
    height: i32,
    cells: Vec<FogLevel>,
}

impl Overlay {
    fn hidden(width: i32, height: i32) -> Self {
        Overlay {
            width,
            height,
            cells: vec![FogLevel::Hidden; (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Fog level at (x, y), or None outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<FogLevel> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(self.cells[(x + y * self.width) as usize])
    }

    pub fn cells(&self) -> &[FogLevel] {
        &self.cells
    }

    pub fn count(&self, level: FogLevel) -> usize {
        self.cells.iter().filter(|&&cell| cell == level).count()
    }

    /// Render-ready RGBA buffer in the same row-major order as the cells
    pub fn tint(&self, palette: &FogPalette) -> Vec<[u8; 4]> {
        self.cells.iter().map(|&level| palette.tint(level)).collect()
    }

    /// Text dump of the overlay.
    /// - s: observer
    /// - ■: obstacle that has been seen
    /// - o: clear cell
    /// - ▒: dimmed cell
    /// - □: hidden cell
    pub fn to_ascii<M: ObstacleMap>(&self, map: &M, observer: Option<(i32, i32)>) -> String {
        let mut result = String::new();

        for y in 0..self.height {
            for x in 0..self.width {
                let level = self.cells[(x + y * self.width) as usize];
                let symbol = if observer == Some((x, y)) {
                    's'
                } else if level == FogLevel::Hidden {
                    '□'
                } else if map.is_obstacle(x, y) {
                    '■'
                } else if level == FogLevel::Clear {
                    'o'
                } else {
                    '▒'
                };
                result.push(symbol);
            }
            result.push('\n');
        }

        result
    }
}

/// Lazily recomputed overlay, valid until the visibility state changes
#[derive(Debug, Clone)]
pub struct OverlayCache {
    overlay: Overlay,
    valid: bool,
    recomputations: u64,
}

impl OverlayCache {
    pub fn new(width: i32, height: i32) -> Self {
        OverlayCache {
            overlay: Overlay::hidden(width, height),
            valid: false,
            recomputations: 0,
        }
    }

    /// Cached overlay, rebuilt from `state` first if invalidated
    pub fn get_overlay(&mut self, state: &VisibilityState) -> &Overlay {
        if !self.valid {
            self.recompute(state);
        }
        &self.overlay
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of full rebuilds performed so far
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    fn recompute(&mut self, state: &VisibilityState) {
        if self.overlay.width != state.width() || self.overlay.height != state.height() {
            self.overlay = Overlay::hidden(state.width(), state.height());
        }

        for y in 0..state.height() {
            for x in 0..state.width() {
                let level = if state.is_visible(x, y) {
                    FogLevel::Clear
                } else if state.is_explored(x, y) {
                    FogLevel::Dimmed
                } else {
                    FogLevel::Hidden
                };
                self.overlay.cells[(x + y * state.width()) as usize] = level;
            }
        }

        self.valid = true;
        self.recomputations += 1;
        trace!(recomputations = self.recomputations, "rebuilt fog overlay");
    }
}

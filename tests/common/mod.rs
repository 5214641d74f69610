#![allow(dead_code)]

use gridfog::{GridMap, ObstacleMap, VisibilityEngine};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Fixture case stored as JSON under test_data/
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FogTestData {
    #[serde(rename = "testName")]
    pub test_name: String,
    #[serde(rename = "gridRows")]
    pub grid_rows: i32,
    #[serde(rename = "gridCols")]
    pub grid_cols: i32,
    #[serde(rename = "blockedCells")]
    pub blocked_cells: Vec<i32>,
    #[serde(rename = "startX")]
    pub start_x: i32,
    #[serde(rename = "startY")]
    pub start_y: i32,
    #[serde(rename = "sightRange")]
    pub sight_range: u32,
    #[serde(rename = "rayCount")]
    pub ray_count: u32,
    #[serde(rename = "expectedVisible")]
    pub expected_visible: Vec<i32>,
}

/// Parsed text-grid fixture
pub struct StandardTest {
    pub map: GridMap,
    pub start_x: i32,
    pub start_y: i32,
    pub sight_range: u32,
    pub ray_count: u32,
    pub expected_visible: HashSet<i32>,
}

/// Load a test from JSON file
pub fn load_test(path: &Path) -> Result<FogTestData, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let test_data: FogTestData = serde_json::from_str(&contents)?;
    Ok(test_data)
}

pub fn cell_id_to_coords(cell_id: i32, cols: i32) -> (i32, i32) {
    (cell_id % cols, cell_id / cols)
}

/// Visible cell ids after a single update
pub fn visible_ids<M: ObstacleMap>(engine: &VisibilityEngine<M>) -> HashSet<i32> {
    let (width, height) = (engine.map().width(), engine.map().height());
    let mut visible = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            if engine.is_visible(x, y) {
                visible.insert(x + y * width);
            }
        }
    }
    visible
}

/// Run a JSON case. Returns (passed, missing_count, extra_count)
pub fn run_test(test_data: &FogTestData) -> (bool, usize, usize) {
    let blocked: Vec<(i32, i32)> = test_data
        .blocked_cells
        .iter()
        .map(|&id| cell_id_to_coords(id, test_data.grid_cols))
        .collect();
    let map = GridMap::with_obstacles(test_data.grid_cols, test_data.grid_rows, &blocked)
        .expect("fixture dimensions are positive");

    let mut engine = VisibilityEngine::with_ray_count(map, test_data.sight_range, test_data.ray_count);
    engine.update(test_data.start_x, test_data.start_y);

    let actual = visible_ids(&engine);
    let expected: HashSet<i32> = test_data.expected_visible.iter().copied().collect();

    let missing = expected.difference(&actual).count();
    let extra = actual.difference(&expected).count();
    (missing == 0 && extra == 0, missing, extra)
}

/// Parse a standard format test file
/// Format:
/// - `# key = value`: sight_range / ray_count parameters
/// - s: start position (observer)
/// - ■: obstacle, not visible
/// - ▣: obstacle, visible
/// - □: free cell, not visible
/// - o: visible free cell
pub fn parse_standard_test(path: &Path) -> Result<StandardTest, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;

    let mut sight_range = None;
    let mut ray_count = 180;
    let mut grid_lines = Vec::new();

    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        if let Some(param) = line.strip_prefix('#') {
            let (key, value) = param.split_once('=').ok_or("malformed parameter line")?;
            match key.trim() {
                "sight_range" => sight_range = Some(value.trim().parse()?),
                "ray_count" => ray_count = value.trim().parse()?,
                other => return Err(format!("unknown parameter '{}'", other).into()),
            }
        } else {
            grid_lines.push(line);
        }
    }

    if grid_lines.is_empty() {
        return Err("No grid lines found in test file".into());
    }

    let grid_cols = grid_lines[0].chars().count() as i32;
    let grid_rows = grid_lines.len() as i32;

    let mut obstacles = Vec::new();
    let mut start = None;
    let mut expected_visible = HashSet::new();

    for (y, line) in grid_lines.iter().enumerate() {
        if line.chars().count() as i32 != grid_cols {
            return Err(format!("row {} has a different width", y).into());
        }
        for (x, ch) in line.chars().enumerate() {
            let (x, y) = (x as i32, y as i32);
            let cell_id = x + y * grid_cols;

            match ch {
                's' => {
                    start = Some((x, y));
                    expected_visible.insert(cell_id);
                }
                '■' => obstacles.push((x, y)),
                '▣' => {
                    obstacles.push((x, y));
                    expected_visible.insert(cell_id);
                }
                'o' => {
                    expected_visible.insert(cell_id);
                }
                '□' => {}
                other => return Err(format!("unexpected glyph '{}'", other).into()),
            }
        }
    }

    let (start_x, start_y) = start.ok_or("No start position 's' found in test file")?;
    let map = GridMap::with_obstacles(grid_cols, grid_rows, &obstacles)?;

    Ok(StandardTest {
        map,
        start_x,
        start_y,
        sight_range: sight_range.ok_or("missing sight_range parameter")?,
        ray_count,
        expected_visible,
    })
}

/// Obstacle map wrapper counting every `is_obstacle` call
pub struct CountingMap {
    pub inner: GridMap,
    pub queries: Cell<usize>,
}

impl CountingMap {
    pub fn new(inner: GridMap) -> Self {
        CountingMap {
            inner,
            queries: Cell::new(0),
        }
    }

    pub fn take(&self) -> usize {
        self.queries.replace(0)
    }
}

impl ObstacleMap for CountingMap {
    fn width(&self) -> i32 {
        self.inner.width()
    }

    fn height(&self) -> i32 {
        self.inner.height()
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.inner.is_obstacle(x, y)
    }
}

use crate::grid::{GridMap, ObstacleMap};
use crate::overlay::{Overlay, OverlayCache};
use crate::ray::{sample_cell, RayDirection, RayFan, DEFAULT_RAY_COUNT};
use tracing::{debug, trace};

/// Visible and explored matrices for one observer.
///
/// `visible` is rebuilt on every update. `explored` only grows until an
/// explicit reset, and every visible cell is also explored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityState {
    width: i32,
    height: i32,
    visible: Vec<bool>,
    explored: Vec<bool>,
}

impl VisibilityState {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        VisibilityState {
            width,
            height,
            visible: vec![false; len],
            explored: vec![false; len],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((x + y * self.width) as usize)
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |i| self.visible[i])
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |i| self.explored[i])
    }

    /// Mark a cell visible and explored. Out-of-bounds cells are ignored.
    pub fn reveal(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.visible[i] = true;
            self.explored[i] = true;
        }
    }

    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    pub fn clear_all(&mut self) {
        self.visible.fill(false);
        self.explored.fill(false);
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    pub fn explored_count(&self) -> usize {
        self.explored.iter().filter(|&&e| e).count()
    }
}

/// Why a ray stopped marching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayStop {
    /// Reached the sight range, or the next sample fell outside the sight circle
    Range,
    /// Next sample left the grid
    OutOfBounds,
    /// Hit an obstacle; the obstacle itself was revealed
    Obstacle { x: i32, y: i32 },
}

/// Cells one ray revealed, in marching order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RayTrace {
    pub cells: Vec<(i32, i32)>,
    pub stop: RayStop,
}

/// March a ray outward from the observer cell at unit steps `1..=sight_range`.
///
/// `visit` is called for every cell the ray reveals. Each revealed cell costs
/// exactly one obstacle query, so a ray never queries more than
/// `sight_range` times. Samples whose cell lies farther than `sight_range`
/// from the observer (Euclidean, in whole cells) end the ray.
pub fn march_ray<M, F>(
    map: &M,
    origin_x: i32,
    origin_y: i32,
    direction: RayDirection,
    sight_range: u32,
    mut visit: F,
) -> RayStop
where
    M: ObstacleMap + ?Sized,
    F: FnMut(i32, i32),
{
    let range = sight_range.min(i32::MAX as u32) as i32;
    let range_sq = (range as i64) * (range as i64);

    for distance in 1..=range {
        let (x, y) = sample_cell(origin_x, origin_y, direction, distance);

        let (off_x, off_y) = ((x - origin_x) as i64, (y - origin_y) as i64);
        if off_x * off_x + off_y * off_y > range_sq {
            return RayStop::Range;
        }

        if !map.in_bounds(x, y) {
            return RayStop::OutOfBounds;
        }

        visit(x, y);

        if map.is_obstacle(x, y) {
            return RayStop::Obstacle { x, y };
        }
    }

    RayStop::Range
}

/// Collecting variant of [`march_ray`]
pub fn trace_ray<M: ObstacleMap + ?Sized>(
    map: &M,
    origin_x: i32,
    origin_y: i32,
    direction: RayDirection,
    sight_range: u32,
) -> RayTrace {
    let mut cells = Vec::new();
    let stop = march_ray(map, origin_x, origin_y, direction, sight_range, |x, y| {
        cells.push((x, y))
    });
    RayTrace { cells, stop }
}

/// Fog-of-war engine for a single observer.
///
/// Owns the obstacle map (pass `&GridMap` to borrow one instead), the
/// visibility matrices, and the overlay cache. Every mutation invalidates
/// the cache.
#[derive(Debug, Clone)]
pub struct VisibilityEngine<M: ObstacleMap = GridMap> {
    map: M,
    state: VisibilityState,
    fan: RayFan,
    sight_range: u32,
    overlay: OverlayCache,
    last_query_count: usize,
}

impl<M: ObstacleMap> VisibilityEngine<M> {
    pub fn new(map: M, sight_range: u32) -> Self {
        Self::with_ray_count(map, sight_range, DEFAULT_RAY_COUNT)
    }

    pub fn with_ray_count(map: M, sight_range: u32, ray_count: u32) -> Self {
        let (width, height) = (map.width(), map.height());
        VisibilityEngine {
            map,
            state: VisibilityState::new(width, height),
            fan: RayFan::new(ray_count),
            sight_range,
            overlay: OverlayCache::new(width, height),
            last_query_count: 0,
        }
    }

    /// Recompute visibility for an observer at (x, y).
    ///
    /// An out-of-bounds observer clears `visible` and leaves `explored`
    /// untouched. Callers are expected to validate positions with the
    /// obstacle predicate first.
    pub fn update(&mut self, observer_x: i32, observer_y: i32) {
        self.state.clear_visible();
        self.last_query_count = 0;

        if !self.map.in_bounds(observer_x, observer_y) {
            debug!(observer_x, observer_y, "observer outside grid, visibility cleared");
            self.overlay.invalidate();
            return;
        }

        self.state.reveal(observer_x, observer_y);

        let state = &mut self.state;
        let mut queries = 0;
        for direction in self.fan.iter() {
            march_ray(&self.map, observer_x, observer_y, direction, self.sight_range, |x, y| {
                state.reveal(x, y);
                queries += 1;
            });
        }
        self.last_query_count = queries;

        self.overlay.invalidate();
        trace!(
            observer_x,
            observer_y,
            visible = self.state.visible_count(),
            explored = self.state.explored_count(),
            queries,
            "visibility updated"
        );
    }

    /// Whether (x, y) was seen by the latest update; false outside the grid
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.state.is_visible(x, y)
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.state.is_explored(x, y)
    }

    /// Forget everything seen so far (mission boundary)
    pub fn reset_exploration(&mut self) {
        self.state.clear_all();
        self.last_query_count = 0;
        self.overlay.invalidate();
        debug!("exploration reset");
    }

    /// Render classification, rebuilt on first access after a state change
    pub fn overlay(&mut self) -> &Overlay {
        self.overlay.get_overlay(&self.state)
    }

    /// Overlay together with the map it classifies
    pub fn overlay_and_map(&mut self) -> (&Overlay, &M) {
        (self.overlay.get_overlay(&self.state), &self.map)
    }

    pub fn invalidate_overlay(&mut self) {
        self.overlay.invalidate();
    }

    pub fn overlay_cache(&self) -> &OverlayCache {
        &self.overlay
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn sight_range(&self) -> u32 {
        self.sight_range
    }

    /// Takes effect on the next update; current visibility is kept as is
    pub fn set_sight_range(&mut self, sight_range: u32) {
        self.sight_range = sight_range;
    }

    pub fn ray_count(&self) -> usize {
        self.fan.len()
    }

    pub fn fan(&self) -> &RayFan {
        &self.fan
    }

    /// Obstacle queries issued by the latest update
    pub fn last_query_count(&self) -> usize {
        self.last_query_count
    }

    pub fn visible_count(&self) -> usize {
        self.state.visible_count()
    }

    pub fn explored_count(&self) -> usize {
        self.state.explored_count()
    }
}

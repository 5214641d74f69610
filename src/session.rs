use crate::config::Config;
use crate::error::SessionError;
use crate::grid::GridMap;
use crate::overlay::{FogPalette, Overlay};
use crate::visibility::VisibilityEngine;
use serde::Serialize;
use tracing::info;

/// Visible/explored cell counts, as shown on the mission dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FogStats {
    pub visible: usize,
    pub explored: usize,
    pub total: usize,
}

impl std::fmt::Display for FogStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VISIBLE: {}/{} | EXPLORED: {}/{}",
            self.visible, self.total, self.explored, self.total
        )
    }
}

/// One mission's fog of war: the map, the engine and its overlay cache.
///
/// Not shared between observers; every mission builds its own session.
#[derive(Debug, Clone)]
pub struct FogSession {
    engine: VisibilityEngine<GridMap>,
    palette: FogPalette,
    observer: Option<(i32, i32)>,
}

impl FogSession {
    pub fn new(map: GridMap, sight_range: u32, ray_count: u32) -> Self {
        FogSession {
            engine: VisibilityEngine::with_ray_count(map, sight_range, ray_count),
            palette: FogPalette::default(),
            observer: None,
        }
    }

    /// Generate the map described by `config` and wrap it in a session
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        config.validate()?;
        let map = GridMap::with_safe_zone(
            config.map.width,
            config.map.height,
            config.map.obstacle_density,
            config.map.seed,
            config.map.safe_zone_radius,
        )?;

        info!(
            width = map.width(),
            height = map.height(),
            obstacles = map.obstacle_count(),
            sight_range = config.vision.sight_range,
            ray_count = config.vision.ray_count,
            "mission session created"
        );

        let mut session = FogSession::new(map, config.vision.sight_range, config.vision.ray_count);
        session.palette = config.palette;
        Ok(session)
    }

    pub fn map(&self) -> &GridMap {
        self.engine.map()
    }

    pub fn engine(&self) -> &VisibilityEngine<GridMap> {
        &self.engine
    }

    pub fn palette(&self) -> &FogPalette {
        &self.palette
    }

    /// Walkable cell where a mission observer starts
    pub fn start_position(&self) -> (i32, i32) {
        self.map().center()
    }

    /// Latest position passed to `observe`
    pub fn observer(&self) -> Option<(i32, i32)> {
        self.observer
    }

    /// Recompute visibility for the observer's current cell.
    /// Movement must already be validated against the obstacle map.
    pub fn observe(&mut self, x: i32, y: i32) {
        self.observer = Some((x, y));
        self.engine.update(x, y);
    }

    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.map().is_obstacle(x, y)
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.engine.is_visible(x, y)
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.engine.is_explored(x, y)
    }

    /// Clear everything seen so far, e.g. at mission start or restart
    pub fn restart_mission(&mut self) {
        self.engine.reset_exploration();
    }

    pub fn overlay(&mut self) -> &Overlay {
        self.engine.overlay()
    }

    /// Overlay tinted with this session's palette
    pub fn tinted_overlay(&mut self) -> Vec<[u8; 4]> {
        let palette = self.palette;
        self.engine.overlay().tint(&palette)
    }

    pub fn overlay_ascii(&mut self) -> String {
        let observer = self.observer;
        let (overlay, map) = self.engine.overlay_and_map();
        overlay.to_ascii(map, observer)
    }

    /// Positions from `contacts` that are currently visible
    pub fn visible_contacts(&self, contacts: &[(i32, i32)]) -> Vec<(i32, i32)> {
        contacts
            .iter()
            .copied()
            .filter(|&(x, y)| self.engine.is_visible(x, y))
            .collect()
    }

    pub fn stats(&self) -> FogStats {
        let map = self.map();
        FogStats {
            visible: self.engine.visible_count(),
            explored: self.engine.explored_count(),
            total: (map.width() * map.height()) as usize,
        }
    }
}
